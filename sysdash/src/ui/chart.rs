//! CPU/memory line chart.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::history::Series;
use crate::ui::theme::{CPU_COLOR, MEM_COLOR};
use crate::views::metrics::MetricsChart;

pub fn draw_metrics_chart(f: &mut ratatui::Frame<'_>, area: Rect, chart: &MetricsChart) {
    let title = match (chart.cpu.last(), chart.memory.last()) {
        (Some(c), Some(m)) => format!(
            "System metrics (cpu: {:>5.1}% | mem: {:>5.1}%)",
            c.value, m.value
        ),
        _ => "System metrics (waiting for data)".into(),
    };

    let cpu = chart.cpu.xy();
    let mem = chart.memory.xy();
    let datasets = vec![
        Dataset::default()
            .name(chart.cpu.name)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(CPU_COLOR))
            .data(&cpu),
        Dataset::default()
            .name(chart.memory.name)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(MEM_COLOR))
            .data(&mem),
    ];

    let x_max = chart.cpu.len().saturating_sub(1).max(1) as f64;
    let x_labels: Vec<Span> = axis_labels(&chart.cpu).into_iter().map(Span::raw).collect();
    let y_labels = vec![Span::raw("0"), Span::raw("50"), Span::raw("100")];

    let widget = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Datetime")
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Percentage (%)")
                .bounds([0.0, 100.0])
                .labels(y_labels),
        );
    f.render_widget(widget, area);
}

/// First, middle and last timestamp of a series (fewer for short series).
pub fn axis_labels(series: &Series) -> Vec<String> {
    let labels: Vec<&str> = series.points().map(|p| p.label.as_str()).collect();
    let picks: Vec<usize> = match labels.len() {
        0 => vec![],
        1 => vec![0],
        2 => vec![0, 1],
        n => vec![0, n / 2, n - 1],
    };
    picks.into_iter().map(|i| labels[i].to_string()).collect()
}
