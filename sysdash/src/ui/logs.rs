//! Recent log lines.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem},
};

use crate::views::logs::LogList;

pub fn draw_logs(f: &mut ratatui::Frame<'_>, area: Rect, logs: &LogList) {
    let items: Vec<ListItem> = logs
        .items
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let title = format!("Logs ({} lines)", logs.items.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(list, area);
}
