//! Latest process snapshot as a table with per-cell coloring, zebra striping and a scrollbar.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Modifier;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::ui::theme::{HEADER_FG, SB_ARROW, SB_THUMB, SB_TRACK};
use crate::ui::util::pct_color;
use crate::views::processes::ProcessTable;

// Keep the header widths here so drawing and paging agree.
const COLS: [Constraint; 5] = [
    Constraint::Length(8),      // PID
    Constraint::Percentage(40), // Name
    Constraint::Length(10),     // Status
    Constraint::Length(8),      // CPU %
    Constraint::Length(8),      // Mem %
];

/// Rows visible in a table drawn into `area` (borders + header excluded).
pub fn viewport_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

pub fn draw_processes(f: &mut ratatui::Frame<'_>, area: Rect, table: &ProcessTable, scroll_offset: usize) {
    let title = match &table.taken_at {
        Some(ts) => format!("Processes ({} at {ts})", table.rows.len()),
        None => format!("Processes ({})", table.rows.len()),
    };
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);

    // Inner area and content area (reserve 2 columns for scrollbar)
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 1 || inner.width < 3 {
        return;
    }
    let content = Rect {
        width: inner.width.saturating_sub(2),
        ..inner
    };

    let total_rows = table.rows.len();
    let viewport = viewport_rows(area);
    let offset = clamp_offset(scroll_offset, total_rows, viewport);

    let rows = table
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport)
        .map(|(i, p)| {
            let zebra = if i % 2 == 0 {
                Style::default()
            } else {
                Style::default().bg(Color::Rgb(30, 30, 36))
            };
            let pct = |s: &str| match pct_color(s) {
                Some(c) => Style::default().fg(c),
                None => Style::default(),
            };
            Row::new(vec![
                Cell::from(p.pid.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(p.name.clone()),
                Cell::from(p.status.clone()),
                Cell::from(p.cpu.clone()).style(pct(&p.cpu)),
                Cell::from(p.memory.clone()).style(pct(&p.memory)),
            ])
            .style(zebra)
        });

    let header = Row::new(vec!["PID", "Name", "Status", "CPU %", "Mem %"])
        .style(Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD));

    // No borders here; outer block already drawn
    let widget = Table::new(rows, COLS.to_vec()).header(header).column_spacing(1);
    f.render_widget(widget, content);

    let scroll_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    draw_scrollbar(f, scroll_area, total_rows, viewport, offset);
}

fn draw_scrollbar(f: &mut ratatui::Frame<'_>, area: Rect, total_rows: usize, viewport: usize, offset: usize) {
    if area.height < 3 {
        return;
    }
    let track = (area.height - 2) as usize;
    let total = total_rows.max(1);
    let view = viewport.clamp(1, total);
    let max_off = total.saturating_sub(view);

    let thumb_len = (track * view).div_ceil(total).max(1).min(track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        if i >= thumb_top && i < thumb_top + thumb_len {
            lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
        } else {
            lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
        }
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), area);
}

pub fn clamp_offset(offset: usize, total_rows: usize, viewport: usize) -> usize {
    offset.min(total_rows.saturating_sub(viewport))
}

/// Keyboard scrolling (Up/Down/PageUp/PageDown). Returns true if the key was used.
pub fn processes_handle_key(
    scroll_offset: &mut usize,
    key: KeyEvent,
    page_size: usize,
    total_rows: usize,
) -> bool {
    let page = page_size.max(1);
    match key.code {
        KeyCode::Up => *scroll_offset = scroll_offset.saturating_sub(1),
        KeyCode::Down => *scroll_offset += 1,
        KeyCode::PageUp => *scroll_offset = scroll_offset.saturating_sub(page),
        KeyCode::PageDown => *scroll_offset += page,
        _ => return false,
    }
    *scroll_offset = clamp_offset(*scroll_offset, total_rows, page_size);
    true
}
