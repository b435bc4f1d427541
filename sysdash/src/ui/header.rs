//! Top header with the backend address and push channel state.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

use crate::ui::util::truncate_middle;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, backend: &str, push_live: bool) {
    let push = if push_live { "live" } else { "waiting for push" };
    let title = format!(
        "sysdash | backend: {} | {}  (Esc to quit)",
        truncate_middle(backend, 48),
        push
    );
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
