//! Chat transcript and prompt input.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::views::chat::{ChatExchange, ChatPanel};

pub fn transcript_lines(transcript: &[ChatExchange]) -> Vec<Line<'_>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::with_capacity(transcript.len() * 3);
    for (i, ex) in transcript.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(vec![
            Span::styled("You: ", bold.fg(Color::Cyan)),
            Span::raw(ex.prompt.as_str()),
        ]));
        // answers may span several lines
        for (j, part) in ex.answer.lines().enumerate() {
            let prefix = if j == 0 { "AI: " } else { "    " };
            lines.push(Line::from(vec![
                Span::styled(prefix, bold.fg(Color::Magenta)),
                Span::raw(part),
            ]));
        }
        if ex.answer.is_empty() {
            lines.push(Line::from(Span::styled("AI: ", bold.fg(Color::Magenta))));
        }
    }
    lines
}

pub fn draw_chat(f: &mut ratatui::Frame<'_>, area: Rect, chat: &ChatPanel) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let title = match &chat.last_error {
        Some(e) => Line::from(vec![
            Span::raw("Chat | "),
            Span::styled(format!("request failed: {e}"), Style::default().fg(Color::Red)),
        ]),
        None => Line::from("Chat"),
    };

    // Stick to the bottom of the transcript
    let lines = transcript_lines(&chat.transcript);
    let visible = parts[0].height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let history = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(history, parts[0]);

    let input = Paragraph::new(format!("> {}", chat.input)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Prompt (Enter to send)"),
    );
    f.render_widget(input, parts[1]);

    f.set_cursor_position(Position::new(
        cursor_column(parts[1], &chat.input),
        parts[1].y.saturating_add(1),
    ));
}

/// Cursor column after `> input` inside a bordered box, kept within the box.
fn cursor_column(area: Rect, input: &str) -> u16 {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(3).saturating_add(typed).min(max_x)
}
