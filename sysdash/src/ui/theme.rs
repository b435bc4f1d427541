//! Shared UI theme constants.

use ratatui::style::Color;

// Series colours of the metrics chart
pub const CPU_COLOR: Color = Color::Rgb(0xE8, 0x5F, 0x5C);
pub const MEM_COLOR: Color = Color::Rgb(0x2D, 0x82, 0xB7);

pub const HEADER_FG: Color = Color::Cyan;

// Scrollbar colors
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);
