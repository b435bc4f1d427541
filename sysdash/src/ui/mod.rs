//! UI module root: exposes drawing functions for individual panels.

pub mod chart;
pub mod chat;
pub mod header;
pub mod logs;
pub mod processes;
pub mod theme;
pub mod util;
