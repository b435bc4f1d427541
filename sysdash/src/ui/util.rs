//! Small UI helpers: truncation and percentage colouring.

use ratatui::style::Color;

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

/// Colour for a cell like "37.5%"; cells that don't parse stay uncoloured.
pub fn pct_color(cell: &str) -> Option<Color> {
    let v: f64 = cell.trim().trim_end_matches('%').parse().ok()?;
    Some(match v {
        x if x < 25.0 => Color::Green,
        x if x < 60.0 => Color::Yellow,
        _ => Color::Red,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_middle("short", 10), "short");
        assert_eq!(truncate_middle("http://very-long-host:5000", 12), "http...:5000");
        assert_eq!(truncate_middle("ééééééééé", 7), "éé...éé");
        assert_eq!(truncate_middle("abcdef", 2), "...");
    }

    #[test]
    fn percent_cells_get_threshold_colours() {
        assert_eq!(pct_color("3%"), Some(Color::Green));
        assert_eq!(pct_color("42.5%"), Some(Color::Yellow));
        assert_eq!(pct_color("99%"), Some(Color::Red));
        assert_eq!(pct_color("n/a"), None);
    }
}
