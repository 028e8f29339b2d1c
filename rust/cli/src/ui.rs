//! UI helper functions for terminal output formatting.

use std::io::Write;

use lounge_engine::cards::{format_cards, Card};

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Cards in short form, `-` when there are none.
pub fn cards_or_dash(cards: &[Card]) -> String {
    if cards.is_empty() {
        "-".to_string()
    } else {
        format_cards(cards)
    }
}

/// Signed chip amount, `+40` / `-40` / `0`.
pub fn signed(v: i64) -> String {
    if v > 0 { format!("+{}", v) } else { v.to_string() }
}
