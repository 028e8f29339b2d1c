//! Eval command: rank five to seven cards.

use std::io::Write;

use lounge_engine::cards::{format_cards, parse_cards};
use lounge_engine::hand::evaluate;

use crate::error::CliError;

/// Prints the cards, the category, a readable description and the
/// tie-break key of the best five-card hand in `cards`.
///
/// Each argument may hold one or several cards (`"As Ks"` or `As Ks`).
pub fn handle_eval_command(cards: &[String], out: &mut dyn Write) -> Result<(), CliError> {
    let joined = cards.join(" ");
    let parsed = parse_cards(&joined).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let ranked = evaluate(&parsed).map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let key: Vec<String> = ranked
        .kickers
        .iter()
        .filter(|&&k| k > 0)
        .map(u8::to_string)
        .collect();
    writeln!(out, "Cards: {}", format_cards(&parsed))?;
    writeln!(
        out,
        "Category: {} ({})",
        ranked.category.name(),
        ranked.category.description()
    )?;
    writeln!(out, "Hand: {}", ranked.describe())?;
    writeln!(out, "Key: {}", key.join(" "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(args: &[&str]) -> Result<String, CliError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        handle_eval_command(&args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn royal_flush() {
        let text = eval(&["As", "Ks", "Qs", "Js", "Ts"]).unwrap();
        assert!(text.contains("Category: Royal Flush (A, K, Q, J, 10, all of the same suit)"));
    }

    #[test]
    fn wheel_key_counts_the_ace_low() {
        let text = eval(&["Ah 2d 3c 4s 5h", "Kd", "9c"]).unwrap();
        assert!(text.contains("Category: Straight (Five cards in sequence)"));
        assert!(text.contains("Hand: Straight, Five high"));
        assert!(text.contains("Key: 5"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(eval(&["As", "Ks"]), Err(CliError::InvalidInput(_))));
        assert!(matches!(eval(&["As", "As", "Kd", "Qh", "2c"]), Err(CliError::InvalidInput(_))));
        assert!(matches!(eval(&["Xx", "Ks", "Qs", "Js", "Ts"]), Err(CliError::InvalidInput(_))));
    }
}
