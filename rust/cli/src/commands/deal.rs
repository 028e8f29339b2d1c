//! Deal command: one hand, every player's cards and the full board.
//!
//! The hand is checked down so every street is dealt; the same seed always
//! prints the same cards.

use std::io::Write;

use lounge_ai::passive::PassivePolicy;
use lounge_engine::table::TableEngine;

use super::{parse_variant, play_out, seat_players, table_config};
use crate::config::Config;
use crate::error::CliError;
use crate::ui;

pub fn handle_deal_command(
    variant: Option<String>,
    players: Option<usize>,
    seed: Option<u64>,
    config: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let variant = parse_variant(variant.as_deref(), config.variant)?;
    let players = players.unwrap_or(config.seats);
    let seed = seed.or(config.seed).unwrap_or_else(rand::random);

    let mut table = TableEngine::new(table_config(variant, players, config.starting_stack), seed)?;
    seat_players(&mut table, players, config.starting_stack)?;
    table.start_hand()?;
    play_out(&mut table, &PassivePolicy)?;

    let Some(hand) = table.hand() else {
        return Err(CliError::InvalidInput("no hand was dealt".into()));
    };
    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Variant: {}", variant)?;
    for p in hand.players() {
        write!(out, "{} (seat {}): {}", p.id(), p.seat() + 1, ui::cards_or_dash(p.hole_cards()))?;
        if !p.upcards().is_empty() {
            write!(out, " | up {}", ui::cards_or_dash(p.upcards()))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Board: {}", ui::cards_or_dash(hand.board()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(variant: &str, players: usize, seed: u64) -> String {
        let mut out = Vec::new();
        handle_deal_command(
            Some(variant.to_string()),
            Some(players),
            Some(seed),
            &Config::default(),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn holdem_shows_two_cards_each_and_five_on_board() {
        let text = deal("holdem", 3, 42);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Seed: 42");
        assert_eq!(lines[1], "Variant: holdem");
        let seats = lines.iter().filter(|l| l.contains("(seat ")).count();
        assert_eq!(seats, 3);
        let board = lines[5].trim_start_matches("Board: ");
        assert_eq!(board.split(' ').count(), 5);
    }

    #[test]
    fn same_seed_same_cards() {
        assert_eq!(deal("omaha", 4, 12345), deal("omaha", 4, 12345));
    }

    #[test]
    fn stud_lists_up_cards() {
        let text = deal("stud", 2, 7);
        assert!(text.contains(" | up "));
        assert!(text.contains("Board: -"));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let mut out = Vec::new();
        let r = handle_deal_command(Some("razz".into()), None, Some(1), &Config::default(), &mut out);
        assert!(matches!(r, Err(CliError::InvalidInput(_))));
    }
}
