//! Command handler modules for the lounge CLI.
//!
//! Each command lives in its own module with a `handle_COMMAND_command`
//! function that writes to injected streams and returns `Result<(), CliError>`.

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use sim::handle_sim_command;

use lounge_ai::ActionPolicy;
use lounge_engine::config::{TableConfig, Variant};
use lounge_engine::engine::HandResult;
use lounge_engine::errors::GameError;
use lounge_engine::player::PlayerId;
use lounge_engine::table::TableEngine;

use crate::error::CliError;

/// Table used by the developer commands: 5/10 blinds, or 1 ante with a
/// 2 bring-in and 5 bet for stud. Every seat buys in for `stack`.
pub(crate) fn table_config(variant: Variant, seats: usize, stack: u32) -> TableConfig {
    let base = match variant {
        Variant::Holdem => TableConfig::holdem(5, 10),
        Variant::Omaha => TableConfig::omaha(5, 10),
        Variant::Stud => TableConfig::stud(1, 2, 5),
    };
    base.with_seats(seats).with_buy_in(stack, stack)
}

pub(crate) fn parse_variant(name: Option<&str>, fallback: Variant) -> Result<Variant, CliError> {
    match name {
        Some(n) => n.parse().map_err(|e: GameError| CliError::InvalidInput(e.to_string())),
        None => Ok(fallback),
    }
}

/// Seats `seats` players named `p1`, `p2`, ... in seat order.
pub(crate) fn seat_players(table: &mut TableEngine, seats: usize, stack: u32) -> Result<(), CliError> {
    for s in 0..seats {
        table.sit(s, PlayerId::new(format!("p{}", s + 1)), stack)?;
    }
    Ok(())
}

/// Asks `policy` for every decision until the live hand completes.
pub(crate) fn play_out(table: &mut TableEngine, policy: &dyn ActionPolicy) -> Result<HandResult, CliError> {
    loop {
        let Some(hand) = table.hand() else {
            return Err(GameError::NoHandInProgress.into());
        };
        if let Some(result) = hand.result() {
            return Ok(result.clone());
        }
        if let Some(e) = hand.halted() {
            return Err(e.clone().into());
        }
        let actor = hand.to_act().cloned().ok_or(GameError::NoHandInProgress)?;
        let action = policy.get_action(hand, &actor);
        tracing::debug!(player = %actor, ?action, "bot action");
        table.act(&actor, action)?;
    }
}
