use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::Card;
use crate::player::PlayerId;

/// Why a player action was rejected. Rejections never change hand state.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum IllegalAction {
    #[error("it's not {actual}'s turn (expected {expected})")]
    NotPlayersTurn { expected: PlayerId, actual: PlayerId },
    #[error("cannot check while facing a bet of {to_call}")]
    CannotCheck { to_call: u32 },
    #[error("nothing to call")]
    NothingToCall,
    #[error("raise to {amount} is below the minimum of {minimum}")]
    RaiseTooSmall { amount: u32, minimum: u32 },
    #[error("insufficient chips: {required} required, {available} available")]
    InsufficientChips { required: u32, available: u32 },
    #[error("betting is closed for this player; only call or fold")]
    RaisingClosed,
    #[error("cannot bet into an existing bet; raise instead")]
    BetFacingBet,
    #[error("player {0} is not in this hand")]
    PlayerNotInHand(PlayerId),
    #[error("player {0} has already folded")]
    PlayerFolded(PlayerId),
    #[error("player {0} is all-in")]
    PlayerAllIn(PlayerId),
    #[error("no betting round is live")]
    NoBettingRound,
    #[error("hand already complete")]
    HandComplete,
    #[error("stale action: expected sequence {expected}, got {got}")]
    StaleSequence { expected: u64, got: u64 },
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),
    #[error("invalid contribution: {0}")]
    InvalidContribution(String),
    #[error("deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("insufficient players: {available} funded seat(s), at least 2 required")]
    InsufficientPlayers { available: usize },
    #[error("invalid hand: {0}")]
    InvalidHand(String),
    #[error("duplicate card {0} in hand")]
    DuplicateCard(Card),
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),
    #[error("seat {seat} does not exist (table has {max_seats})")]
    SeatOutOfRange { seat: usize, max_seats: usize },
    #[error("seat {0} is occupied")]
    SeatOccupied(usize),
    #[error("player {0} is already seated")]
    PlayerAlreadySeated(PlayerId),
    #[error("buy-in {amount} outside [{min}, {max}]")]
    BuyInOutOfRange { amount: u32, min: u32, max: u32 },
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("no hand in progress")]
    NoHandInProgress,
}

impl GameError {
    /// Internal invariant violations. A hand that hits one of these is halted
    /// instead of paying out.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::InvalidContribution(_) | GameError::DeckExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_classified() {
        assert!(GameError::InvalidContribution("x".into()).is_fatal());
        assert!(GameError::DeckExhausted {
            requested: 2,
            remaining: 1
        }
        .is_fatal());
        assert!(!GameError::IllegalAction(IllegalAction::NothingToCall).is_fatal());
        assert!(!GameError::InsufficientPlayers { available: 1 }.is_fatal());
    }

    #[test]
    fn illegal_action_converts_into_game_error() {
        let e: GameError = IllegalAction::RaisingClosed.into();
        assert_eq!(
            e.to_string(),
            "illegal action: betting is closed for this player; only call or fold"
        );
    }
}
