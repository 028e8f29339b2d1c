use std::fmt;

use crate::cards::Card;
use crate::errors::GameError;
use serde::{Deserialize, Serialize};

/// Opaque player identifier supplied by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
    SittingOut,
}

/// Represents a player action during a betting round.
/// `Bet` and `Raise` carry the player's total bet for the round after acting
/// ("raise to"), not the increment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (no bet, only valid if no bet to call)
    Check,
    /// Call the current bet, all-in if the stack is short
    Call,
    /// Open the betting to the given total
    Bet(u32),
    /// Raise the current bet to the given total
    Raise(u32),
    /// Bet all remaining chips
    AllIn,
}

/// A seat's view of one hand: chips behind, cards, and what has been put in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    seat: usize,
    /// Chips behind (not yet committed this hand)
    stack: u32,
    /// Face-down cards
    hole: Vec<Card>,
    /// Face-up cards (stud)
    upcards: Vec<Card>,
    /// Committed in the live betting round
    round_bet: u32,
    /// Committed this hand, antes included
    total_contribution: u32,
    status: PlayerStatus,
}

impl Player {
    pub fn new(id: PlayerId, seat: usize, stack: u32) -> Self {
        Self {
            id,
            seat,
            stack,
            hole: Vec::with_capacity(4),
            upcards: Vec::new(),
            round_bet: 0,
            total_contribution: 0,
            status: PlayerStatus::Active,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }
    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn status(&self) -> PlayerStatus {
        self.status
    }
    pub fn hole_cards(&self) -> &[Card] {
        &self.hole
    }
    pub fn upcards(&self) -> &[Card] {
        &self.upcards
    }
    pub fn round_bet(&self) -> u32 {
        self.round_bet
    }
    pub fn total_contribution(&self) -> u32 {
        self.total_contribution
    }

    /// Every card the player holds, face-down first.
    pub fn all_cards(&self) -> Vec<Card> {
        self.hole.iter().chain(&self.upcards).copied().collect()
    }

    /// Still contesting the pot (active or all-in).
    pub fn is_live(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Can still make betting decisions.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    pub(crate) fn give_card(&mut self, c: Card) {
        self.hole.push(c);
    }

    pub(crate) fn expose_card(&mut self, c: Card) {
        self.upcards.push(c);
    }

    /// Moves `amount` from the stack into the live round bet. Going to zero
    /// makes the player all-in.
    pub(crate) fn commit(&mut self, amount: u32) -> Result<(), GameError> {
        self.take(amount)?;
        self.round_bet += amount;
        Ok(())
    }

    /// Dead money (antes): counts toward the hand total, not the round bet.
    pub(crate) fn commit_dead(&mut self, amount: u32) -> Result<(), GameError> {
        self.take(amount)
    }

    fn take(&mut self, amount: u32) -> Result<(), GameError> {
        if amount > self.stack {
            return Err(GameError::InvalidContribution(format!(
                "{} cannot commit {} with {} behind",
                self.id, amount, self.stack
            )));
        }
        self.stack -= amount;
        self.total_contribution += amount;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        Ok(())
    }

    pub(crate) fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
    }

    pub(crate) fn reset_round(&mut self) {
        self.round_bet = 0;
    }
}
