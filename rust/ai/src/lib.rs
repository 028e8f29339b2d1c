//! # lounge-ai: seat policies for the lounge engine
//!
//! Bots that pick an action for the player on turn. Simulations and tests use
//! them to drive every seat of a [`TableEngine`](lounge_engine::table::TableEngine).
//!
//! ## Core Components
//!
//! - [`ActionPolicy`] - the decision interface
//! - [`baseline`] - rule-based play from hole-card and made-hand strength
//! - [`passive`] - checks when it can, calls otherwise
//! - [`create_policy`] - lookup by name
//!
//! ## Quick Start
//!
//! ```rust
//! use lounge_ai::{create_policy, ActionPolicy};
//! use lounge_engine::config::TableConfig;
//! use lounge_engine::table::TableEngine;
//!
//! let bot = create_policy("baseline").unwrap();
//! let mut table = TableEngine::new(TableConfig::holdem(5, 10), 42).unwrap();
//! table.sit(0, "a".into(), 1000).unwrap();
//! table.sit(1, "b".into(), 1000).unwrap();
//! table.start_hand().unwrap();
//!
//! while let Some(hand) = table.hand().filter(|h| !h.is_complete()) {
//!     let actor = hand.to_act().cloned().unwrap();
//!     let action = bot.get_action(hand, &actor);
//!     table.act(&actor, action).unwrap();
//! }
//! ```

use lounge_engine::engine::HandStateMachine;
use lounge_engine::player::{PlayerAction, PlayerId};

pub mod baseline;
pub mod passive;

/// Names accepted by [`create_policy`].
pub const POLICY_NAMES: [&str; 2] = ["baseline", "passive"];

/// Chooses an action for a seat in a running hand.
///
/// Implementations only read the hand; the caller submits the returned
/// action. A policy asked about a player who is not on turn should return
/// something harmless (the hand rejects it without changing state).
///
/// # Example Implementation
///
/// ```rust
/// use lounge_ai::ActionPolicy;
/// use lounge_engine::engine::HandStateMachine;
/// use lounge_engine::player::{PlayerAction, PlayerId};
///
/// struct AlwaysFold;
///
/// impl ActionPolicy for AlwaysFold {
///     fn get_action(&self, _hand: &HandStateMachine, _player: &PlayerId) -> PlayerAction {
///         PlayerAction::Fold
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysFold"
///     }
/// }
/// ```
pub trait ActionPolicy: Send + Sync {
    fn get_action(&self, hand: &HandStateMachine, player: &PlayerId) -> PlayerAction;

    fn name(&self) -> &str;
}

/// Builds a policy by name, `None` for names outside [`POLICY_NAMES`].
///
/// ```rust
/// use lounge_ai::create_policy;
///
/// assert_eq!(create_policy("passive").unwrap().name(), "PassivePolicy");
/// assert!(create_policy("gto").is_none());
/// ```
pub fn create_policy(name: &str) -> Option<Box<dyn ActionPolicy>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "baseline" => Some(Box::new(baseline::BaselinePolicy::new())),
        "passive" => Some(Box::new(passive::PassivePolicy)),
        _ => None,
    }
}

/// What a policy falls back to when it cannot decide: check if free,
/// otherwise fold.
pub(crate) fn fallback(hand: &HandStateMachine, player: &PlayerId) -> PlayerAction {
    hand.timeout_action(player).unwrap_or(PlayerAction::Fold)
}
