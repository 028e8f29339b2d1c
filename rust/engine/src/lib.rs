//! # lounge-engine: Poker Game Engine Core
//!
//! A deterministic engine for ring-game poker: Texas Hold'em, Omaha and
//! Seven-Card Stud for 2 to 10 players. It owns the rules of a hand (turn
//! order, raise sizing, side pots, showdown) and nothing else; rendering,
//! transport and persistence live with the caller, which talks to the engine
//! through method calls and an outbound event stream.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and parsing
//! - [`deck`] - Seeded ChaCha20 deck with Fisher–Yates shuffling
//! - [`hand`] - Hand evaluation, comparison and Omaha/stud helpers
//! - [`pot`] - Contributions, main and side pots, payouts
//! - [`rules`] - Action validation against the live bet
//! - [`betting`] - One betting round: turn order and completion
//! - [`engine`] - One hand from the deal to the payout
//! - [`table`] - Seats, stacks and the button across hands
//! - [`config`] - Table configuration
//! - [`events`] - Outbound events and the subscriber hub
//! - [`logger`] - Hand history records and JSONL writer
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use lounge_engine::cards::parse_cards;
//! use lounge_engine::hand::{evaluate, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! let ranked = evaluate(&cards).unwrap();
//! assert_eq!(ranked.category, Category::RoyalFlush);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! A table draws one deck seed per hand from its own seeded RNG, so the same
//! table seed replays the same sequence of hands:
//!
//! ```rust
//! use lounge_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! a.shuffle();
//! b.shuffle();
//! assert_eq!(a.deal(52).unwrap(), b.deal(52).unwrap());
//! ```
//!
//! ## Playing a Hand
//!
//! ```rust
//! use lounge_engine::config::TableConfig;
//! use lounge_engine::player::{PlayerAction, PlayerId};
//! use lounge_engine::table::TableEngine;
//!
//! let mut table = TableEngine::new(TableConfig::holdem(5, 10), 7).unwrap();
//! table.sit(0, PlayerId::new("alice"), 1000).unwrap();
//! table.sit(1, PlayerId::new("bob"), 1000).unwrap();
//! table.start_hand().unwrap();
//!
//! // heads-up the button posts the small blind and acts first
//! table.act(&PlayerId::new("alice"), PlayerAction::Fold).unwrap();
//! assert_eq!(table.stack_of(&PlayerId::new("bob")), Some(1005));
//! ```

pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
pub mod table;
