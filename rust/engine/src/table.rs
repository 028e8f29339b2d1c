//! A table: seats and stacks that persist across hands, the dealer button,
//! and the hand currently being played.

use chrono::Utc;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::config::{TableConfig, Variant};
use crate::deck::Deck;
use crate::engine::{ActionOutcome, HandResult, HandStateMachine, Phase};
use crate::errors::GameError;
use crate::events::{EventBus, EventSubscription};
use crate::logger::{format_hand_id, ActionRecord, Street};
use crate::player::{Player, PlayerAction, PlayerId, PlayerStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub stack: u32,
    pub sitting_out: bool,
}

/// Returned by [`TableEngine::start_hand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandStarted {
    pub hand_id: String,
    pub button: usize,
    /// Deck seed, for replay
    pub seed: u64,
    /// Antes, blinds and bring-in
    pub forced: Vec<ActionRecord>,
}

/// Render-ready snapshot of a table for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub variant: Variant,
    pub hand_id: Option<String>,
    pub phase: Option<Phase>,
    pub street: Option<Street>,
    pub pot: u64,
    pub current_bet: u32,
    pub min_raise: u32,
    pub board: Vec<Card>,
    pub seats: Vec<SeatView>,
    pub active_player: Option<PlayerId>,
    pub dealer_seat: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: usize,
    pub player_id: PlayerId,
    pub stack: u32,
    /// Bet in the live round
    pub bet: u32,
    /// `None` when not dealt into the current hand
    pub status: Option<PlayerStatus>,
    pub sitting_out: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
    /// Only the viewer's own cards, or cards shown at showdown
    pub hole_cards: Option<Vec<Card>>,
    pub face_down: usize,
    pub upcards: Vec<Card>,
}

/// Owns the seats and drives one [`HandStateMachine`] at a time.
///
/// # Examples
///
/// ```
/// use lounge_engine::config::TableConfig;
/// use lounge_engine::player::PlayerId;
/// use lounge_engine::table::TableEngine;
///
/// let mut table = TableEngine::new(TableConfig::holdem(5, 10), 42).unwrap();
/// table.sit(0, PlayerId::new("alice"), 1000).unwrap();
/// table.sit(1, PlayerId::new("bob"), 1000).unwrap();
/// let started = table.start_hand().unwrap();
/// assert_eq!(started.forced.len(), 2);
/// let view = table.view(Some(&PlayerId::new("alice")));
/// assert_eq!(view.pot, 15);
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct TableEngine {
    config: TableConfig,
    seats: Vec<Option<Seat>>,
    button: Option<usize>,
    rng: ChaCha20Rng,
    date: String,
    hands_started: u32,
    hand: Option<HandStateMachine>,
    applied: Option<String>,
    #[serde(skip)]
    bus: EventBus,
}

impl TableEngine {
    /// `seed` drives every deck this table deals.
    pub fn new(config: TableConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            seats: vec![None; config.max_seats],
            config,
            button: None,
            rng: ChaCha20Rng::seed_from_u64(seed),
            date: Utc::now().format("%Y%m%d").to_string(),
            hands_started: 0,
            hand: None,
            applied: None,
            bus: EventBus::new(),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn seats(&self) -> &[Option<Seat>] {
        &self.seats
    }

    pub fn button(&self) -> Option<usize> {
        self.button
    }

    pub fn seat_of(&self, player: &PlayerId) -> Option<usize> {
        self.seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| &s.player_id == player))
    }

    pub fn stack_of(&self, player: &PlayerId) -> Option<u32> {
        let seat = self.seat_of(player)?;
        self.seats[seat].as_ref().map(|s| s.stack)
    }

    pub fn hand(&self) -> Option<&HandStateMachine> {
        self.hand.as_ref()
    }

    pub fn last_result(&self) -> Option<&HandResult> {
        self.hand.as_ref()?.result()
    }

    pub fn subscribe(&self) -> EventSubscription {
        self.bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    fn hand_running(&self) -> bool {
        self.hand.as_ref().is_some_and(|h| !h.is_complete())
    }

    fn in_running_hand(&self, player: &PlayerId) -> bool {
        self.hand
            .as_ref()
            .is_some_and(|h| !h.is_complete() && h.player(player).is_some())
    }

    fn check_buy_in(&self, amount: u32) -> Result<(), GameError> {
        if amount < self.config.min_buy_in || amount > self.config.max_buy_in {
            return Err(GameError::BuyInOutOfRange {
                amount,
                min: self.config.min_buy_in,
                max: self.config.max_buy_in,
            });
        }
        Ok(())
    }

    pub fn sit(&mut self, seat: usize, player: PlayerId, buy_in: u32) -> Result<(), GameError> {
        if seat >= self.seats.len() {
            return Err(GameError::SeatOutOfRange {
                seat,
                max_seats: self.seats.len(),
            });
        }
        if self.seats[seat].is_some() {
            return Err(GameError::SeatOccupied(seat));
        }
        if self.seat_of(&player).is_some() {
            return Err(GameError::PlayerAlreadySeated(player));
        }
        self.check_buy_in(buy_in)?;
        tracing::info!(seat, player = %player, buy_in, "player seated");
        self.seats[seat] = Some(Seat {
            player_id: player,
            stack: buy_in,
            sitting_out: false,
        });
        Ok(())
    }

    /// Frees the seat and returns the stack cashed out.
    pub fn leave(&mut self, player: &PlayerId) -> Result<u32, GameError> {
        let seat = self.occupied_seat(player)?;
        if self.in_running_hand(player) {
            return Err(GameError::HandInProgress);
        }
        let stack = self.seats[seat].take().map_or(0, |s| s.stack);
        tracing::info!(seat, player = %player, stack, "player left");
        Ok(stack)
    }

    /// Takes effect from the next hand.
    pub fn sit_out(&mut self, player: &PlayerId) -> Result<(), GameError> {
        self.seat_mut(player)?.sitting_out = true;
        Ok(())
    }

    pub fn sit_in(&mut self, player: &PlayerId) -> Result<(), GameError> {
        self.seat_mut(player)?.sitting_out = false;
        Ok(())
    }

    /// Adds chips between hands; the stack may not exceed the maximum buy-in.
    pub fn top_up(&mut self, player: &PlayerId, amount: u32) -> Result<u32, GameError> {
        if self.in_running_hand(player) {
            return Err(GameError::HandInProgress);
        }
        let (min, max) = (self.config.min_buy_in, self.config.max_buy_in);
        let seat = self.seat_mut(player)?;
        let total = seat.stack.saturating_add(amount);
        if total > max {
            return Err(GameError::BuyInOutOfRange {
                amount: total,
                min,
                max,
            });
        }
        seat.stack = total;
        Ok(total)
    }

    /// Seated players with nothing left; rebuying or leaving is up to them.
    pub fn eliminated(&self) -> Vec<PlayerId> {
        self.seats
            .iter()
            .flatten()
            .filter(|s| s.stack == 0)
            .map(|s| s.player_id.clone())
            .collect()
    }

    fn occupied_seat(&self, player: &PlayerId) -> Result<usize, GameError> {
        self.seat_of(player)
            .ok_or_else(|| GameError::UnknownPlayer(player.clone()))
    }

    fn seat_mut(&mut self, player: &PlayerId) -> Result<&mut Seat, GameError> {
        let seat = self.occupied_seat(player)?;
        self.seats[seat]
            .as_mut()
            .ok_or_else(|| GameError::UnknownPlayer(player.clone()))
    }

    fn funded_seats(&self) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.as_ref().is_some_and(|s| !s.sitting_out && s.stack > 0))
            .map(|(i, _)| i)
            .collect()
    }

    /// Moves the button to the next funded seat, deals a new hand and posts
    /// forced bets.
    pub fn start_hand(&mut self) -> Result<HandStarted, GameError> {
        if self.hand_running() {
            return Err(GameError::HandInProgress);
        }
        let funded = self.funded_seats();
        if funded.len() < 2 {
            return Err(GameError::InsufficientPlayers {
                available: funded.len(),
            });
        }
        let button = match self.button {
            Some(b) => funded.iter().copied().find(|&s| s > b).unwrap_or(funded[0]),
            None => funded[0],
        };

        let players: Vec<Player> = funded
            .iter()
            .filter_map(|&i| {
                let s = self.seats[i].as_ref()?;
                Some(Player::new(s.player_id.clone(), i, s.stack))
            })
            .collect();
        let seed = self.rng.next_u64();
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        let hand_id = format_hand_id(&self.date, self.hands_started + 1);

        let hand = HandStateMachine::new(&self.config, hand_id.clone(), players, button, deck)?;
        self.hands_started += 1;
        self.button = Some(button);
        let forced = hand
            .actions()
            .iter()
            .filter(|a| a.action.is_forced())
            .cloned()
            .collect();
        self.hand = Some(hand);
        self.after_hand_step()?;

        Ok(HandStarted {
            hand_id,
            button,
            seed,
            forced,
        })
    }

    /// Forwards an action to the live hand. A hand that completes is settled
    /// into the seats' stacks before this returns.
    pub fn act(&mut self, player: &PlayerId, action: PlayerAction) -> Result<ActionOutcome, GameError> {
        let hand = self.live_hand()?;
        let outcome = hand.act(player, action);
        self.after_hand_step()?;
        outcome
    }

    pub fn act_at(
        &mut self,
        seq: u64,
        player: &PlayerId,
        action: PlayerAction,
    ) -> Result<ActionOutcome, GameError> {
        let hand = self.live_hand()?;
        let outcome = hand.act_at(seq, player, action);
        self.after_hand_step()?;
        outcome
    }

    /// Applies the timeout default (check, else fold) for `player`.
    pub fn apply_timeout(&mut self, player: &PlayerId) -> Result<ActionOutcome, GameError> {
        let hand = self.live_hand()?;
        let outcome = hand.apply_timeout(player);
        self.after_hand_step()?;
        outcome
    }

    fn live_hand(&mut self) -> Result<&mut HandStateMachine, GameError> {
        match self.hand.as_mut() {
            Some(h) if !h.is_complete() => Ok(h),
            _ => Err(GameError::NoHandInProgress),
        }
    }

    fn after_hand_step(&mut self) -> Result<(), GameError> {
        let Some(hand) = self.hand.as_mut() else {
            return Ok(());
        };
        for event in hand.drain_events() {
            self.bus.publish(event);
        }
        let result = match hand.result() {
            Some(r) if self.applied.as_deref() != Some(r.hand_id.as_str()) => r.clone(),
            _ => return Ok(()),
        };
        self.apply_result(&result)
    }

    /// Adds each participant's delta to their stack. A result is applied at
    /// most once.
    pub fn apply_result(&mut self, result: &HandResult) -> Result<(), GameError> {
        if self.applied.as_deref() == Some(result.hand_id.as_str()) {
            return Err(GameError::InvalidContribution(format!(
                "hand {} already settled",
                result.hand_id
            )));
        }
        let mut updated = Vec::with_capacity(result.deltas.len());
        for (id, &delta) in &result.deltas {
            let seat = self.occupied_seat(id)?;
            let stack = self.seats[seat].as_ref().map_or(0, |s| s.stack);
            let new_stack = u32::try_from(i64::from(stack) + delta).map_err(|_| {
                GameError::InvalidContribution(format!(
                    "{} cannot end with {} + {}",
                    id, stack, delta
                ))
            })?;
            updated.push((seat, new_stack));
        }
        for (seat, stack) in updated {
            if let Some(s) = self.seats[seat].as_mut() {
                s.stack = stack;
                if stack == 0 {
                    tracing::info!(seat, player = %s.player_id, "player eliminated");
                }
            }
        }
        self.applied = Some(result.hand_id.clone());
        Ok(())
    }

    /// Abandons an unfinished (typically halted) hand. No chips move.
    pub fn void_hand(&mut self) -> Result<(), GameError> {
        match self.hand.as_ref() {
            Some(h) if !h.is_complete() => {
                tracing::warn!(hand_id = %h.hand_id(), halted = h.halted().is_some(), "hand voided");
                self.hand = None;
                Ok(())
            }
            _ => Err(GameError::NoHandInProgress),
        }
    }

    /// Snapshot for `viewer`; other players' face-down cards stay hidden
    /// unless shown at showdown.
    pub fn view(&self, viewer: Option<&PlayerId>) -> TableView {
        let hand = self.hand.as_ref();
        let revealed = hand.and_then(|h| h.result()).map(|r| &r.revealed);

        let seats = self
            .seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
            .map(|(i, s)| {
                let in_hand = hand.and_then(|h| h.player(&s.player_id));
                let shown = revealed.is_some_and(|r| r.contains_key(&s.player_id));
                let own = viewer == Some(&s.player_id);
                SeatView {
                    seat: i,
                    player_id: s.player_id.clone(),
                    stack: match (in_hand, hand.is_some_and(|h| h.is_complete())) {
                        (Some(p), false) => p.stack(),
                        _ => s.stack,
                    },
                    bet: in_hand.map_or(0, Player::round_bet),
                    status: in_hand.map(Player::status),
                    sitting_out: s.sitting_out,
                    is_dealer: self.button == Some(i),
                    is_small_blind: hand.and_then(|h| h.small_blind_seat()) == Some(i),
                    is_big_blind: hand.and_then(|h| h.big_blind_seat()) == Some(i),
                    hole_cards: in_hand
                        .filter(|_| own || shown)
                        .map(|p| p.hole_cards().to_vec()),
                    face_down: in_hand.map_or(0, |p| p.hole_cards().len()),
                    upcards: in_hand.map_or_else(Vec::new, |p| p.upcards().to_vec()),
                }
            })
            .collect();

        TableView {
            variant: self.config.variant,
            hand_id: hand.map(|h| h.hand_id().to_string()),
            phase: hand.map(HandStateMachine::phase),
            street: hand.map(HandStateMachine::street),
            pot: hand.map_or(0, HandStateMachine::pot_total),
            current_bet: hand.map_or(0, HandStateMachine::current_bet),
            min_raise: hand.map_or(self.config.stakes.bet_unit(), HandStateMachine::min_raise),
            board: hand.map_or_else(Vec::new, |h| h.board().to_vec()),
            seats,
            active_player: hand.and_then(|h| h.to_act().cloned()),
            dealer_seat: self.button,
        }
    }
}
