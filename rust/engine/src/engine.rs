use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::betting::BettingRound;
use crate::cards::Card;
use crate::config::{ShowdownPolicy, Stakes, TableConfig, Variant};
use crate::deck::Deck;
use crate::errors::{GameError, IllegalAction};
use crate::events::TableEvent;
use crate::hand::{self, RankedHand};
use crate::logger::{ActionRecord, HandAction, HandRecord, SeatRecord, ShowdownInfo, Street};
use crate::player::{Player, PlayerAction, PlayerId, PlayerStatus};
use crate::pot::{Pot, PotManager};
use crate::rules::{LegalActions, ValidatedAction};

/// Where a hand is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "street", rename_all = "snake_case")]
pub enum Phase {
    Dealing,
    Betting(Street),
    Showdown,
    Complete,
    /// Stopped by an internal invariant violation; nothing was paid out
    Halted,
}

/// A hand turned face up at showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedHand {
    pub cards: Vec<Card>,
    pub hand: RankedHand,
    pub description: String,
}

/// Final outcome of a hand. Deltas always sum to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_id: String,
    /// Net chip change per participant
    pub deltas: BTreeMap<PlayerId, i64>,
    /// Gross amount won from the pots
    pub winnings: BTreeMap<PlayerId, u32>,
    pub revealed: BTreeMap<PlayerId, RevealedHand>,
    pub board: Vec<Card>,
    /// Pots as they stood when paid out
    pub pots: Vec<Pot>,
    /// Everyone else folded; no cards were shown
    pub uncontested: bool,
    pub record: HandRecord,
}

/// Returned for every accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub seq: u64,
    pub action: HandAction,
    pub phase: Phase,
    pub next_to_act: Option<PlayerId>,
}

/// Runs one hand from the deal to the payout.
///
/// Players are held clockwise starting with the first seat left of the
/// button, so the button (when dealt in) is last. That order drives blinds,
/// turn order and odd-chip payouts.
///
/// # Examples
///
/// ```
/// use lounge_engine::config::TableConfig;
/// use lounge_engine::deck::Deck;
/// use lounge_engine::engine::{HandStateMachine, Phase};
/// use lounge_engine::logger::Street;
/// use lounge_engine::player::{Player, PlayerAction, PlayerId};
///
/// let cfg = TableConfig::holdem(5, 10);
/// let players = vec![
///     Player::new(PlayerId::new("alice"), 0, 1000),
///     Player::new(PlayerId::new("bob"), 1, 1000),
/// ];
/// let mut deck = Deck::new_with_seed(7);
/// deck.shuffle();
/// // alice has the button and posts the small blind
/// let mut hand = HandStateMachine::new(&cfg, "demo-1", players, 0, deck).unwrap();
/// hand.act(&PlayerId::new("alice"), PlayerAction::Call).unwrap();
/// hand.act(&PlayerId::new("bob"), PlayerAction::Check).unwrap();
/// assert_eq!(hand.phase(), Phase::Betting(Street::Flop));
/// assert_eq!(hand.pot_total(), 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandStateMachine {
    hand_id: String,
    config: TableConfig,
    button_seat: usize,
    deck: Deck,
    players: Vec<Player>,
    seats: Vec<SeatRecord>,
    board: Vec<Card>,
    pot: PotManager,
    street: Street,
    round: Option<BettingRound>,
    phase: Phase,
    small_blind_seat: Option<usize>,
    big_blind_seat: Option<usize>,
    seq: u64,
    actions: Vec<ActionRecord>,
    events: Vec<TableEvent>,
    result: Option<HandResult>,
    halted: Option<GameError>,
}

impl HandStateMachine {
    /// Deals a new hand, posts forced bets and opens the first betting
    /// round. Players without chips are left out.
    pub fn new(
        config: &TableConfig,
        hand_id: impl Into<String>,
        mut players: Vec<Player>,
        button_seat: usize,
        deck: Deck,
    ) -> Result<Self, GameError> {
        config.validate()?;
        players.retain(|p| p.stack() > 0);
        if players.len() < 2 {
            return Err(GameError::InsufficientPlayers {
                available: players.len(),
            });
        }
        if players.len() > config.variant.seat_limit() {
            return Err(GameError::InvalidConfig(format!(
                "{} players cannot be dealt {}",
                players.len(),
                config.variant.name()
            )));
        }
        for (i, p) in players.iter().enumerate() {
            if players[..i].iter().any(|q| q.id() == p.id()) {
                return Err(GameError::PlayerAlreadySeated(p.id().clone()));
            }
        }
        players.sort_by_key(|p| (p.seat() <= button_seat, p.seat()));

        let seats = players
            .iter()
            .map(|p| SeatRecord {
                player_id: p.id().clone(),
                seat: p.seat(),
                starting_stack: p.stack(),
            })
            .collect::<Vec<_>>();
        let order = players.iter().map(|p| p.id().clone()).collect();
        let hand_id = hand_id.into();

        let mut hsm = Self {
            events: vec![TableEvent::HandStarted {
                hand_id: hand_id.clone(),
                variant: config.variant,
                button: button_seat,
                seats: seats.clone(),
            }],
            hand_id,
            config: config.clone(),
            button_seat,
            deck,
            players,
            seats,
            board: Vec::with_capacity(5),
            pot: PotManager::new(order),
            street: Street::first(config.variant),
            round: None,
            phase: Phase::Dealing,
            small_blind_seat: None,
            big_blind_seat: None,
            seq: 0,
            actions: Vec::new(),
            result: None,
            halted: None,
        };
        tracing::info!(
            hand_id = %hsm.hand_id,
            variant = %hsm.config.variant,
            players = hsm.players.len(),
            button = button_seat,
            "hand started"
        );

        hsm.deal_first_street()?;
        hsm.advance()?;
        Ok(hsm)
    }

    fn deal_first_street(&mut self) -> Result<(), GameError> {
        let ante = self.config.stakes.ante();
        if ante > 0 {
            for i in 0..self.players.len() {
                let amount = ante.min(self.players[i].stack());
                let id = self.players[i].id().clone();
                self.players[i].commit_dead(amount)?;
                self.pot.post_dead(&id, amount)?;
                self.record(i, HandAction::Ante(amount));
            }
        }

        let n = self.players.len();
        match self.config.stakes {
            Stakes::Blinds { small, big, .. } => {
                for _ in 0..self.config.variant.initial_hole_cards() {
                    for i in 0..n {
                        let c = self.draw()?;
                        self.players[i].give_card(c);
                    }
                }
                for p in &self.players {
                    self.events.push(TableEvent::CardsDealt {
                        player_id: p.id().clone(),
                        street: Street::Preflop,
                        face_down: p.hole_cards().len(),
                        face_up: Vec::new(),
                    });
                }

                // heads-up the button posts the small blind and acts first
                let (sb, bb, first) = if n == 2 { (1, 0, 1) } else { (0, 1, 2 % n) };
                self.small_blind_seat = Some(self.players[sb].seat());
                self.big_blind_seat = Some(self.players[bb].seat());
                self.post_forced(sb, small, HandAction::SmallBlind)?;
                self.post_forced(bb, big, HandAction::BigBlind)?;
                // a short big blind still sets the full price; a big blind
                // already all-in from the ante sets none
                let opening = if self.players[bb].round_bet() > 0 {
                    big
                } else {
                    self.players.iter().map(Player::round_bet).max().unwrap_or(0)
                };
                self.round = Some(BettingRound::new(
                    Street::Preflop,
                    &self.players,
                    first,
                    opening,
                    big,
                    big,
                ));
            }
            Stakes::Stud { bring_in, bet, .. } => {
                for face_up in [false, false, true] {
                    for i in 0..n {
                        let c = self.draw()?;
                        if face_up {
                            self.players[i].expose_card(c);
                        } else {
                            self.players[i].give_card(c);
                        }
                    }
                }
                for p in &self.players {
                    self.events.push(TableEvent::CardsDealt {
                        player_id: p.id().clone(),
                        street: Street::Third,
                        face_down: p.hole_cards().len(),
                        face_up: p.upcards().to_vec(),
                    });
                }

                let round = match self.lowest_upcard() {
                    Some(low) => {
                        self.post_forced(low, bring_in, HandAction::BringIn)?;
                        let posted = self.players[low].round_bet();
                        BettingRound::new(
                            Street::Third,
                            &self.players,
                            (low + 1) % n,
                            posted,
                            bet - posted,
                            bet,
                        )
                    }
                    // at most one player has chips behind after the ante
                    None => BettingRound::new(Street::Third, &self.players, 0, 0, bet, bet),
                };
                self.round = Some(round);
            }
        }
        Ok(())
    }

    fn post_forced(
        &mut self,
        idx: usize,
        amount: u32,
        kind: fn(u32) -> HandAction,
    ) -> Result<(), GameError> {
        let amount = amount.min(self.players[idx].stack());
        if amount == 0 {
            return Ok(());
        }
        let id = self.players[idx].id().clone();
        self.players[idx].commit(amount)?;
        self.pot.contribute(&id, amount)?;
        self.record(idx, kind(self.players[idx].round_bet()));
        Ok(())
    }

    /// Bring-in goes to the lowest up-card among players with chips behind;
    /// suits break ties, clubs lowest. Nobody brings in without an opponent
    /// who can still act.
    fn lowest_upcard(&self) -> Option<usize> {
        if self.players.iter().filter(|p| p.can_act()).count() < 2 {
            return None;
        }
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.can_act())
            .filter_map(|(i, p)| p.upcards().first().map(|c| (i, (c.rank, c.suit))))
            .min_by_key(|&(_, key)| key)
            .map(|(i, _)| i)
    }

    /// Best exposed hand among live players; the earliest seat left of the
    /// button wins ties.
    fn best_showing(&self) -> usize {
        let mut best: Option<(usize, RankedHand)> = None;
        for (i, p) in self.players.iter().enumerate().filter(|(_, p)| p.is_live()) {
            let showing = hand::rank_showing(p.upcards());
            if best.is_none_or(|(_, b)| showing > b) {
                best = Some((i, showing));
            }
        }
        best.map(|(i, _)| i).unwrap_or(0)
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        self.deck.deal_card().ok_or(GameError::DeckExhausted {
            requested: 1,
            remaining: 0,
        })
    }

    fn record(&mut self, idx: usize, action: HandAction) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        let player = &self.players[idx];
        self.actions.push(ActionRecord {
            seq,
            player_id: player.id().clone(),
            street: self.street,
            action,
        });
        self.events.push(TableEvent::ActionTaken {
            seq,
            player_id: player.id().clone(),
            street: self.street,
            action,
            stack: player.stack(),
        });
        tracing::debug!(
            hand_id = %self.hand_id,
            seq,
            player = %player.id(),
            street = %self.street,
            ?action,
            "action applied"
        );
        seq
    }

    /// Applies a player's action. Rejected actions change nothing.
    pub fn act(
        &mut self,
        player: &PlayerId,
        action: PlayerAction,
    ) -> Result<ActionOutcome, GameError> {
        self.ensure_running()?;
        let idx = self.index_of(player)?;
        match self.players[idx].status() {
            PlayerStatus::Folded => return Err(IllegalAction::PlayerFolded(player.clone()).into()),
            PlayerStatus::AllIn => return Err(IllegalAction::PlayerAllIn(player.clone()).into()),
            PlayerStatus::Active | PlayerStatus::SittingOut => {}
        }
        let round = self.round.as_mut().ok_or(IllegalAction::NoBettingRound)?;
        let applied = match round.act(&mut self.players, &mut self.pot, idx, action) {
            Ok(applied) => applied,
            Err(e) if e.is_fatal() => return Err(self.halt(e)),
            Err(e) => return Err(e),
        };
        let bets = self.players.iter().map(|p| (p.id(), p.round_bet()));
        if let Err(e) = self.pot.verify_round(bets) {
            return Err(self.halt(e));
        }

        let logged = match applied.action {
            ValidatedAction::Fold => HandAction::Fold,
            ValidatedAction::Check => HandAction::Check,
            ValidatedAction::Call(added) => HandAction::Call(added),
            ValidatedAction::Bet(to) => HandAction::Bet(to),
            ValidatedAction::Raise(to) => HandAction::Raise(to),
            ValidatedAction::AllIn(added) => HandAction::AllIn(added),
        };
        let seq = self.record(idx, logged);
        if let Err(e) = self.advance() {
            return Err(self.halt(e));
        }

        Ok(ActionOutcome {
            seq,
            action: logged,
            phase: self.phase,
            next_to_act: self.to_act().cloned(),
        })
    }

    /// Like [`act`](Self::act), but only if `seq` is the next sequence
    /// number. Rejects duplicated or reordered submissions.
    pub fn act_at(
        &mut self,
        seq: u64,
        player: &PlayerId,
        action: PlayerAction,
    ) -> Result<ActionOutcome, GameError> {
        self.ensure_running()?;
        if seq != self.seq {
            return Err(IllegalAction::StaleSequence {
                expected: self.seq,
                got: seq,
            }
            .into());
        }
        self.act(player, action)
    }

    /// The action applied when `player` runs out of time: check if that is
    /// legal, otherwise fold.
    pub fn timeout_action(&self, player: &PlayerId) -> Result<PlayerAction, GameError> {
        self.ensure_running()?;
        let idx = self.index_of(player)?;
        let round = self.round.as_ref().ok_or(IllegalAction::NoBettingRound)?;
        match round.current_actor() {
            Some(i) if i == idx => {}
            Some(i) => {
                return Err(IllegalAction::NotPlayersTurn {
                    expected: self.players[i].id().clone(),
                    actual: player.clone(),
                }
                .into())
            }
            None => return Err(IllegalAction::NoBettingRound.into()),
        }
        let can_check = round
            .legal_actions(&self.players)
            .is_some_and(|la| la.can_check);
        Ok(if can_check {
            PlayerAction::Check
        } else {
            PlayerAction::Fold
        })
    }

    pub fn apply_timeout(&mut self, player: &PlayerId) -> Result<ActionOutcome, GameError> {
        let action = self.timeout_action(player)?;
        self.act(player, action)
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if let Some(e) = &self.halted {
            return Err(e.clone());
        }
        if self.phase == Phase::Complete {
            return Err(IllegalAction::HandComplete.into());
        }
        Ok(())
    }

    fn halt(&mut self, e: GameError) -> GameError {
        tracing::error!(hand_id = %self.hand_id, error = %e, "hand halted");
        self.halted = Some(e.clone());
        self.round = None;
        self.phase = Phase::Halted;
        e
    }

    fn index_of(&self, player: &PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id() == player)
            .ok_or_else(|| IllegalAction::PlayerNotInHand(player.clone()).into())
    }

    /// Moves the hand forward until someone has to act or it is over.
    fn advance(&mut self) -> Result<(), GameError> {
        loop {
            let live: Vec<usize> = (0..self.players.len())
                .filter(|&i| self.players[i].is_live())
                .collect();
            match live.as_slice() {
                [] => {
                    return Err(GameError::InvalidContribution(
                        "no live player left in the hand".into(),
                    ))
                }
                [winner] => return self.finish_uncontested(*winner),
                _ => {}
            }

            if let Some(round) = &self.round {
                if !round.is_complete() {
                    self.phase = Phase::Betting(self.street);
                    return Ok(());
                }
                self.close_round();
            }

            let Some(next) = self.street.next() else {
                return self.showdown();
            };
            self.deal_street(next)?;
            self.open_round(next);
        }
    }

    fn close_round(&mut self) {
        self.round = None;
        for p in &mut self.players {
            p.reset_round();
        }
        let pots = self.pot.settle_round().to_vec();
        tracing::debug!(hand_id = %self.hand_id, street = %self.street, pots = pots.len(), "round complete");
        self.events.push(TableEvent::RoundComplete {
            street: self.street,
        });
        self.events.push(TableEvent::PotsSettled { pots });
    }

    /// No round opens when at most one player can still bet; the cards are
    /// then run out.
    fn open_round(&mut self, street: Street) {
        let can_act = self.players.iter().filter(|p| p.can_act()).count();
        if can_act <= 1 {
            self.round = None;
            return;
        }
        let unit = self.config.stakes.bet_unit();
        let first = if self.config.variant.is_stud() {
            self.best_showing()
        } else {
            0
        };
        self.round = Some(BettingRound::new(street, &self.players, first, 0, unit, unit));
    }

    fn deal_street(&mut self, street: Street) -> Result<(), GameError> {
        self.street = street;
        if self.config.variant.is_stud() {
            let live: Vec<usize> = (0..self.players.len())
                .filter(|&i| self.players[i].is_live())
                .collect();
            if street == Street::Seventh && self.deck.remaining() < live.len() {
                // not enough cards left: one shared card plays for everybody
                let c = self.draw()?;
                self.board.push(c);
                self.events.push(TableEvent::StreetAdvanced {
                    street,
                    revealed: vec![c],
                });
            } else {
                for i in live {
                    let c = self.draw()?;
                    let p = &mut self.players[i];
                    let face_up = if street == Street::Seventh {
                        p.give_card(c);
                        Vec::new()
                    } else {
                        p.expose_card(c);
                        vec![c]
                    };
                    self.events.push(TableEvent::CardsDealt {
                        player_id: p.id().clone(),
                        street,
                        face_down: usize::from(face_up.is_empty()),
                        face_up,
                    });
                }
                self.events.push(TableEvent::StreetAdvanced {
                    street,
                    revealed: Vec::new(),
                });
            }
        } else {
            self.deck.burn_card()?;
            let n = if street == Street::Flop { 3 } else { 1 };
            let cards = self.deck.deal(n)?;
            self.board.extend_from_slice(&cards);
            self.events.push(TableEvent::StreetAdvanced {
                street,
                revealed: cards,
            });
        }
        tracing::debug!(hand_id = %self.hand_id, street = %street, "street dealt");
        Ok(())
    }

    fn showdown(&mut self) -> Result<(), GameError> {
        self.phase = Phase::Showdown;
        let mut hands = BTreeMap::new();
        for p in self.players.iter().filter(|p| p.is_live()) {
            let ranked = match self.config.variant {
                Variant::Omaha => hand::best_omaha_hand(p.hole_cards(), &self.board)?,
                Variant::Holdem | Variant::Stud => {
                    let mut cards = p.all_cards();
                    cards.extend_from_slice(&self.board);
                    hand::evaluate(&cards)?
                }
            };
            hands.insert(p.id().clone(), ranked);
        }
        let winnings = self.pot.distribute(&hands)?;

        let show_all = self.config.showdown == ShowdownPolicy::ShowAll;
        let revealed = self
            .players
            .iter()
            .filter_map(|p| {
                let ranked = hands.get(p.id())?;
                let won = winnings.get(p.id()).is_some_and(|&w| w > 0);
                (show_all || won).then(|| {
                    (
                        p.id().clone(),
                        RevealedHand {
                            cards: p.all_cards(),
                            hand: *ranked,
                            description: ranked.describe(),
                        },
                    )
                })
            })
            .collect();
        self.finish(winnings, revealed, false)
    }

    fn finish_uncontested(&mut self, winner: usize) -> Result<(), GameError> {
        let id = self.players[winner].id().clone();
        let winnings = self.pot.award_uncontested(&id)?;
        self.finish(winnings, BTreeMap::new(), true)
    }

    fn finish(
        &mut self,
        winnings: BTreeMap<PlayerId, u32>,
        revealed: BTreeMap<PlayerId, RevealedHand>,
        uncontested: bool,
    ) -> Result<(), GameError> {
        self.round = None;
        for p in &mut self.players {
            p.reset_round();
        }

        let deltas: BTreeMap<PlayerId, i64> = self
            .players
            .iter()
            .map(|p| {
                let won = winnings.get(p.id()).copied().unwrap_or(0);
                (
                    p.id().clone(),
                    i64::from(won) - i64::from(p.total_contribution()),
                )
            })
            .collect();
        let net: i64 = deltas.values().sum();
        if net != 0 {
            return Err(GameError::InvalidContribution(format!(
                "hand deltas sum to {}",
                net
            )));
        }

        let winners: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| winnings.get(p.id()).is_some_and(|&w| w > 0))
            .map(|p| p.id().clone())
            .collect();
        let summary = match winners.as_slice() {
            [one] => match revealed.get(one) {
                Some(r) => format!("{} wins with {}", one, r.description),
                None => format!("{} wins", one),
            },
            many => format!(
                "split between {}",
                many.iter().map(PlayerId::as_str).collect::<Vec<_>>().join(", ")
            ),
        };
        let showdown = (!uncontested).then(|| ShowdownInfo {
            winners: winners.clone(),
            notes: Some(summary.clone()),
        });

        let record = HandRecord {
            hand_id: self.hand_id.clone(),
            seed: self.deck.seed(),
            variant: self.config.variant,
            button: self.button_seat,
            seats: self.seats.clone(),
            actions: self.actions.clone(),
            board: self.board.clone(),
            deltas: deltas.clone(),
            result: Some(summary),
            ts: None,
            meta: None,
            showdown,
        };
        self.events.push(TableEvent::HandComplete {
            hand_id: self.hand_id.clone(),
            deltas: deltas.clone(),
            revealed: revealed.clone(),
            uncontested,
        });
        self.result = Some(HandResult {
            hand_id: self.hand_id.clone(),
            deltas,
            winnings,
            revealed,
            board: self.board.clone(),
            pots: self.pot.pots().to_vec(),
            uncontested,
            record,
        });
        self.phase = Phase::Complete;
        tracing::info!(hand_id = %self.hand_id, uncontested, winners = winners.len(), "hand complete");
        Ok(())
    }

    pub fn hand_id(&self) -> &str {
        &self.hand_id
    }
    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn variant(&self) -> Variant {
        self.config.variant
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn button_seat(&self) -> usize {
        self.button_seat
    }
    pub fn small_blind_seat(&self) -> Option<usize> {
        self.small_blind_seat
    }
    pub fn big_blind_seat(&self) -> Option<usize> {
        self.big_blind_seat
    }

    /// Clockwise from the first seat left of the button.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn pots(&self) -> &[Pot] {
        self.pot.pots()
    }

    /// Every chip put in this hand, live round included.
    pub fn pot_total(&self) -> u64 {
        self.pot.total_collected()
    }

    pub fn current_bet(&self) -> u32 {
        self.round.as_ref().map_or(0, BettingRound::current_bet)
    }

    pub fn min_raise(&self) -> u32 {
        self.round
            .as_ref()
            .map_or(self.config.stakes.bet_unit(), BettingRound::min_raise)
    }

    pub fn to_act(&self) -> Option<&PlayerId> {
        let i = self.round.as_ref()?.current_actor()?;
        Some(self.players[i].id())
    }

    pub fn legal_actions(&self) -> Option<LegalActions> {
        self.round.as_ref()?.legal_actions(&self.players)
    }

    /// Sequence number the next action will receive.
    pub fn next_seq(&self) -> u64 {
        self.seq
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn halted(&self) -> Option<&GameError> {
        self.halted.as_ref()
    }

    pub fn result(&self) -> Option<&HandResult> {
        self.result.as_ref()
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// Takes the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }
}
