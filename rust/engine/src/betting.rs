//! One betting round: turn order, legal actions, raise sizing and completion.
//!
//! The round indexes into the hand's player list, which is in seat order, so
//! "clockwise" is simply increasing index modulo the player count.

use serde::{Deserialize, Serialize};

use crate::errors::{GameError, IllegalAction};
use crate::logger::Street;
use crate::player::{Player, PlayerAction};
use crate::pot::PotManager;
use crate::rules::{legal_actions, validate_action, ActionContext, LegalActions, ValidatedAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Index of the player whose turn it is
    AwaitingAction(usize),
    RoundComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingRound {
    street: Street,
    current_bet: u32,
    min_raise: u32,
    /// Floor for the raise increment (big blind / full bet)
    bet_unit: u32,
    last_aggressor: Option<usize>,
    /// Still owes a decision since the last bet level change
    pending: Vec<bool>,
    can_raise: Vec<bool>,
    state: RoundState,
}

/// What an accepted action did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAction {
    pub player: usize,
    pub action: ValidatedAction,
    /// Chips moved from stack to pot
    pub put_in: u32,
    /// Player's round bet afterwards
    pub round_total: u32,
    pub all_in: bool,
    pub round_complete: bool,
}

impl BettingRound {
    /// Opens a round where `first` is the first seat allowed to act (it is
    /// skipped if it cannot act). `current_bet` is what forced bets already
    /// require; `min_raise` the opening increment.
    pub fn new(
        street: Street,
        players: &[Player],
        first: usize,
        current_bet: u32,
        min_raise: u32,
        bet_unit: u32,
    ) -> Self {
        let mut round = Self {
            street,
            current_bet,
            min_raise: min_raise.max(1),
            bet_unit: bet_unit.max(1),
            last_aggressor: None,
            pending: players.iter().map(Player::can_act).collect(),
            can_raise: vec![true; players.len()],
            state: RoundState::RoundComplete,
        };
        round.state = match round.next_actor(players, first, true) {
            Some(i) => RoundState::AwaitingAction(i),
            None => RoundState::RoundComplete,
        };
        round
    }

    pub fn street(&self) -> Street {
        self.street
    }
    pub fn state(&self) -> RoundState {
        self.state
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn min_raise(&self) -> u32 {
        self.min_raise
    }
    pub fn last_aggressor(&self) -> Option<usize> {
        self.last_aggressor
    }

    pub fn current_actor(&self) -> Option<usize> {
        match self.state {
            RoundState::AwaitingAction(i) => Some(i),
            RoundState::RoundComplete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == RoundState::RoundComplete
    }

    pub fn context_for(&self, player: &Player, idx: usize) -> ActionContext {
        ActionContext {
            stack: player.stack(),
            round_bet: player.round_bet(),
            current_bet: self.current_bet,
            min_raise: self.min_raise,
            can_raise: self.can_raise.get(idx).copied().unwrap_or(false),
        }
    }

    pub fn legal_actions(&self, players: &[Player]) -> Option<LegalActions> {
        let i = self.current_actor()?;
        Some(legal_actions(&self.context_for(&players[i], i)))
    }

    /// Applies `action` for the player at index `idx`.
    ///
    /// Validation happens before any chips move, so a rejected action leaves
    /// players, pot and round untouched.
    pub fn act(
        &mut self,
        players: &mut [Player],
        pot: &mut PotManager,
        idx: usize,
        action: PlayerAction,
    ) -> Result<AppliedAction, GameError> {
        let expected = self.current_actor().ok_or(IllegalAction::NoBettingRound)?;
        if expected != idx {
            let actual = players
                .get(idx)
                .map(|p| p.id().clone())
                .ok_or_else(|| GameError::InvalidContribution(format!("no player at {}", idx)))?;
            return Err(IllegalAction::NotPlayersTurn {
                expected: players[expected].id().clone(),
                actual,
            }
            .into());
        }

        let ctx = self.context_for(&players[idx], idx);
        let validated = validate_action(&ctx, action)?;
        let id = players[idx].id().clone();

        let put_in = match validated {
            ValidatedAction::Fold => {
                players[idx].fold();
                pot.fold(&id);
                0
            }
            ValidatedAction::Check => 0,
            ValidatedAction::Call(amount) | ValidatedAction::AllIn(amount) => amount,
            ValidatedAction::Bet(to) | ValidatedAction::Raise(to) => to - ctx.round_bet,
        };
        if put_in > 0 {
            players[idx].commit(put_in)?;
            pot.contribute(&id, put_in)?;
        }

        let round_total = players[idx].round_bet();
        if round_total > self.current_bet {
            let raise_by = round_total - self.current_bet;
            let full = raise_by >= self.min_raise;
            self.current_bet = round_total;
            if full {
                self.min_raise = raise_by.max(self.bet_unit);
                self.last_aggressor = Some(idx);
            }
            self.reopen(players, idx, full);
        }
        self.pending[idx] = false;

        self.state = match self.next_actor(players, idx, false) {
            Some(next) => RoundState::AwaitingAction(next),
            None => RoundState::RoundComplete,
        };

        Ok(AppliedAction {
            player: idx,
            action: validated,
            put_in,
            round_total,
            all_in: players[idx].stack() == 0 && players[idx].is_live(),
            round_complete: self.is_complete(),
        })
    }

    /// A bet level change puts everyone else who can act back on the hook.
    /// After an incomplete all-in raise, players who had already acted may
    /// only call or fold.
    fn reopen(&mut self, players: &[Player], actor: usize, full: bool) {
        for (j, p) in players.iter().enumerate() {
            if j == actor || !p.can_act() {
                continue;
            }
            if full {
                self.pending[j] = true;
                self.can_raise[j] = true;
            } else if !self.pending[j] {
                self.pending[j] = true;
                self.can_raise[j] = false;
            }
        }
    }

    fn next_actor(&self, players: &[Player], from: usize, inclusive: bool) -> Option<usize> {
        let n = players.len();
        if n == 0 || players.iter().filter(|p| p.is_live()).count() <= 1 {
            return None;
        }
        let can_act = players.iter().filter(|p| p.can_act()).count();
        let start = if inclusive { from } else { from + 1 };
        (0..n)
            .map(|step| (start + step) % n)
            .find(|&i| self.needs_action(&players[i], i, can_act))
    }

    fn needs_action(&self, p: &Player, i: usize, can_act: usize) -> bool {
        if !self.pending[i] || !p.can_act() {
            return false;
        }
        // a lone player who has matched the bet has nobody left to act against
        !(can_act == 1 && p.round_bet() >= self.current_bet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerId, PlayerStatus};

    fn table(stacks: &[u32]) -> (Vec<Player>, PotManager) {
        let players: Vec<Player> = stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(PlayerId::new(format!("p{}", i)), i, s))
            .collect();
        let pot = PotManager::new(players.iter().map(|p| p.id().clone()).collect());
        (players, pot)
    }

    fn post(players: &mut [Player], pot: &mut PotManager, i: usize, amount: u32) {
        players[i].commit(amount).unwrap();
        pot.contribute(&players[i].id().clone(), amount).unwrap();
    }

    #[test]
    fn heads_up_limp_and_check_closes_preflop() {
        // p0 is button/small blind, p1 big blind
        let (mut players, mut pot) = table(&[1000, 1000]);
        post(&mut players, &mut pot, 0, 5);
        post(&mut players, &mut pot, 1, 10);
        let mut round = BettingRound::new(Street::Preflop, &players, 0, 10, 10, 10);
        assert_eq!(round.state(), RoundState::AwaitingAction(0));

        let a = round.act(&mut players, &mut pot, 0, PlayerAction::Call).unwrap();
        assert_eq!(a.put_in, 5);
        assert!(!a.round_complete);
        assert_eq!(round.state(), RoundState::AwaitingAction(1));

        let b = round.act(&mut players, &mut pot, 1, PlayerAction::Check).unwrap();
        assert!(b.round_complete);
        assert_eq!(pot.pending(), 20);
    }

    #[test]
    fn out_of_turn_is_rejected_without_state_change() {
        let (mut players, mut pot) = table(&[100, 100, 100]);
        let mut round = BettingRound::new(Street::Flop, &players, 0, 0, 10, 10);
        let before = round.clone();
        let err = round
            .act(&mut players, &mut pot, 2, PlayerAction::Check)
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::IllegalAction(IllegalAction::NotPlayersTurn { .. })
        ));
        assert_eq!(round, before);
    }

    #[test]
    fn raise_reopens_action_and_sets_increment() {
        let (mut players, mut pot) = table(&[1000, 1000, 1000]);
        let mut round = BettingRound::new(Street::Flop, &players, 0, 0, 10, 10);
        round.act(&mut players, &mut pot, 0, PlayerAction::Bet(30)).unwrap();
        round.act(&mut players, &mut pot, 1, PlayerAction::Raise(100)).unwrap();
        assert_eq!(round.min_raise(), 70);
        assert_eq!(round.last_aggressor(), Some(1));
        let err = round
            .act(&mut players, &mut pot, 2, PlayerAction::Raise(150))
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::IllegalAction(IllegalAction::RaiseTooSmall { minimum: 170, .. })
        ));
        round.act(&mut players, &mut pot, 2, PlayerAction::Call).unwrap();
        // p0 must respond to the raise
        assert_eq!(round.state(), RoundState::AwaitingAction(0));
        let done = round.act(&mut players, &mut pot, 0, PlayerAction::Call).unwrap();
        assert!(done.round_complete);
        assert_eq!(pot.pending(), 300);
    }

    #[test]
    fn incomplete_all_in_raise_does_not_reopen_raising() {
        let (mut players, mut pot) = table(&[1000, 130, 1000]);
        let mut round = BettingRound::new(Street::Flop, &players, 0, 0, 10, 10);
        round.act(&mut players, &mut pot, 0, PlayerAction::Bet(100)).unwrap();
        let a = round.act(&mut players, &mut pot, 1, PlayerAction::AllIn).unwrap();
        assert!(a.all_in);
        assert_eq!(round.current_bet(), 130);
        assert_eq!(round.min_raise(), 100);
        // p2 has not acted yet and may still raise
        round.act(&mut players, &mut pot, 2, PlayerAction::Call).unwrap();
        // p0 already acted at 100: call or fold only
        let err = round
            .act(&mut players, &mut pot, 0, PlayerAction::Raise(400))
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::IllegalAction(IllegalAction::RaisingClosed)
        ));
        let done = round.act(&mut players, &mut pot, 0, PlayerAction::Call).unwrap();
        assert!(done.round_complete);
    }

    #[test]
    fn fold_to_one_player_completes_round() {
        let (mut players, mut pot) = table(&[100, 100, 100]);
        let mut round = BettingRound::new(Street::Flop, &players, 0, 0, 10, 10);
        round.act(&mut players, &mut pot, 0, PlayerAction::Bet(20)).unwrap();
        round.act(&mut players, &mut pot, 1, PlayerAction::Fold).unwrap();
        let done = round.act(&mut players, &mut pot, 2, PlayerAction::Fold).unwrap();
        assert!(done.round_complete);
        assert_eq!(players[1].status(), PlayerStatus::Folded);
    }

    #[test]
    fn all_in_players_are_skipped() {
        let (mut players, mut pot) = table(&[100, 0, 100]);
        // p1 went all-in earlier in the hand
        players[1] = {
            let mut p = Player::new(PlayerId::new("p1"), 1, 50);
            p.commit(50).unwrap();
            p.reset_round();
            p
        };
        let mut round = BettingRound::new(Street::Turn, &players, 1, 0, 10, 10);
        assert_eq!(round.state(), RoundState::AwaitingAction(2));
        round.act(&mut players, &mut pot, 2, PlayerAction::Check).unwrap();
        assert_eq!(round.state(), RoundState::AwaitingAction(0));
    }

    #[test]
    fn lone_player_facing_no_bet_does_not_act() {
        let (mut players, _) = table(&[100, 50]);
        players[1].commit(50).unwrap();
        players[1].reset_round();
        let round = BettingRound::new(Street::River, &players, 0, 0, 10, 10);
        assert!(round.is_complete());
    }
}
