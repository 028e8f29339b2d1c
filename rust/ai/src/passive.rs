//! Calling station: never folds a hand it can see for free, never raises.

use lounge_engine::engine::HandStateMachine;
use lounge_engine::player::{PlayerAction, PlayerId};

use crate::{ActionPolicy, fallback};

#[derive(Debug, Clone, Copy, Default)]
pub struct PassivePolicy;

impl ActionPolicy for PassivePolicy {
    fn get_action(&self, hand: &HandStateMachine, player: &PlayerId) -> PlayerAction {
        if hand.to_act() != Some(player) {
            return fallback(hand, player);
        }
        match hand.legal_actions() {
            Some(la) if la.can_check => PlayerAction::Check,
            Some(_) => PlayerAction::Call,
            None => fallback(hand, player),
        }
    }

    fn name(&self) -> &str {
        "PassivePolicy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lounge_engine::config::TableConfig;
    use lounge_engine::deck::Deck;
    use lounge_engine::player::Player;

    fn hand() -> HandStateMachine {
        let players = vec![
            Player::new(PlayerId::new("a"), 0, 500),
            Player::new(PlayerId::new("b"), 1, 500),
        ];
        let mut deck = Deck::new_with_seed(5);
        deck.shuffle();
        HandStateMachine::new(&TableConfig::holdem(5, 10), "p", players, 0, deck).unwrap()
    }

    #[test]
    fn calls_the_blind_then_checks() {
        let mut h = hand();
        let a = PlayerId::new("a");
        let b = PlayerId::new("b");
        assert_eq!(PassivePolicy.get_action(&h, &a), PlayerAction::Call);
        h.act(&a, PlayerAction::Call).unwrap();
        assert_eq!(PassivePolicy.get_action(&h, &b), PlayerAction::Check);
    }

    #[test]
    fn off_turn_request_gets_a_fold() {
        let h = hand();
        assert_eq!(
            PassivePolicy.get_action(&h, &PlayerId::new("b")),
            PlayerAction::Fold
        );
    }
}
