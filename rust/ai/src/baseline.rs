//! Rule-based policy for every variant.
//!
//! Strength is scored 0-10. On the first betting street it comes from the
//! best two-card starting combination the player holds; afterwards from the
//! category of the best made hand. The score and the price of a call then
//! pick a deterministic action, so simulations replay exactly.

use lounge_engine::cards::Card;
use lounge_engine::config::Variant;
use lounge_engine::engine::HandStateMachine;
use lounge_engine::hand::{best_omaha_hand, combinations, evaluate, rank_showing, Category, RankedHand};
use lounge_engine::logger::Street;
use lounge_engine::player::{PlayerAction, PlayerId};
use lounge_engine::rules::LegalActions;

use crate::{ActionPolicy, fallback};

/// Deterministic baseline bot.
///
/// **First street:** premium and strong starters (big pairs, big aces,
/// trips in stud) raise by the minimum; medium starters call a cheap price;
/// the rest check or fold.
///
/// **Later streets:** two pair or better leads out with a minimum bet, one
/// pair calls reasonable prices, anything weaker gives up to a bet.
///
/// ```rust
/// use lounge_ai::baseline::BaselinePolicy;
/// use lounge_ai::ActionPolicy;
///
/// assert_eq!(BaselinePolicy::new().name(), "BaselinePolicy");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaselinePolicy;

impl BaselinePolicy {
    pub fn new() -> Self {
        Self
    }

    /// Two-card starting strength, 0-10.
    ///
    /// - 9-10: AA, KK, QQ, JJ, AKs
    /// - 7-8: TT-99, AK, AQ, KQs
    /// - 5-6: 88-77, AJ, KQ, suited connectors
    /// - 3-4: small pairs, weak aces, broadway
    /// - 0-2: the rest
    fn starting_pair_strength(c1: Card, c2: Card) -> u8 {
        let r1 = c1.rank.value();
        let r2 = c2.rank.value();
        let (high, low) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
        let suited = c1.suit == c2.suit;
        let pick = |s: u8, o: u8| if suited { s } else { o };

        if r1 == r2 {
            return match high {
                13..=14 => 10,
                11..=12 => 9,
                10 => 8,
                9 => 7,
                8 => 6,
                7 => 5,
                _ => 4,
            };
        }

        match (high, low) {
            (14, 13) => pick(10, 8),
            (14, 12) => pick(8, 7),
            (14, 11) => pick(7, 6),
            (14, 10) => pick(6, 5),
            (14, _) => pick(5, 4),
            (13, 12) => pick(7, 6),
            (13, 11) => pick(6, 5),
            (13, 10) => pick(5, 4),
            (12, 11) => pick(6, 5),
            (12, 10) => pick(5, 4),
            _ if suited && high - low <= 2 => {
                if high >= 9 {
                    5
                } else {
                    4
                }
            }
            _ if high >= 11 && low >= 9 => 4,
            _ => 2,
        }
    }

    /// Best starting strength over every two-card pairing, so Omaha's four
    /// cards and stud's three score on the same scale as hold'em's two.
    /// Rolled-up trips in stud are always premium.
    fn starting_strength(cards: &[Card]) -> u8 {
        if cards.len() >= 3 && rank_showing(cards).category >= Category::ThreeOfAKind {
            return 10;
        }
        combinations(cards, 2)
            .iter()
            .map(|pair| Self::starting_pair_strength(pair[0], pair[1]))
            .max()
            .unwrap_or(0)
    }

    /// Best hand the player can make with what is out, or the best partial
    /// grouping when fewer than five cards are available.
    fn made_hand(variant: Variant, own: &[Card], board: &[Card]) -> Option<RankedHand> {
        if variant == Variant::Omaha {
            return best_omaha_hand(own, board).ok();
        }
        let mut cards = own.to_vec();
        cards.extend_from_slice(board);
        match cards.len() {
            0 => None,
            1..=4 => Some(rank_showing(&cards)),
            5..=7 => evaluate(&cards).ok(),
            // stud with a shared river card: eight to choose from
            _ => combinations(&cards, 7)
                .iter()
                .filter_map(|c| evaluate(c).ok())
                .max(),
        }
    }

    /// Maps a made hand onto the 0-10 scale.
    fn made_strength(hand: &RankedHand) -> u8 {
        let base = match hand.category {
            Category::HighCard => 1,
            Category::OnePair => 3,
            Category::TwoPair => 5,
            Category::ThreeOfAKind => 6,
            Category::Straight => 7,
            Category::Flush => 8,
            Category::FullHouse => 9,
            Category::FourOfAKind | Category::StraightFlush | Category::RoyalFlush => 10,
        };
        let kicker_boost = u8::from(hand.kickers[0] >= 12);
        (base + kicker_boost).min(10)
    }

    /// Share of the final pot the caller would be putting in, inverted:
    /// pot / (pot + call). 1.0 when calling is free.
    fn pot_odds(pot: u64, to_call: u32) -> f32 {
        if to_call == 0 {
            return 1.0;
        }
        pot as f32 / (pot + u64::from(to_call)) as f32
    }

    fn decide(strength: u8, la: &LegalActions, stack: u32, pot: u64) -> PlayerAction {
        let to_call = la.call_amount.unwrap_or(0);
        let raise = la.min_raise_to.map(PlayerAction::Raise);

        if to_call == 0 {
            return match (strength, raise) {
                (7..=10, Some(r)) => r,
                _ => PlayerAction::Check,
            };
        }

        // calling would put the whole stack in
        if to_call >= stack {
            return if strength >= 7 {
                PlayerAction::Call
            } else {
                PlayerAction::Fold
            };
        }

        let odds = Self::pot_odds(pot, to_call);
        let to_call = u64::from(to_call);
        match strength {
            9..=10 => raise.unwrap_or(PlayerAction::Call),
            7..=8 => PlayerAction::Call,
            5..=6 if odds >= 0.3 || to_call <= pot / 4 => PlayerAction::Call,
            3..=4 if odds >= 0.4 || to_call <= pot / 6 => PlayerAction::Call,
            _ => PlayerAction::Fold,
        }
    }
}

impl ActionPolicy for BaselinePolicy {
    fn get_action(&self, hand: &HandStateMachine, player: &PlayerId) -> PlayerAction {
        if hand.to_act() != Some(player) {
            return fallback(hand, player);
        }
        let (Some(seat), Some(la)) = (hand.player(player), hand.legal_actions()) else {
            return fallback(hand, player);
        };

        let variant = hand.variant();
        let own = seat.all_cards();
        let first_street = hand.street() == Street::first(variant);
        let strength = if first_street {
            Self::starting_strength(&own)
        } else {
            // stud up-cards are the player's own; elsewhere only hole cards are
            let held = if variant == Variant::Stud {
                own.as_slice()
            } else {
                seat.hole_cards()
            };
            Self::made_hand(variant, held, hand.board())
                .map(|h| Self::made_strength(&h))
                .unwrap_or_else(|| Self::starting_strength(&own))
        };

        let action = Self::decide(strength, &la, seat.stack(), hand.pot_total());
        tracing::trace!(
            player = %player,
            street = %hand.street(),
            strength,
            ?action,
            "baseline decision"
        );
        action
    }

    fn name(&self) -> &str {
        "BaselinePolicy"
    }
}
