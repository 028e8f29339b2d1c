use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use lounge_engine::cards::{full_deck, Card};
use lounge_engine::config::TableConfig;
use lounge_engine::deck::Deck;
use lounge_engine::hand::{compare_hands, evaluate};
use lounge_engine::player::{PlayerAction, PlayerId};
use lounge_engine::pot::PotManager;
use lounge_engine::rules::LegalActions;
use lounge_engine::table::TableEngine;
use proptest::prelude::*;

fn seven_cards() -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence(full_deck(), 7)
}

/// Maps a random choice onto an action that is legal for `la`.
fn pick(la: &LegalActions, choice: u8, frac: u32) -> PlayerAction {
    let passive = if la.can_check {
        PlayerAction::Check
    } else {
        PlayerAction::Call
    };
    match (choice, la.min_raise_to, la.max_raise_to) {
        (0, _, _) => PlayerAction::Fold,
        (2, Some(min), Some(max)) => {
            let span = u64::from(max - min) * u64::from(frac) / 100;
            PlayerAction::Raise(min + span as u32)
        }
        (3, Some(_), Some(_)) => PlayerAction::AllIn,
        _ => passive,
    }
}

proptest! {
    #[test]
    fn any_seed_shuffles_a_full_deck(seed in any::<u64>()) {
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        let cards = deck.deal(52).unwrap();
        let unique: HashSet<Card> = cards.iter().copied().collect();
        prop_assert_eq!(unique.len(), 52);
        prop_assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn comparison_is_a_total_order(a in seven_cards(), b in seven_cards(), c in seven_cards()) {
        let (a, b, c) = (
            evaluate(&a).unwrap(),
            evaluate(&b).unwrap(),
            evaluate(&c).unwrap(),
        );
        prop_assert_eq!(compare_hands(&a, &a), Ordering::Equal);
        prop_assert_eq!(compare_hands(&a, &b), compare_hands(&b, &a).reverse());
        if compare_hands(&a, &b) != Ordering::Less && compare_hands(&b, &c) != Ordering::Less {
            prop_assert_ne!(compare_hands(&a, &c), Ordering::Less);
        }
    }

    #[test]
    fn distribution_pays_out_every_chip(
        stakes in prop::collection::vec((1u32..=500, any::<bool>(), seven_cards()), 2..=6),
    ) {
        let order: Vec<PlayerId> = (0..stakes.len())
            .map(|i| PlayerId::new(format!("p{}", i)))
            .collect();
        let mut pm = PotManager::new(order.clone());
        let mut hands = BTreeMap::new();
        for (i, (amount, folds, cards)) in stakes.iter().enumerate() {
            pm.contribute(&order[i], *amount).unwrap();
            // the last player always stays in
            if *folds && i + 1 < stakes.len() {
                pm.fold(&order[i]);
            } else {
                hands.insert(order[i].clone(), evaluate(cards).unwrap());
            }
        }
        let paid = pm.distribute(&hands).unwrap();
        let total: u64 = paid.values().map(|&v| u64::from(v)).sum();
        prop_assert_eq!(total, pm.total_collected());
        prop_assert!(paid.keys().all(|id| hands.contains_key(id)));
    }

    #[test]
    fn random_play_conserves_chips(
        seed in any::<u64>(),
        seats in 2usize..=6,
        moves in prop::collection::vec((0u8..4, 0u32..=100), 64),
    ) {
        let mut table = TableEngine::new(TableConfig::holdem(5, 10), seed).unwrap();
        for s in 0..seats {
            table.sit(s, PlayerId::new(format!("p{}", s)), 1000).unwrap();
        }
        let expected = 1000 * seats as u32;
        let mut step = 0usize;

        for _ in 0..10 {
            if table.start_hand().is_err() {
                break;
            }
            while let Some(actor) = table.hand().and_then(|h| h.to_act().cloned()) {
                let la = table.hand().and_then(|h| h.legal_actions()).unwrap();
                let (choice, frac) = moves[step % moves.len()];
                step += 1;
                table.act(&actor, pick(&la, choice, frac)).unwrap();
            }
            let result = table.last_result().unwrap();
            prop_assert_eq!(result.deltas.values().sum::<i64>(), 0);
            let total: u32 = table.seats().iter().flatten().map(|s| s.stack).sum();
            prop_assert_eq!(total, expected);
        }
    }
}
