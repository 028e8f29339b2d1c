use std::collections::HashSet;

use lounge_engine::cards::Card;
use lounge_engine::deck::Deck;
use lounge_engine::errors::GameError;

#[test]
fn deck_reset_has_52_unique_cards() {
    let mut deck = Deck::new_with_seed(42);
    deck.reset();
    let mut set = HashSet::new();
    for i in 0..52 {
        let c = deck.deal_card().expect("should have 52 cards");
        assert!(set.insert(c), "card {:?} duplicated at position {}", c, i);
    }
    assert!(
        deck.deal_card().is_none(),
        "after 52 cards, deck should be empty"
    );
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    d1.shuffle();
    d2.shuffle();
    let a: Vec<Card> = d1.deal(10).unwrap();
    let b: Vec<Card> = d2.deal(10).unwrap();
    assert_eq!(a, b, "same seed must yield identical order");
    assert_eq!(d1.seed(), Some(12345));
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    d1.shuffle();
    d2.shuffle();
    assert_ne!(
        d1.deal(10).unwrap(),
        d2.deal(10).unwrap(),
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn consecutive_shuffles_restore_the_full_deck() {
    let mut deck = Deck::new_with_seed(5);
    deck.shuffle();
    let first = deck.deal(20).unwrap();
    deck.shuffle();
    assert_eq!(deck.remaining(), 52);
    let second = deck.deal(52).unwrap();
    assert_ne!(first, second[..20].to_vec());
    assert_eq!(second.iter().collect::<HashSet<_>>().len(), 52);
}

#[test]
fn burn_and_deal_follow_holdem_procedure() {
    let mut deck = Deck::new_with_seed(777);
    deck.shuffle();

    let p1 = deck.deal(2).unwrap();
    let p2 = deck.deal(2).unwrap();
    deck.burn_card().unwrap();
    let flop = deck.deal(3).unwrap();
    deck.burn_card().unwrap();
    let turn = deck.deal(1).unwrap();
    deck.burn_card().unwrap();
    let river = deck.deal(1).unwrap();

    let mut set = HashSet::new();
    for c in p1.iter().chain(&p2).chain(&flop).chain(&turn).chain(&river) {
        assert!(set.insert(*c));
    }
    // 4 hole + 3 burns + 5 board
    assert_eq!(deck.remaining(), 40);
}

#[test]
fn dealing_past_the_end_is_deck_exhausted() {
    let mut deck = Deck::new_with_seed(9);
    deck.shuffle();
    deck.deal(51).unwrap();
    assert!(matches!(
        deck.deal(2),
        Err(GameError::DeckExhausted {
            requested: 2,
            remaining: 1
        })
    ));
}
