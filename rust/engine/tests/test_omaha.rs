use lounge_engine::cards::{full_deck, parse_cards, Card};
use lounge_engine::config::TableConfig;
use lounge_engine::deck::Deck;
use lounge_engine::engine::HandStateMachine;
use lounge_engine::hand::Category;
use lounge_engine::player::{Player, PlayerAction as A, PlayerId};

fn id(s: &str) -> PlayerId {
    PlayerId::new(s)
}

fn stacked(top: &str) -> Deck {
    let mut cards = parse_cards(top).unwrap();
    let rest: Vec<Card> = full_deck()
        .into_iter()
        .filter(|c| !cards.contains(c))
        .collect();
    cards.extend(rest);
    Deck::stacked(cards)
}

#[test]
fn omaha_deals_four_and_scores_two_plus_three() {
    let cfg = TableConfig::omaha(5, 10);
    // p1 is dealt first: Ah Kh Qh Jh; p0: 9c 9d 2s 3s
    // board Th 5h 8c | Kc | 6d holds only two hearts
    let deck = stacked("Ah 9c Kh 9d Qh 2s Jh 3s 4d Th 5h 8c 4c Kc 5c 6d");
    let players = vec![
        Player::new(id("p0"), 0, 1000),
        Player::new(id("p1"), 1, 1000),
    ];
    let mut hand = HandStateMachine::new(&cfg, "omaha", players, 0, deck).unwrap();
    assert_eq!(hand.player(&id("p1")).unwrap().hole_cards().len(), 4);

    while let Some(actor) = hand.to_act().cloned() {
        let can_check = hand.legal_actions().is_some_and(|la| la.can_check);
        hand.act(&actor, if can_check { A::Check } else { A::Call })
            .unwrap();
    }

    let result = hand.result().unwrap();
    assert_eq!(result.board, parse_cards("Th 5h 8c Kc 6d").unwrap());
    // a royal flush with hold'em rules, only a pair of kings here
    let p1 = &result.revealed[&id("p1")];
    assert_eq!(p1.hand.category, Category::OnePair);
    assert_eq!(p1.description, "Pair of Kings");
    assert_eq!(result.revealed[&id("p0")].hand.category, Category::OnePair);
    assert_eq!(result.deltas[&id("p1")], 10);
}

#[test]
fn omaha_table_runs_ten_players() {
    let cfg = TableConfig::omaha(1, 2).with_seats(10).with_buy_in(40, 400);
    let mut deck = Deck::new_with_seed(10);
    deck.shuffle();
    let players = (0..10)
        .map(|i| Player::new(id(&format!("p{}", i)), i, 100))
        .collect();
    let mut hand = HandStateMachine::new(&cfg, "ten", players, 4, deck).unwrap();
    while let Some(actor) = hand.to_act().cloned() {
        let can_check = hand.legal_actions().is_some_and(|la| la.can_check);
        hand.act(&actor, if can_check { A::Check } else { A::Call })
            .unwrap();
    }
    // 40 hole + 3 burns + 5 board
    assert_eq!(hand.deck_remaining(), 4);
    assert_eq!(hand.result().unwrap().deltas.values().sum::<i64>(), 0);
}
