use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, Suit};
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }

    /// Rules-page blurb for the category.
    pub fn description(self) -> &'static str {
        match self {
            Category::HighCard => "No matching cards; the highest card plays",
            Category::OnePair => "Two cards of the same rank",
            Category::TwoPair => "Two different pairs",
            Category::ThreeOfAKind => "Three cards of the same rank",
            Category::Straight => "Five cards in sequence",
            Category::Flush => "Five cards of the same suit",
            Category::FullHouse => "Three of a kind with a pair",
            Category::FourOfAKind => "Four cards of the same rank",
            Category::StraightFlush => "Five cards in sequence, all of the same suit",
            Category::RoyalFlush => "A, K, Q, J, 10, all of the same suit",
        }
    }
}

/// Best five-card hand found in a set of cards.
///
/// Ordering is category first, then `kickers` element by element. Kickers are
/// rank values (2..=14) high to low, zero-padded; a wheel straight stores its
/// high card as 5 so the ace counts low.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct RankedHand {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl RankedHand {
    /// Human-readable summary, e.g. "Full House, Kings over Sevens".
    pub fn describe(&self) -> String {
        let r = |i: usize| Rank::from_u8(self.kickers[i]);
        let name = |i: usize| r(i).map(Rank::name).unwrap_or("?");
        let plural = |i: usize| r(i).map(Rank::plural).unwrap_or("?");
        match self.category {
            Category::RoyalFlush => "Royal Flush".to_string(),
            Category::StraightFlush => format!("Straight Flush, {} high", name(0)),
            Category::FourOfAKind => format!("Four of a Kind, {}", plural(0)),
            Category::FullHouse => format!("Full House, {} over {}", plural(0), plural(1)),
            Category::Flush => format!("Flush, {} high", name(0)),
            Category::Straight => format!("Straight, {} high", name(0)),
            Category::ThreeOfAKind => format!("Three of a Kind, {}", plural(0)),
            Category::TwoPair => format!("Two Pair, {} and {}", plural(0), plural(1)),
            Category::OnePair => format!("Pair of {}", plural(0)),
            Category::HighCard => format!("High Card, {}", name(0)),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum HandComparison {
    AWins,
    BWins,
    Tie,
}

pub fn compare(a: &RankedHand, b: &RankedHand) -> HandComparison {
    match compare_hands(a, b) {
        Ordering::Greater => HandComparison::AWins,
        Ordering::Less => HandComparison::BWins,
        Ordering::Equal => HandComparison::Tie,
    }
}

pub fn compare_hands(a: &RankedHand, b: &RankedHand) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

/// Ranks 5 to 7 distinct cards as their best five-card poker hand.
pub fn evaluate(cards: &[Card]) -> Result<RankedHand, GameError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(GameError::InvalidHand(format!(
            "expected 5 to 7 cards, got {}",
            cards.len()
        )));
    }
    ensure_distinct(cards)?;
    Ok(evaluate_unchecked(cards))
}

/// Best Omaha hand: exactly two cards from `hole` and three from `board`,
/// trying every combination.
pub fn best_omaha_hand(hole: &[Card], board: &[Card]) -> Result<RankedHand, GameError> {
    if hole.len() < 2 || board.len() < 3 {
        return Err(GameError::InvalidHand(format!(
            "omaha needs at least 2 hole and 3 board cards, got {} and {}",
            hole.len(),
            board.len()
        )));
    }
    let all: Vec<Card> = hole.iter().chain(board).copied().collect();
    ensure_distinct(&all)?;

    let mut best: Option<RankedHand> = None;
    for h in combinations(hole, 2) {
        for b in combinations(board, 3) {
            let five = [h[0], h[1], b[0], b[1], b[2]];
            let ranked = evaluate_unchecked(&five);
            if best.is_none_or(|cur| ranked > cur) {
                best = Some(ranked);
            }
        }
    }
    best.ok_or_else(|| GameError::InvalidHand("no omaha combination".into()))
}

/// Ranks 1 to 4 exposed stud cards. Only rank multiples count (quads, trips,
/// two pair, pair, high card); straights and flushes are not recognised on a
/// partial board.
pub fn rank_showing(upcards: &[Card]) -> RankedHand {
    let mut rank_counts = [0u8; 15];
    for c in upcards {
        rank_counts[rank_val(c.rank) as usize] += 1;
    }
    rank_by_multiples(&rank_counts)
}

pub fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    fn go(cards: &[Card], k: usize, start: usize, cur: &mut Vec<Card>, out: &mut Vec<Vec<Card>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..cards.len() {
            if cards.len() - i < k - cur.len() {
                break;
            }
            cur.push(cards[i]);
            go(cards, k, i + 1, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    if k <= cards.len() {
        go(cards, k, 0, &mut Vec::with_capacity(k), &mut out);
    }
    out
}

fn ensure_distinct(cards: &[Card]) -> Result<(), GameError> {
    let mut seen = HashSet::with_capacity(cards.len());
    for &c in cards {
        if !seen.insert(c) {
            return Err(GameError::DuplicateCard(c));
        }
    }
    Ok(())
}

fn evaluate_unchecked(cards: &[Card]) -> RankedHand {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    let mut suit_counts = [0u8; 4];
    let mut by_suit_mask = [0u16; 4];
    for &c in cards {
        let r = rank_val(c.rank);
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        let s = suit_index(c.suit);
        suit_counts[s] += 1;
        by_suit_mask[s] |= 1 << r;
    }

    let flush_suit = suit_counts.iter().position(|&n| n >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(by_suit_mask[s]) {
            let category = if high == 14 {
                Category::RoyalFlush
            } else {
                Category::StraightFlush
            };
            return RankedHand {
                category,
                kickers: [high, 0, 0, 0, 0],
            };
        }
    }

    if let Some((quad, kicker)) = detect_quads(&rank_counts) {
        return RankedHand {
            category: Category::FourOfAKind,
            kickers: [quad, kicker, 0, 0, 0],
        };
    }

    if let Some((trip, pair)) = detect_full_house(&rank_counts) {
        return RankedHand {
            category: Category::FullHouse,
            kickers: [trip, pair, 0, 0, 0],
        };
    }

    if let Some(s) = flush_suit {
        let mut k = [0u8; 5];
        let highs = (2..=14u8).rev().filter(|r| by_suit_mask[s] & (1 << r) != 0);
        for (slot, r) in k.iter_mut().zip(highs) {
            *slot = r;
        }
        return RankedHand {
            category: Category::Flush,
            kickers: k,
        };
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return RankedHand {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    rank_by_multiples(&rank_counts)
}

/// Trips / two pair / one pair / high card from rank counts alone.
fn rank_by_multiples(rank_counts: &[u8; 15]) -> RankedHand {
    let (quads, trips, pairs, singles) = classify_multiples(rank_counts);

    if let Some(&q) = quads.first() {
        let kicker = trips
            .iter()
            .chain(&pairs)
            .chain(&singles)
            .copied()
            .max()
            .unwrap_or(0);
        return RankedHand {
            category: Category::FourOfAKind,
            kickers: [q, kicker, 0, 0, 0],
        };
    }
    if let Some(&t) = trips.first() {
        let mut rest: Vec<u8> = pairs.iter().chain(&singles).copied().collect();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        return RankedHand {
            category: Category::ThreeOfAKind,
            kickers: padded(&[t], &rest, 2),
        };
    }
    if pairs.len() >= 2 {
        // a third pair can still play as the kicker
        let mut rest: Vec<u8> = pairs[2..].iter().chain(&singles).copied().collect();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        return RankedHand {
            category: Category::TwoPair,
            kickers: padded(&[pairs[0], pairs[1]], &rest, 1),
        };
    }
    if let Some(&p) = pairs.first() {
        return RankedHand {
            category: Category::OnePair,
            kickers: padded(&[p], &singles, 3),
        };
    }
    RankedHand {
        category: Category::HighCard,
        kickers: padded(&[], &singles, 5),
    }
}

fn padded(lead: &[u8], rest: &[u8], take: usize) -> [u8; 5] {
    let mut k = [0u8; 5];
    for (slot, v) in k.iter_mut().zip(lead.iter().chain(rest.iter().take(take))) {
        *slot = *v;
    }
    k
}

fn rank_val(r: Rank) -> u8 {
    r as u8
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // ace also plays as 1 for the wheel
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    for high in (5..=14u16).rev() {
        let window = 0b11111u16 << (high - 4);
        if (m & window) == window {
            return Some(high as u8);
        }
    }
    None
}

fn detect_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let quad = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 4)?;
    let kicker = (2..=14u8)
        .rev()
        .find(|&r| r != quad && rank_counts[r as usize] > 0)
        .unwrap_or(0);
    Some((quad, kicker))
}

fn detect_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let (_, trips, pairs, _) = classify_multiples(rank_counts);
    let &t = trips.first()?;
    // a second set of trips plays as the pair
    let pair = trips.get(1).into_iter().chain(pairs.first()).max()?;
    Some((t, *pair))
}

/// Ranks grouped by multiplicity, each group high to low.
fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut quads = vec![];
    let mut trips = vec![];
    let mut pairs = vec![];
    let mut singles = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            4 => quads.push(r),
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (quads, trips, pairs, singles)
}
