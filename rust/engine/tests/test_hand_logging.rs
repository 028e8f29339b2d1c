use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use lounge_engine::cards::parse_cards;
use lounge_engine::config::{TableConfig, Variant};
use lounge_engine::logger::{
    format_hand_id, ActionRecord, HandAction, HandLogger, HandRecord, SeatRecord, Street,
};
use lounge_engine::player::{PlayerAction, PlayerId};
use lounge_engine::table::TableEngine;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

fn record(hand_id: &str) -> HandRecord {
    HandRecord {
        hand_id: hand_id.to_string(),
        seed: Some(1),
        variant: Variant::Holdem,
        button: 0,
        seats: vec![SeatRecord {
            player_id: PlayerId::new("p0"),
            seat: 0,
            starting_stack: 1000,
        }],
        actions: vec![ActionRecord {
            seq: 0,
            player_id: PlayerId::new("p0"),
            street: Street::Preflop,
            action: HandAction::Check,
        }],
        board: parse_cards("Ac").unwrap(),
        deltas: BTreeMap::new(),
        result: Some("p0".to_string()),
        ts: None,
        meta: None,
        showdown: None,
    }
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("handlog");
    let mut logger = HandLogger::create(&path).expect("create logger");
    logger.write(&record("20250102-000001")).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
}

#[test]
fn sequential_ids_increment() {
    let mut logger = HandLogger::detached("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
    assert_eq!(format_hand_id("20251231", 42), "20251231-000042");
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let path = tmp_path("handlog_ts");
    let mut logger = HandLogger::create(&path).expect("create logger");
    let rec = record("20250102-000010");
    logger.write(&rec).expect("write");
    let line = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    assert!(line.contains("\"ts\":"), "ts should be injected");

    let preset = "2030-01-01T00:00:00Z".to_string();
    let rec2 = HandRecord {
        ts: Some(preset.clone()),
        ..rec
    };
    logger.write(&rec2).expect("write2");
    let content = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    assert!(content.contains(&preset), "preset ts must be kept");
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn hand_record_round_trips_through_json() {
    let rec = record("20250102-000123");
    let s = serde_json::to_string(&rec).expect("serialize");
    let back: HandRecord = serde_json::from_str(&s).expect("deserialize");
    assert_eq!(rec, back);
}

#[test]
fn played_hand_record_lists_forced_bets_and_actions_in_order() {
    let mut table = TableEngine::new(TableConfig::holdem(5, 10), 99).unwrap();
    table.sit(0, PlayerId::new("a"), 1000).unwrap();
    table.sit(1, PlayerId::new("b"), 1000).unwrap();
    table.start_hand().unwrap();
    table.act(&PlayerId::new("a"), PlayerAction::Raise(30)).unwrap();
    table.act(&PlayerId::new("b"), PlayerAction::Fold).unwrap();

    let rec = &table.last_result().unwrap().record;
    let kinds: Vec<HandAction> = rec.actions.iter().map(|a| a.action).collect();
    assert_eq!(
        kinds,
        vec![
            HandAction::SmallBlind(5),
            HandAction::BigBlind(10),
            HandAction::Raise(30),
            HandAction::Fold,
        ]
    );
    let seqs: Vec<u64> = rec.actions.iter().map(|a| a.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3]);
    assert_eq!(rec.deltas[&PlayerId::new("a")], 10);
    assert_eq!(rec.deltas[&PlayerId::new("b")], -10);
    assert!(rec.seed.is_some());
    assert!(rec.showdown.is_none());
    assert_eq!(rec.seats.len(), 2);
}
