use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::config::Variant;
use crate::player::PlayerId;

/// A betting round together with the cards revealed before it.
/// Community games use the first four; stud uses third through seventh.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    /// Hole cards dealt
    Preflop,
    /// Three community cards
    Flop,
    /// Fourth community card
    Turn,
    /// Fifth community card
    River,
    /// Two down, one up
    Third,
    Fourth,
    Fifth,
    Sixth,
    /// Last card, face down
    Seventh,
}

impl Street {
    pub fn first(variant: Variant) -> Self {
        if variant.is_stud() {
            Street::Third
        } else {
            Street::Preflop
        }
    }

    /// The street that follows this one, `None` after the last.
    pub fn next(self) -> Option<Self> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::Third => Some(Street::Fourth),
            Street::Fourth => Some(Street::Fifth),
            Street::Fifth => Some(Street::Sixth),
            Street::Sixth => Some(Street::Seventh),
            Street::River | Street::Seventh => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Street::Preflop => "pre-flop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
            Street::Third => "third street",
            Street::Fourth => "fourth street",
            Street::Fifth => "fifth street",
            Street::Sixth => "sixth street",
            Street::Seventh => "seventh street",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An action as it happened, forced bets included.
///
/// `Bet`/`Raise`/`BringIn`/blinds carry the round total after acting;
/// `Call`/`AllIn`/`Ante` carry the chips added.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum HandAction {
    Ante(u32),
    SmallBlind(u32),
    BigBlind(u32),
    BringIn(u32),
    Fold,
    Check,
    Call(u32),
    Bet(u32),
    Raise(u32),
    AllIn(u32),
}

impl HandAction {
    pub fn is_forced(&self) -> bool {
        matches!(
            self,
            HandAction::Ante(_)
                | HandAction::SmallBlind(_)
                | HandAction::BigBlind(_)
                | HandAction::BringIn(_)
        )
    }
}

/// Records a single action during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Position in the hand's action sequence, forced bets included
    pub seq: u64,
    pub player_id: PlayerId,
    pub street: Street,
    pub action: HandAction,
}

/// A participant as dealt in.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub player_id: PlayerId,
    pub seat: usize,
    pub starting_stack: u32,
}

/// Complete record of a hand: participants, actions, board and outcome.
/// Serialized to JSONL for hand history and replay.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Unique identifier for this hand (format: YYYYMMDD-NNNNNN)
    pub hand_id: String,
    /// Deck seed (enables deterministic replay)
    pub seed: Option<u64>,
    pub variant: Variant,
    pub button: usize,
    pub seats: Vec<SeatRecord>,
    /// Chronological list of all actions
    pub actions: Vec<ActionRecord>,
    /// Community cards (stud: the shared seventh-street card, if any)
    pub board: Vec<Card>,
    /// Net chip change per player
    #[serde(default)]
    pub deltas: BTreeMap<PlayerId, i64>,
    /// Human readable summary
    pub result: Option<String>,
    /// Timestamp when the hand was played (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

/// Who won at showdown and with what.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub winners: Vec<PlayerId>,
    /// e.g. "split pot", "Flush, Ace high"
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends hand records to a JSONL file and hands out sequential ids.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// A logger that only numbers hands; `write` is a no-op.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
