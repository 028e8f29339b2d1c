//! Table configuration consumed when a table is created.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Holdem,
    Omaha,
    Stud,
}

impl Variant {
    pub fn is_stud(self) -> bool {
        self == Variant::Stud
    }

    /// Face-down cards dealt before the first betting round.
    pub fn initial_hole_cards(self) -> usize {
        match self {
            Variant::Holdem => 2,
            Variant::Omaha => 4,
            Variant::Stud => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Holdem => "Texas Hold'em",
            Variant::Omaha => "Omaha",
            Variant::Stud => "Seven-Card Stud",
        }
    }

    /// Most players the variant can deal to from one deck.
    pub fn seat_limit(self) -> usize {
        if self.is_stud() {
            8
        } else {
            10
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Holdem => "holdem",
            Variant::Omaha => "omaha",
            Variant::Stud => "stud",
        })
    }
}

impl FromStr for Variant {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "holdem" | "hold'em" | "texas" => Ok(Variant::Holdem),
            "omaha" | "plo" => Ok(Variant::Omaha),
            "stud" | "seven-card-stud" | "7stud" => Ok(Variant::Stud),
            other => Err(GameError::InvalidConfig(format!(
                "unknown variant '{}' (expected holdem, omaha or stud)",
                other
            ))),
        }
    }
}

/// Forced bets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stakes {
    Blinds {
        small: u32,
        big: u32,
        #[serde(default)]
        ante: u32,
    },
    Stud {
        ante: u32,
        bring_in: u32,
        /// Completion size and minimum raise increment
        bet: u32,
    },
}

impl Stakes {
    /// Smallest allowed raise increment.
    pub fn bet_unit(&self) -> u32 {
        match *self {
            Stakes::Blinds { big, .. } => big,
            Stakes::Stud { bet, .. } => bet,
        }
    }

    pub fn ante(&self) -> u32 {
        match *self {
            Stakes::Blinds { ante, .. } | Stakes::Stud { ante, .. } => ante,
        }
    }
}

/// Whether losing hands are turned face up at showdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowdownPolicy {
    #[default]
    ShowAll,
    /// Only pot winners reveal
    MuckLosers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub variant: Variant,
    pub max_seats: usize,
    pub stakes: Stakes,
    pub min_buy_in: u32,
    pub max_buy_in: u32,
    #[serde(default)]
    pub showdown: ShowdownPolicy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::holdem(5, 10)
    }
}

impl TableConfig {
    /// Six-max blinds game, buy-in 20 to 200 big blinds.
    pub fn holdem(small: u32, big: u32) -> Self {
        Self {
            variant: Variant::Holdem,
            max_seats: 6,
            stakes: Stakes::Blinds {
                small,
                big,
                ante: 0,
            },
            min_buy_in: big.saturating_mul(20),
            max_buy_in: big.saturating_mul(200),
            showdown: ShowdownPolicy::ShowAll,
        }
    }

    pub fn omaha(small: u32, big: u32) -> Self {
        Self {
            variant: Variant::Omaha,
            ..Self::holdem(small, big)
        }
    }

    pub fn stud(ante: u32, bring_in: u32, bet: u32) -> Self {
        Self {
            variant: Variant::Stud,
            max_seats: 8,
            stakes: Stakes::Stud {
                ante,
                bring_in,
                bet,
            },
            min_buy_in: bet.saturating_mul(20),
            max_buy_in: bet.saturating_mul(200),
            showdown: ShowdownPolicy::ShowAll,
        }
    }

    pub fn with_seats(mut self, max_seats: usize) -> Self {
        self.max_seats = max_seats;
        self
    }

    pub fn with_buy_in(mut self, min: u32, max: u32) -> Self {
        self.min_buy_in = min;
        self.max_buy_in = max;
        self
    }

    pub fn with_showdown(mut self, showdown: ShowdownPolicy) -> Self {
        self.showdown = showdown;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let limit = self.variant.seat_limit();
        if !(2..=limit).contains(&self.max_seats) {
            return Err(GameError::InvalidConfig(format!(
                "{} needs 2..={} seats, got {}",
                self.variant, limit, self.max_seats
            )));
        }
        match self.stakes {
            Stakes::Blinds { small, big, .. } => {
                if self.variant.is_stud() {
                    return Err(GameError::InvalidConfig(
                        "stud is played with ante and bring-in, not blinds".into(),
                    ));
                }
                if small == 0 || big == 0 {
                    return Err(GameError::InvalidConfig("blinds must be positive".into()));
                }
                if small > big {
                    return Err(GameError::InvalidConfig(format!(
                        "small blind {} exceeds big blind {}",
                        small, big
                    )));
                }
            }
            Stakes::Stud { bring_in, bet, .. } => {
                if !self.variant.is_stud() {
                    return Err(GameError::InvalidConfig(format!(
                        "{} is played with blinds",
                        self.variant
                    )));
                }
                if bring_in == 0 || bet == 0 {
                    return Err(GameError::InvalidConfig(
                        "bring-in and bet must be positive".into(),
                    ));
                }
                if bring_in >= bet {
                    return Err(GameError::InvalidConfig(format!(
                        "bring-in {} must be below the bet {}",
                        bring_in, bet
                    )));
                }
            }
        }
        if self.min_buy_in == 0 || self.min_buy_in > self.max_buy_in {
            return Err(GameError::InvalidConfig(format!(
                "buy-in range {}..={} is empty",
                self.min_buy_in, self.max_buy_in
            )));
        }
        Ok(())
    }
}
