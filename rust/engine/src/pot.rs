//! Pot accounting: per-round accumulation, main/side pot construction and
//! showdown payout.
//!
//! Pots are rebuilt from each player's total contribution whenever a round is
//! settled or a player folds. Every distinct contribution depth of a
//! non-folded player closes one pot, so a pot's eligible set is exactly the
//! live players who reached that depth. Folded players' chips stay in the
//! pots they reached; anything above the deepest live contribution is added
//! to the last pot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::hand::RankedHand;
use crate::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u32,
    /// Per-player contribution depth this pot is capped at
    pub cap: u32,
    /// Live players who reached `cap`, in odd-chip order
    pub eligible: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotManager {
    /// Clockwise from the first seat left of the button
    order: Vec<PlayerId>,
    round: BTreeMap<PlayerId, u32>,
    settled: BTreeMap<PlayerId, u32>,
    folded: BTreeSet<PlayerId>,
    pots: Vec<Pot>,
    distributed: bool,
}

impl PotManager {
    pub fn new(order: Vec<PlayerId>) -> Self {
        Self {
            order,
            round: BTreeMap::new(),
            settled: BTreeMap::new(),
            folded: BTreeSet::new(),
            pots: Vec::new(),
            distributed: false,
        }
    }

    /// Adds a validated bet to the live round.
    pub fn contribute(&mut self, player: &PlayerId, amount: u32) -> Result<(), GameError> {
        self.check_contributor(player, amount)?;
        *self.round.entry(player.clone()).or_insert(0) += amount;
        Ok(())
    }

    /// Adds dead money (antes) straight to the settled pot.
    pub fn post_dead(&mut self, player: &PlayerId, amount: u32) -> Result<(), GameError> {
        self.check_contributor(player, amount)?;
        *self.settled.entry(player.clone()).or_insert(0) += amount;
        self.rebuild_pots();
        Ok(())
    }

    fn check_contributor(&self, player: &PlayerId, amount: u32) -> Result<(), GameError> {
        if self.distributed {
            return Err(GameError::InvalidContribution(
                "pots already distributed".into(),
            ));
        }
        if !self.order.contains(player) {
            return Err(GameError::InvalidContribution(format!(
                "{} is not dealt into this hand",
                player
            )));
        }
        if self.folded.contains(player) {
            return Err(GameError::InvalidContribution(format!(
                "{} has folded",
                player
            )));
        }
        if amount == 0 {
            return Err(GameError::InvalidContribution(format!(
                "zero contribution from {}",
                player
            )));
        }
        Ok(())
    }

    /// Removes the player from every pot's eligible set. Their chips stay in.
    pub fn fold(&mut self, player: &PlayerId) {
        self.folded.insert(player.clone());
        self.rebuild_pots();
    }

    pub fn round_contribution(&self, player: &PlayerId) -> u32 {
        self.round.get(player).copied().unwrap_or(0)
    }

    /// Everything the player has put in this hand, live round included.
    pub fn player_total(&self, player: &PlayerId) -> u32 {
        self.settled.get(player).copied().unwrap_or(0) + self.round_contribution(player)
    }

    pub fn total_collected(&self) -> u64 {
        self.settled
            .values()
            .chain(self.round.values())
            .map(|&v| u64::from(v))
            .sum()
    }

    /// Chips bet in the live round, not yet in any pot.
    pub fn pending(&self) -> u32 {
        self.round.values().sum()
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    /// Cross-checks the betting round's view of round bets against what was
    /// actually contributed.
    pub fn verify_round<'a, I>(&self, bets: I) -> Result<(), GameError>
    where
        I: IntoIterator<Item = (&'a PlayerId, u32)>,
    {
        let mut seen = 0u64;
        for (id, bet) in bets {
            let have = self.round_contribution(id);
            if have != bet {
                return Err(GameError::InvalidContribution(format!(
                    "{} bet {} but contributed {}",
                    id, bet, have
                )));
            }
            seen += u64::from(bet);
        }
        let recorded: u64 = self.round.values().map(|&v| u64::from(v)).sum();
        if seen != recorded {
            return Err(GameError::InvalidContribution(format!(
                "round holds {} but bets total {}",
                recorded, seen
            )));
        }
        Ok(())
    }

    /// Folds the live round into the pot structure.
    pub fn settle_round(&mut self) -> &[Pot] {
        for (id, amount) in std::mem::take(&mut self.round) {
            *self.settled.entry(id).or_insert(0) += amount;
        }
        self.rebuild_pots();
        &self.pots
    }

    fn rebuild_pots(&mut self) {
        // the live round stays out of the pots until it is settled
        let totals: BTreeMap<&PlayerId, u32> =
            self.settled.iter().map(|(id, &v)| (id, v)).collect();
        let caps: BTreeSet<u32> = totals
            .iter()
            .filter(|&(id, &t)| t > 0 && !self.folded.contains(*id))
            .map(|(_, &t)| t)
            .collect();

        let mut pots = Vec::with_capacity(caps.len());
        let mut prev = 0u32;
        for cap in caps {
            let amount: u32 = totals.values().map(|&t| t.min(cap) - t.min(prev)).sum();
            let eligible = self
                .order
                .iter()
                .filter(|id| !self.folded.contains(*id))
                .filter(|id| totals.get(id).is_some_and(|&t| t >= cap))
                .cloned()
                .collect();
            if amount > 0 {
                pots.push(Pot {
                    amount,
                    cap,
                    eligible,
                });
            }
            prev = cap;
        }

        let overflow: u32 = totals.values().map(|&t| t.saturating_sub(prev)).sum();
        if overflow > 0 {
            match pots.last_mut() {
                Some(last) => last.amount += overflow,
                None => pots.push(Pot {
                    amount: overflow,
                    cap: prev,
                    eligible: Vec::new(),
                }),
            }
        }
        self.pots = pots;
    }

    fn live_in_order(&self) -> Vec<PlayerId> {
        self.order
            .iter()
            .filter(|id| !self.folded.contains(*id))
            .cloned()
            .collect()
    }

    /// Pays every pot, smallest depth first, to its best eligible hand(s).
    ///
    /// Split pots share evenly; leftover chips go one at a time to the
    /// winners in seat order starting left of the button.
    pub fn distribute(
        &mut self,
        hands: &BTreeMap<PlayerId, RankedHand>,
    ) -> Result<BTreeMap<PlayerId, u32>, GameError> {
        if self.distributed {
            return Err(GameError::InvalidContribution(
                "pots already distributed".into(),
            ));
        }
        self.settle_round();

        let mut won: BTreeMap<PlayerId, u32> = BTreeMap::new();
        for pot in &self.pots {
            let eligible = if pot.eligible.is_empty() {
                self.live_in_order()
            } else {
                pot.eligible.clone()
            };
            let contenders: Vec<(&PlayerId, &RankedHand)> = eligible
                .iter()
                .filter_map(|id| hands.get(id).map(|h| (id, h)))
                .collect();

            let winners: Vec<PlayerId> = match contenders.iter().map(|(_, h)| **h).max() {
                Some(best) => contenders
                    .iter()
                    .filter(|(_, h)| **h == best)
                    .map(|(id, _)| (*id).clone())
                    .collect(),
                None if eligible.len() == 1 => eligible.clone(),
                None => {
                    return Err(GameError::InvalidContribution(format!(
                        "pot capped at {} has no ranked contender",
                        pot.cap
                    )));
                }
            };

            let n = winners.len() as u32;
            let share = pot.amount / n;
            let odd = pot.amount % n;
            for (i, w) in winners.into_iter().enumerate() {
                let extra = u32::from((i as u32) < odd);
                *won.entry(w).or_insert(0) += share + extra;
            }
        }

        self.finish(won)
    }

    /// Everything goes to the last live player without a showdown.
    pub fn award_uncontested(
        &mut self,
        winner: &PlayerId,
    ) -> Result<BTreeMap<PlayerId, u32>, GameError> {
        if self.distributed {
            return Err(GameError::InvalidContribution(
                "pots already distributed".into(),
            ));
        }
        if !self.order.contains(winner) || self.folded.contains(winner) {
            return Err(GameError::InvalidContribution(format!(
                "{} cannot win uncontested",
                winner
            )));
        }
        self.settle_round();
        let total = u32::try_from(self.total_collected())
            .map_err(|_| GameError::InvalidContribution("pot overflow".into()))?;
        let mut won = BTreeMap::new();
        if total > 0 {
            won.insert(winner.clone(), total);
        }
        self.finish(won)
    }

    fn finish(
        &mut self,
        won: BTreeMap<PlayerId, u32>,
    ) -> Result<BTreeMap<PlayerId, u32>, GameError> {
        let paid: u64 = won.values().map(|&v| u64::from(v)).sum();
        let collected = self.total_collected();
        if paid != collected {
            tracing::error!(paid, collected, "pot distribution does not balance");
            return Err(GameError::InvalidContribution(format!(
                "distributed {} of {} collected",
                paid, collected
            )));
        }
        self.distributed = true;
        Ok(won)
    }
}
