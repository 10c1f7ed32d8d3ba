//! Initiative ordering for the combat phase
//!
//! Precedence: priority tier, then wheel value (high first), then a random
//! shuffle among exact ties. The order is computed once per combat phase.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::PLAYER_ALWAYS_STARTS;
use crate::battle::units::BattleUnit;
use crate::core::types::UnitId;

/// Tie-break policy for initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativePolicy {
    /// Every living player unit acts before any living enemy unit
    pub player_always_starts: bool,
}

impl Default for InitiativePolicy {
    fn default() -> Self {
        Self {
            player_always_starts: PLAYER_ALWAYS_STARTS,
        }
    }
}

impl InitiativePolicy {
    fn tier(&self, unit: &BattleUnit) -> u8 {
        if self.player_always_starts && !unit.is_player() {
            1
        } else {
            0
        }
    }
}

/// Order living units into an attack sequence
///
/// Dead units are left out. Units with the same tier and wheel value are
/// shuffled, so two calls on identical input may disagree on their order.
pub fn initiative_order<'a, I, R>(units: I, policy: InitiativePolicy, rng: &mut R) -> Vec<UnitId>
where
    I: IntoIterator<Item = &'a BattleUnit>,
    R: Rng + ?Sized,
{
    let mut entries: Vec<(u8, u32, UnitId)> = units
        .into_iter()
        .filter(|u| u.is_alive())
        .map(|u| (policy.tier(u), u.wheel_value, u.id))
        .collect();

    entries.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    // Shuffle each run of equal (tier, value)
    let mut start = 0;
    while start < entries.len() {
        let key = (entries[start].0, entries[start].1);
        let end = entries[start..]
            .iter()
            .position(|e| (e.0, e.1) != key)
            .map_or(entries.len(), |offset| start + offset);
        entries[start..end].shuffle(rng);
        start = end;
    }

    entries.into_iter().map(|(_, _, id)| id).collect()
}
