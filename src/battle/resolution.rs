//! Attack resolution
//!
//! Damage is the attacker's wheel value, subtracted directly from the
//! target's health. No armor, no criticals.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::units::BattleUnit;
use crate::core::types::UnitId;

/// Result of one resolved attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: UnitId,
    pub target: UnitId,
    pub damage: u32,
    pub remaining_health: u32,
    /// This hit took the target from alive to zero health
    pub target_knocked_out: bool,
}

/// Index of a uniformly random living unit in `team`
pub fn pick_target<R: Rng + ?Sized>(team: &[BattleUnit], rng: &mut R) -> Option<usize> {
    let alive: Vec<usize> = team
        .iter()
        .enumerate()
        .filter(|(_, u)| u.is_alive())
        .map(|(i, _)| i)
        .collect();
    alive.choose(rng).copied()
}

/// Hit a specific target with the attacker's wheel value
pub fn apply_attack(attacker: &BattleUnit, target: &mut BattleUnit) -> AttackOutcome {
    let damage = attacker.wheel_value;
    let knocked_out = target.take_damage(damage);

    AttackOutcome {
        attacker: attacker.id,
        target: target.id,
        damage,
        remaining_health: target.health(),
        target_knocked_out: knocked_out,
    }
}

/// Attack a random living member of `target_team`
///
/// Returns `None` when nobody in the team is alive; the attack is skipped.
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &BattleUnit,
    target_team: &mut [BattleUnit],
    rng: &mut R,
) -> Option<AttackOutcome> {
    let index = pick_target(target_team, rng)?;
    Some(apply_attack(attacker, &mut target_team[index]))
}
