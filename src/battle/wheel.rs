//! Wheel mechanic - per-round rolls and boosts
//!
//! Both functions are pure: the caller stores the result on the unit.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::battle::constants::BOOST_BONUS;
use crate::core::error::Result;
use crate::roster::UnitDefinition;

/// Pick one wheel face uniformly at random
///
/// Each listed face has equal weight, so repeated faces weigh more.
pub fn roll<R: Rng + ?Sized>(definition: &UnitDefinition, rng: &mut R) -> Result<u32> {
    definition
        .wheel_values
        .choose(rng)
        .copied()
        .ok_or_else(|| definition.invalid("wheel_values must not be empty"))
}

/// Deterministic boosted value: highest face plus a flat bonus
pub fn boost(definition: &UnitDefinition) -> Result<u32> {
    let max = definition
        .max_wheel_value()
        .ok_or_else(|| definition.invalid("wheel_values must not be empty"))?;
    max.checked_add(BOOST_BONUS)
        .ok_or_else(|| definition.invalid("highest wheel face leaves no room for the boost bonus"))
}
