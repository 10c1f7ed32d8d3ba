//! Battlefield units
//!
//! A unit is one deployed instance of a `UnitDefinition`. Dead units stay in
//! their team with zero health so slot order never changes.

use std::sync::Arc;

use serde::Serialize;

use crate::battle::constants::UNROLLED;
use crate::core::types::{Team, UnitId};
use crate::roster::UnitDefinition;

/// A unit occupying one battlefield slot
///
/// Serialize-only: units are built by the controller so health stays clamped.
#[derive(Debug, Clone, Serialize)]
pub struct BattleUnit {
    pub id: UnitId,
    pub definition: Arc<UnitDefinition>,
    pub team: Team,
    /// Position within its team, in deployment order
    pub slot: usize,

    // State
    health: u32,
    pub wheel_value: u32, // UNROLLED until the tactics phase rolls it
    pub is_boosted: bool,
}

impl BattleUnit {
    pub fn new(definition: Arc<UnitDefinition>, team: Team, slot: usize) -> Self {
        let health = definition.max_health;
        Self {
            id: UnitId::new(),
            definition,
            team,
            slot,
            health,
            wheel_value: UNROLLED,
            is_boosted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.definition.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_player(&self) -> bool {
        self.team == Team::Player
    }

    pub fn has_rolled(&self) -> bool {
        self.wheel_value != UNROLLED
    }

    /// Apply damage, clamped to `[0, max_health]`
    ///
    /// Returns true only when this hit took the unit from alive to dead.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount).min(self.max_health());
        was_alive && !self.is_alive()
    }

    /// Set a freshly rolled wheel value and clear the boost flag
    pub fn set_roll(&mut self, value: u32) {
        self.wheel_value = value;
        self.is_boosted = false;
    }

    /// Replace the wheel value with a boosted one
    pub fn apply_boost(&mut self, value: u32) {
        self.wheel_value = value;
        self.is_boosted = true;
    }

    /// Clear the round's wheel state (used for dead units)
    pub fn reset_wheel(&mut self) {
        self.wheel_value = UNROLLED;
        self.is_boosted = false;
    }
}
