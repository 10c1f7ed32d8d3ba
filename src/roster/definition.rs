//! Static per-archetype unit data

use serde::{Deserialize, Serialize};

use crate::battle::constants::BOOST_BONUS;
use crate::core::error::{BattleError, Result};
use crate::core::types::DefinitionId;

/// Largest face that can still be boosted without overflow
pub const MAX_WHEEL_FACE: u32 = u32::MAX - BOOST_BONUS;

/// Immutable archetype data shared by every unit built from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: DefinitionId,
    pub name: String,
    /// 1 (common) to 5 (legendary), presentation only
    #[serde(default = "default_rarity")]
    pub rarity: u8,
    /// Chassis type, presentation only
    #[serde(default = "default_unit_type")]
    pub unit_type: u8,
    pub max_health: u32,
    /// Faces of the wheel, in display order
    pub wheel_values: Vec<u32>,
}

fn default_rarity() -> u8 {
    1
}

fn default_unit_type() -> u8 {
    1
}

impl UnitDefinition {
    pub fn new(id: DefinitionId, name: impl Into<String>, max_health: u32, wheel_values: Vec<u32>) -> Self {
        Self {
            id,
            name: name.into(),
            rarity: default_rarity(),
            unit_type: default_unit_type(),
            max_health,
            wheel_values,
        }
    }

    /// Definition used when a lookup misses
    pub fn fallback(id: DefinitionId) -> Self {
        Self::new(id, "Unknown", 100, vec![1, 2, 3, 4, 5])
    }

    /// Highest wheel face, if any
    pub fn max_wheel_value(&self) -> Option<u32> {
        self.wheel_values.iter().copied().max()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_health == 0 {
            return Err(self.invalid("max_health must be positive"));
        }
        if self.wheel_values.is_empty() {
            return Err(self.invalid("wheel_values must not be empty"));
        }
        if self.wheel_values.contains(&0) {
            return Err(self.invalid("wheel_values must all be positive"));
        }
        if self.wheel_values.iter().any(|&v| v > MAX_WHEEL_FACE) {
            return Err(self.invalid("wheel face too large to boost"));
        }
        Ok(())
    }

    pub(crate) fn invalid(&self, reason: &str) -> BattleError {
        BattleError::InvalidDefinition {
            id: self.id,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_valid() {
        let def = UnitDefinition::fallback(DefinitionId(99999));
        assert!(def.validate().is_ok());
        assert_eq!(def.name, "Unknown");
        assert_eq!(def.max_health, 100);
        assert_eq!(def.wheel_values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_wheel_rejected() {
        let def = UnitDefinition::new(DefinitionId(1), "Blank", 10, vec![]);
        assert!(matches!(
            def.validate(),
            Err(BattleError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_zero_health_rejected() {
        let def = UnitDefinition::new(DefinitionId(1), "Ghost", 0, vec![1]);
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_zero_face_rejected() {
        let def = UnitDefinition::new(DefinitionId(1), "Dud", 10, vec![0, 3]);
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_oversized_face_rejected() {
        let def = UnitDefinition::new(DefinitionId(1), "Huge", 10, vec![2, u32::MAX]);
        assert!(matches!(
            def.validate(),
            Err(BattleError::InvalidDefinition { .. })
        ));

        let edge = UnitDefinition::new(DefinitionId(2), "Edge", 10, vec![MAX_WHEEL_FACE]);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_max_wheel_value() {
        let def = UnitDefinition::new(DefinitionId(1), "Spread", 10, vec![4, 9, 2]);
        assert_eq!(def.max_wheel_value(), Some(9));
    }
}
