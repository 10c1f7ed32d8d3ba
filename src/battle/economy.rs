//! Action point budget for the tactics phase

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};

/// Per-round pool of action points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEconomy {
    current: u32,
    max: u32,
}

impl ActionEconomy {
    /// A full budget of `max` points
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn can_afford(&self, amount: u32) -> bool {
        self.current >= amount
    }

    /// Spend `amount` points, or fail without touching the budget
    pub fn spend(&mut self, amount: u32) -> Result<()> {
        if !self.can_afford(amount) {
            return Err(BattleError::InsufficientResource {
                requested: amount,
                available: self.current,
            });
        }
        self.current -= amount;
        Ok(())
    }

    /// Refill to max (start of every tactics phase)
    pub fn reset(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_until_empty() {
        let mut economy = ActionEconomy::new(3);
        for expected in [2, 1, 0] {
            economy.spend(1).unwrap();
            assert_eq!(economy.current(), expected);
        }

        let err = economy.spend(1).unwrap_err();
        assert!(matches!(
            err,
            BattleError::InsufficientResource {
                requested: 1,
                available: 0
            }
        ));
        assert_eq!(economy.current(), 0);
    }

    #[test]
    fn test_failed_spend_does_not_mutate() {
        let mut economy = ActionEconomy::new(3);
        assert!(economy.spend(4).is_err());
        assert_eq!(economy.current(), 3);
        economy.spend(3).unwrap();
        assert_eq!(economy.current(), 0);
    }

    #[test]
    fn test_reset_refills() {
        let mut economy = ActionEconomy::new(2);
        economy.spend(2).unwrap();
        economy.reset();
        assert_eq!(economy.current(), 2);
        assert_eq!(economy.max(), 2);
    }
}
