//! Battle system - wheel rolls, boosts and initiative-ordered attacks
//!
//! Each round:
//! - Tactics: every living unit rolls its wheel; the player may spend action
//!   points to boost units to their best face plus a bonus
//! - Combat: living units attack in initiative order, one attack per step,
//!   until the order runs out or one side is wiped out

pub mod constants;
pub mod controller;
pub mod economy;
pub mod events;
pub mod initiative;
pub mod resolution;
pub mod units;
pub mod victory;
pub mod wheel;

// Re-exports for convenient access
pub use constants::*;
pub use controller::{BattleController, BattlePhase, BattleState, CombatStep};
pub use economy::ActionEconomy;
pub use events::{BattleEvent, BattleEventLog, BattleEventSink, BattleEventType};
pub use initiative::{initiative_order, InitiativePolicy};
pub use resolution::{apply_attack, pick_target, resolve_attack, AttackOutcome};
pub use units::BattleUnit;
pub use victory::{check_victory, VictoryOutcome};
