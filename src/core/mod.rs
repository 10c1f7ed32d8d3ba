pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, BattleConfig, LineupConfig};
pub use error::{BattleError, Result};
pub use types::{DefinitionId, Round, Team, UnitId};
