use thiserror::Error;

use crate::core::types::{DefinitionId, Team, UnitId};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Invalid unit definition {id}: {reason}")]
    InvalidDefinition { id: DefinitionId, reason: String },

    #[error("Unit definition not found: {0}")]
    NotFound(DefinitionId),

    #[error("Insufficient action points: requested {requested}, available {available}")]
    InsufficientResource { requested: u32, available: u32 },

    #[error("Unit already boosted this round: {0}")]
    UnitAlreadyBoosted(UnitId),

    #[error("Unit {unit} cannot be boosted: {reason}")]
    UnitNotEligible { unit: UnitId, reason: String },

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Team has no units: {0}")]
    EmptyTeam(Team),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
