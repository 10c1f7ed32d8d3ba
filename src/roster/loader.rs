//! Roster lookup and TOML loading

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::Deserialize;

use crate::core::error::{BattleError, Result};
use crate::core::types::DefinitionId;
use crate::roster::definition::UnitDefinition;

/// Source of unit definitions
pub trait DefinitionProvider {
    /// Look up a definition by id
    fn get_definition(&self, id: DefinitionId) -> Result<Arc<UnitDefinition>>;

    /// Look up a definition, substituting the fallback on a miss
    fn resolve(&self, id: DefinitionId) -> Arc<UnitDefinition> {
        match self.get_definition(id) {
            Ok(def) => def,
            Err(e) => {
                tracing::warn!("{}; using fallback definition", e);
                Arc::new(UnitDefinition::fallback(id))
            }
        }
    }
}

/// In-memory set of validated definitions
#[derive(Debug, Clone, Default)]
pub struct Roster {
    definitions: AHashMap<DefinitionId, Arc<UnitDefinition>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, rejecting invalid data and duplicate ids
    pub fn insert(&mut self, definition: UnitDefinition) -> Result<()> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.id) {
            return Err(definition.invalid("duplicate definition id"));
        }
        self.definitions.insert(definition.id, Arc::new(definition));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definition ids in ascending order
    pub fn ids(&self) -> Vec<DefinitionId> {
        let mut ids: Vec<_> = self.definitions.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl DefinitionProvider for Roster {
    fn get_definition(&self, id: DefinitionId) -> Result<Arc<UnitDefinition>> {
        self.definitions
            .get(&id)
            .cloned()
            .ok_or(BattleError::NotFound(id))
    }
}

#[derive(Deserialize)]
struct RosterFile {
    #[serde(default)]
    units: Vec<UnitDefinition>,
}

/// Parse a roster from TOML text (`[[units]]` tables)
pub fn parse_roster(content: &str) -> Result<Roster> {
    let file: RosterFile = toml::from_str(content)?;
    let mut roster = Roster::new();
    for definition in file.units {
        roster.insert(definition)?;
    }
    Ok(roster)
}

/// Load a roster from a TOML file
pub fn load_roster(path: &Path) -> Result<Roster> {
    let content = fs::read_to_string(path)?;
    let roster = parse_roster(&content)?;
    tracing::debug!("Loaded {} unit definitions from {:?}", roster.len(), path);
    Ok(roster)
}
