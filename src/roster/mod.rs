//! Unit roster - archetype definitions and their lookup
//!
//! The engine never reads data files itself; it consumes resolved
//! `UnitDefinition`s through a `DefinitionProvider`.

pub mod definition;
pub mod loader;

pub use definition::UnitDefinition;
pub use loader::{load_roster, parse_roster, DefinitionProvider, Roster};
