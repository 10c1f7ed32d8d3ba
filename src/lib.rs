//! Open Battle Tactics - turn-based wheel combat simulator

pub mod battle;
pub mod core;
pub mod roster;
