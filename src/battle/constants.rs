//! Battle system constants - all tunable values in one place

/// Action points granted per tactics phase
pub const DEFAULT_ACTION_POINTS: u32 = 3;

/// Action points spent by one boost
pub const BOOST_COST: u32 = 1;

/// Added to the highest wheel face when a unit is boosted
pub const BOOST_BONUS: u32 = 2;

/// Wheel value of a unit that has not rolled this round
pub const UNROLLED: u32 = 0;

/// Player units act before enemies by default
pub const PLAYER_ALWAYS_STARTS: bool = true;
