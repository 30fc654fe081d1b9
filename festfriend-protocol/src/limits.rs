//! Registry guardrails.
//!
//! These constants bound the identifier space and the work spent looking for
//! a free identifier, so that a nearly full registry degrades into a bounded
//! sweep instead of an endless rejection loop.

/// Number of distinct group identifiers (the full `u16` range).
pub const ID_SPACE: usize = 1 << 16;

/// Random draws attempted before falling back to a linear sweep.
///
/// With half the space taken the chance that all draws collide is 2^-64.
pub const MAX_RANDOM_DRAWS: usize = 64;

/// Occupancy above which creation is logged as a capacity warning.
pub const HIGH_OCCUPANCY_WARN: usize = ID_SPACE * 9 / 10;

/// Occupancy level of the identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    /// Plenty of free identifiers, rejection sampling stays cheap.
    Ok,
    /// Most identifiers taken — creates still succeed but draw more often.
    High,
    /// Every identifier is live or reserved.
    Exhausted,
}

/// Classify how full the identifier space is.
pub fn check_occupancy(taken: usize) -> Occupancy {
    if taken >= ID_SPACE {
        Occupancy::Exhausted
    } else if taken >= HIGH_OCCUPANCY_WARN {
        Occupancy::High
    } else {
        Occupancy::Ok
    }
}
