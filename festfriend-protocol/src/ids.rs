/// Group identifier type and allocation.
///
/// - `GroupId`: 16-bit identifier, unique across all live groups
/// - `normalize_wire_id`: maps the signed wire representation onto the u16 range
/// - `generate_group_id`: bounded rejection sampling over the free id space

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::limits::{ID_SPACE, MAX_RANDOM_DRAWS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Group ID space exhausted")]
    Exhausted,

    #[error("Group ID {0} outside the 16-bit range")]
    OutOfRange(i64),
}

pub type Result<T> = std::result::Result<T, IdError>;

// ---------------------------------------------------------------------------
// GroupId
// ---------------------------------------------------------------------------

/// Group identifier — any value of the full `u16` range.
///
/// Serialized as a bare integer so it drops straight into JSON bodies.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u16);

impl GroupId {
    /// Resolve a signed wire value into a group id.
    ///
    /// Negative values are shifted by 2^16 first. Values that still fall
    /// outside [0, 65535] can never name a group and are returned as
    /// `OutOfRange` carrying the normalized number.
    pub fn from_wire(raw: i64) -> Result<Self> {
        let normalized = normalize_wire_id(raw);
        u16::try_from(normalized)
            .map(GroupId)
            .map_err(|_| IdError::OutOfRange(normalized))
    }

    /// Return the raw value.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl From<u16> for GroupId {
    fn from(value: u16) -> Self {
        GroupId(value)
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a signed wire id onto the unsigned range: `n < 0` becomes `n + 65536`.
///
/// Existing clients send ids as signed shorts, so 52102 may arrive as -13434.
pub fn normalize_wire_id(raw: i64) -> i64 {
    if raw < 0 {
        raw + ID_SPACE as i64
    } else {
        raw
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Pick an unused group id.
///
/// Draws uniformly from the whole space up to `MAX_RANDOM_DRAWS` times and
/// returns the first draw for which `is_taken` is false. If every draw
/// collides, sweeps the space from a random offset so a free id is still
/// found whenever one exists.
///
/// # Arguments
/// * `rng` - Randomness source
/// * `taken` - Number of ids currently unavailable
/// * `is_taken` - Membership test for unavailable ids
pub fn generate_group_id<R, F>(rng: &mut R, taken: usize, is_taken: F) -> Result<GroupId>
where
    R: Rng + ?Sized,
    F: Fn(GroupId) -> bool,
{
    if taken >= ID_SPACE {
        return Err(IdError::Exhausted);
    }

    for _ in 0..MAX_RANDOM_DRAWS {
        let candidate = GroupId(rng.gen());
        if !is_taken(candidate) {
            return Ok(candidate);
        }
    }

    log::debug!(
        "{} random draws collided ({} ids taken), sweeping",
        MAX_RANDOM_DRAWS,
        taken
    );

    let start: u16 = rng.gen();
    (0..=u16::MAX)
        .map(|offset| GroupId(start.wrapping_add(offset)))
        .find(|candidate| !is_taken(*candidate))
        .ok_or(IdError::Exhausted)
}
