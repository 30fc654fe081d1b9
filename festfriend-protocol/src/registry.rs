/// Group registry — the single source of truth for group existence and membership.
///
/// One mutex guards every group record and every outstanding id reservation.
/// - Each `Group` stores its credential secret next to its member list, so an
///   id always maps to both or neither.
/// - Ids are reserved under the lock before the (slow) password hash runs, and
///   committed afterwards. Concurrent creates can never receive the same id.
/// - Duplicate check and append happen in one critical section.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use rand::Rng;
use thiserror::Error;

use crate::crypto::CredentialSecret;
use crate::ids::{generate_group_id, GroupId, IdError};
use crate::limits::{check_occupancy, Occupancy};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Group {0} not found")]
    NotFound(GroupId),

    #[error("Member {0} already in group")]
    DuplicateMember(String),

    #[error("Group {0} already exists")]
    AlreadyExists(GroupId),

    #[error("No free group IDs left")]
    Full,
}

pub type Result<T> = std::result::Result<T, RegistryError>;

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Group {
    secret: CredentialSecret,
    /// Usernames in join order.
    members: Vec<String>,
    /// Same names as `members`, for constant-time duplicate checks.
    index: HashSet<String>,
}

impl Group {
    fn new(secret: CredentialSecret) -> Self {
        Group {
            secret,
            members: Vec::new(),
            index: HashSet::new(),
        }
    }

    pub fn secret(&self) -> &CredentialSecret {
        &self.secret
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Case-sensitive exact match.
    pub fn has_member(&self, username: &str) -> bool {
        self.index.contains(username)
    }

    fn push_member(&mut self, username: &str) -> Result<()> {
        if !self.index.insert(username.to_owned()) {
            return Err(RegistryError::DuplicateMember(username.to_owned()));
        }
        self.members.push(username.to_owned());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GroupRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RegistryState {
    groups: HashMap<GroupId, Group>,
    /// Ids handed out to creates whose secret is still being computed.
    reserved: HashSet<GroupId>,
}

impl RegistryState {
    fn is_taken(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id) || self.reserved.contains(&id)
    }

    fn taken(&self) -> usize {
        self.groups.len() + self.reserved.len()
    }
}

/// In-memory group store. Volatile: lives exactly as long as the process.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    state: Mutex<RegistryState>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // Every critical section leaves the maps consistent, so a panic in
        // another holder does not invalidate the data.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of live groups (reservations excluded).
    pub fn len(&self) -> usize {
        self.lock().groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.lock().groups.contains_key(&id)
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Reserve a fresh id that is neither live nor already reserved.
    pub fn reserve_id<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GroupId> {
        let mut state = self.lock();

        match check_occupancy(state.taken()) {
            Occupancy::Exhausted => {
                log::warn!("Group ID space exhausted ({} taken)", state.taken());
                return Err(RegistryError::Full);
            }
            Occupancy::High => {
                log::warn!("Group ID space nearly full ({} taken)", state.taken());
            }
            Occupancy::Ok => {}
        }

        let id = generate_group_id(rng, state.taken(), |id| state.is_taken(id)).map_err(
            |e| match e {
                IdError::Exhausted | IdError::OutOfRange(_) => RegistryError::Full,
            },
        )?;
        state.reserved.insert(id);

        log::debug!("Reserved group ID {}", id);
        Ok(id)
    }

    /// Give back a reservation that will not be committed.
    pub fn release_id(&self, id: GroupId) {
        if self.lock().reserved.remove(&id) {
            log::debug!("Released group ID {}", id);
        }
    }

    /// Insert a new group with an empty member list.
    ///
    /// Clears the matching reservation if there is one. Fails if the id is
    /// already live.
    pub fn create_group(&self, id: GroupId, secret: CredentialSecret) -> Result<()> {
        let mut state = self.lock();

        if state.groups.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }

        state.reserved.remove(&id);
        state.groups.insert(id, Group::new(secret));

        log::info!("Group {} created ({} live)", id, state.groups.len());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookup and membership
    // -----------------------------------------------------------------------

    /// Return a copy of the group's stored secret.
    ///
    /// The copy lets callers verify a password without holding the lock.
    pub fn lookup(&self, id: GroupId) -> Result<CredentialSecret> {
        self.lock()
            .groups
            .get(&id)
            .map(|group| group.secret().clone())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Append `username` unless it is already a member.
    pub fn append_member(&self, id: GroupId, username: &str) -> Result<()> {
        let mut state = self.lock();
        let group = state
            .groups
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id))?;

        group.push_member(username)?;

        log::info!("Group {}: member joined ({} total)", id, group.members().len());
        Ok(())
    }

    /// Members in join order.
    pub fn list_members(&self, id: GroupId) -> Result<Vec<String>> {
        self.lock()
            .groups
            .get(&id)
            .map(|group| group.members().to_vec())
            .ok_or(RegistryError::NotFound(id))
    }
}
