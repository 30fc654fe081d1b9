//! Request orchestration for create / join / list.
//!
//! Every operation checks, in this order: the group exists, the password is
//! correct, the username is free. Each check short-circuits with its own
//! error, so a caller without the password still learns whether a group
//! exists.

use std::sync::Arc;

use thiserror::Error;

use crate::crypto::{CredentialScheme, HashingError};
use crate::ids::{GroupId, IdError};
use crate::registry::{GroupRegistry, RegistryError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Unknown group. `id` is the normalized wire value, which may lie
    /// outside the u16 range.
    #[error("Group {id} not found!")]
    NotFound { id: i64 },

    #[error("Wrong groupID or password!")]
    Unauthorized,

    #[error("{username} already exists!")]
    Conflict { username: String },

    #[error("No free group IDs left!")]
    RegistryFull,

    /// A reserved id turned out to be live already.
    #[error("Group ID {0} collided with a live group")]
    IdCollision(GroupId),

    #[error("Credential backend failure: {0}")]
    Credential(#[from] HashingError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// True for the errors a client caused and can fix by changing its input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Unauthorized | Self::Conflict { .. }
        )
    }
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => Self::NotFound { id: id.get().into() },
            RegistryError::DuplicateMember(username) => Self::Conflict { username },
            RegistryError::Full => Self::RegistryFull,
            RegistryError::AlreadyExists(id) => Self::IdCollision(id),
        }
    }
}

/// Group operations over an injected registry and credential scheme.
#[derive(Clone)]
pub struct GroupService {
    registry: Arc<GroupRegistry>,
    credentials: Arc<dyn CredentialScheme>,
}

impl GroupService {
    pub fn new(registry: Arc<GroupRegistry>, credentials: Arc<dyn CredentialScheme>) -> Self {
        Self {
            registry,
            credentials,
        }
    }

    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    /// Create a group protected by `password` and return its id.
    ///
    /// The id is reserved before hashing and the lock is not held while the
    /// hash is computed.
    pub fn create_group(&self, password: &str) -> Result<GroupId> {
        let id = self.registry.reserve_id(&mut rand::thread_rng())?;

        let secret = match self.credentials.hash(password, id) {
            Ok(secret) => secret,
            Err(e) => {
                self.registry.release_id(id);
                log::error!("Hashing password for group {} failed: {}", id, e);
                return Err(e.into());
            }
        };

        if let Err(e) = self.registry.create_group(id, secret) {
            self.registry.release_id(id);
            return Err(e.into());
        }
        Ok(id)
    }

    /// Add `username` to the group identified by the wire id `raw_id`.
    pub fn join_group(&self, raw_id: i64, password: &str, username: &str) -> Result<()> {
        let id = self.authorize(raw_id, password)?;

        self.registry.append_member(id, username).map_err(|e| {
            if let RegistryError::DuplicateMember(_) = e {
                log::info!("Group {}: rejected duplicate member", id);
            }
            ServiceError::from(e)
        })
    }

    /// List the members of the group identified by the wire id `raw_id`.
    pub fn get_members(&self, raw_id: i64, password: &str) -> Result<Vec<String>> {
        let id = self.authorize(raw_id, password)?;
        Ok(self.registry.list_members(id)?)
    }

    /// Existence check, then password check.
    fn authorize(&self, raw_id: i64, password: &str) -> Result<GroupId> {
        let id = GroupId::from_wire(raw_id).map_err(|e| match e {
            IdError::OutOfRange(id) => ServiceError::NotFound { id },
            IdError::Exhausted => ServiceError::RegistryFull,
        })?;

        let secret = self.registry.lookup(id)?;

        if !self.credentials.verify(password, id, &secret)? {
            log::warn!("Group {}: wrong password", id);
            return Err(ServiceError::Unauthorized);
        }

        Ok(id)
    }
}
