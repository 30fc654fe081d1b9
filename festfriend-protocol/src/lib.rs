//! # FestFriend Protocol
//!
//! **Password-gated group registry.**
//!
//! A client creates a group protected by a password and receives a 16-bit
//! group id. Anyone presenting that id and password can join the group under
//! a username or list its members. This crate is the transport-agnostic core:
//!
//! - **Collision-free ids** over the full `u16` space, with a defined
//!   `RegistryFull` outcome instead of an unbounded retry loop
//! - **Group-bound credentials** (Argon2id over `password || id`, random salt)
//! - **Serialized registry mutations** (no duplicate ids, no duplicate members)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use festfriend_protocol::{Argon2Credentials, CredentialParams, GroupRegistry, GroupService};
//!
//! let credentials = Argon2Credentials::new(CredentialParams::insecure_fast()).unwrap();
//! let service = GroupService::new(Arc::new(GroupRegistry::new()), Arc::new(credentials));
//!
//! let id = service.create_group("mypass").unwrap();
//! service.join_group(id.get().into(), "mypass", "alice").unwrap();
//! assert_eq!(service.get_members(id.get().into(), "mypass").unwrap(), vec!["alice"]);
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ids`] | `GroupId`, wire id normalization, id allocation |
//! | [`crypto`] | Credential scheme trait and the Argon2id implementation |
//! | [`registry`] | Mutex-guarded in-memory group store |
//! | [`service`] | Create / join / list orchestration and error taxonomy |
//! | [`limits`] | Id space size and allocation bounds |

#![allow(clippy::doc_lazy_continuation)]

// ── Public modules ──────────────────────────────────────────────────────────

/// Credential hashing and verification.
pub mod crypto;

/// Group identifiers and allocation.
pub mod ids;

/// Identifier space guardrails.
pub mod limits;

/// In-memory group store.
pub mod registry;

/// Request orchestration.
pub mod service;

// ── Re-exports for convenience ──────────────────────────────────────────────

pub use crypto::{
    Argon2Credentials, CredentialParams, CredentialScheme, CredentialSecret, HashingError,
};

pub use ids::{normalize_wire_id, GroupId, IdError};

pub use registry::{GroupRegistry, RegistryError};

pub use service::{GroupService, ServiceError};

// ── Library metadata ────────────────────────────────────────────────────────

/// FestFriend protocol version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version() -> &'static str {
    VERSION
}

// ── Tests ───────────────────────────────────────────────────────────────────
