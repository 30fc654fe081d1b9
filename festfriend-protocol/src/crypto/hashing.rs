use argon2::{
    password_hash::{self, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::ids::GroupId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashingError {
    #[error("Hashing failed")]
    HashingFailed,
    #[error("Invalid work factor parameters")]
    InvalidParams,
    #[error("Stored credential secret is malformed")]
    MalformedSecret,
}

pub type Result<T> = std::result::Result<T, HashingError>;

/// Stored verification secret for a group (PHC string, salt embedded).
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSecret(String);

impl CredentialSecret {
    /// Wrap an already encoded secret.
    pub fn new(encoded: impl Into<String>) -> Self {
        CredentialSecret(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialSecret(..)")
    }
}

/// Hash and verify group passwords bound to a group id.
///
/// The registry only ever stores what `hash` returns and hands it back to
/// `verify`; implementations are free to choose the encoding.
pub trait CredentialScheme: Send + Sync {
    fn hash(&self, password: &str, id: GroupId) -> Result<CredentialSecret>;
    fn verify(&self, password: &str, id: GroupId, secret: &CredentialSecret) -> Result<bool>;
}

/// Build the hashed material: password followed by the decimal group id,
/// no delimiter.
///
/// The same password therefore yields unrelated secrets for different groups.
pub fn bind_material(password: &str, id: GroupId) -> Zeroizing<String> {
    let mut material = Zeroizing::new(String::with_capacity(password.len() + 5));
    material.push_str(password);
    material.push_str(&id.to_string());
    material
}

// ---------------------------------------------------------------------------
// Argon2id
// ---------------------------------------------------------------------------

/// Argon2id work factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for CredentialParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl CredentialParams {
    /// Cheapest parameters argon2 accepts. Only for tests.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Reject parameters the primitive would refuse.
    pub fn validate(&self) -> Result<()> {
        self.to_params().map(|_| ())
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|_| HashingError::InvalidParams)
    }
}

/// Default credential scheme: Argon2id over `password || id` with a fresh
/// random salt per secret.
pub struct Argon2Credentials {
    argon2: Argon2<'static>,
}

impl Argon2Credentials {
    pub fn new(params: CredentialParams) -> Result<Self> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_params()?);
        Ok(Self { argon2 })
    }
}

impl Default for Argon2Credentials {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialScheme for Argon2Credentials {
    /// Hash a group password using Argon2id
    ///
    /// # Returns
    /// Password hash string (PHC format)
    fn hash(&self, password: &str, id: GroupId) -> Result<CredentialSecret> {
        let material = bind_material(password, id);
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(material.as_bytes(), &salt)
            .map_err(|_| HashingError::HashingFailed)?
            .to_string();

        Ok(CredentialSecret(password_hash))
    }

    /// Verify a group password against a stored secret
    ///
    /// Cost parameters and salt are read from the secret itself, so secrets
    /// created under older parameters keep verifying.
    fn verify(&self, password: &str, id: GroupId, secret: &CredentialSecret) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(secret.as_str()).map_err(|_| HashingError::MalformedSecret)?;
        let material = bind_material(password, id);

        match self.argon2.verify_password(material.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(HashingError::MalformedSecret),
        }
    }
}
