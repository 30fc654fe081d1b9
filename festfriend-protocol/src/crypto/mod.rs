pub mod hashing;

pub use hashing::{
    bind_material,
    Argon2Credentials,
    CredentialParams,
    CredentialScheme,
    CredentialSecret,
    HashingError,
};
