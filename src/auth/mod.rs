//! # Credentials
//!
//! Password policy, the credential hashing collaborator and the stored
//! `Credential` type carried by identity records.

pub mod credential;
pub mod crypto;
pub mod errors;

pub use credential::{Credential, IdentityRecord};
pub use crypto::{Argon2Hasher, CredentialHasher, HashingConfig, PasswordPolicy};
pub use errors::{AuthError, AuthResult};
