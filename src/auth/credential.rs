//! # Stored Credentials
//!
//! A `Credential` only ever holds a hash. The identity write step is the
//! single place a plaintext becomes a credential.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::crypto::CredentialHasher;
use super::errors::AuthResult;

/// Password hash as persisted on identity records.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Hash a plaintext with the given collaborator.
    pub fn from_plaintext(plaintext: &str, hasher: &dyn CredentialHasher) -> AuthResult<Self> {
        hasher.hash(plaintext).map(Self)
    }

    pub fn verify(&self, plaintext: &str, hasher: &dyn CredentialHasher) -> AuthResult<bool> {
        hasher.verify(plaintext, &self.0)
    }

    pub fn as_hash(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

/// Records holding a credential: Admin, Teacher, Student.
pub trait IdentityRecord {
    fn credential(&self) -> &Credential;

    fn set_credential(&mut self, credential: Credential);
}
