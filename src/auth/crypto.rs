//! # Password Hashing
//!
//! One-way salted password transform used before identity records are
//! persisted. Plaintext never reaches the store.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// Password requirements applied by identity validators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default)]
    pub require_uppercase: bool,
    #[serde(default)]
    pub require_lowercase: bool,
    #[serde(default)]
    pub require_number: bool,
    #[serde(default)]
    pub require_special: bool,
}

fn default_min_length() -> usize {
    8
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            require_uppercase: false,
            require_lowercase: false,
            require_number: false,
            require_special: false,
        }
    }
}

impl PasswordPolicy {
    /// Check a password; the error is the rule it broke, phrased to follow
    /// the field label (`"password" <reason>`).
    pub fn check(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            return Err(format!(
                "length must be at least {} characters long",
                self.min_length
            ));
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err("must contain at least one uppercase letter".to_string());
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Err("must contain at least one lowercase letter".to_string());
        }
        if self.require_number && !password.chars().any(|c| c.is_numeric()) {
            return Err("must contain at least one number".to_string());
        }
        if self.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err("must contain at least one special character".to_string());
        }
        Ok(())
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Lanes
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    Params::DEFAULT_P_COST
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl HashingConfig {
    /// Cheapest parameters Argon2 accepts; for tests and local tooling.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn params(&self) -> AuthResult<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::InvalidParams(e.to_string()))
    }

    /// Reject parameters Argon2 would refuse at hash time
    pub fn validate(&self) -> AuthResult<()> {
        self.params().map(|_| ())
    }
}

/// The credential hashing collaborator.
///
/// `hash` is salted: equal inputs give different outputs, each of which
/// verifies against the original plaintext.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AuthResult<String>;

    fn verify(&self, plaintext: &str, hash: &str) -> AuthResult<bool>;
}

/// Argon2id hasher producing PHC strings
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    config: HashingConfig,
}

impl Argon2Hasher {
    pub fn new(config: HashingConfig) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn engine(&self) -> AuthResult<Argon2<'static>> {
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, self.config.params()?))
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            config: HashingConfig::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.engine()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::HashingFailed)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::MalformedHash)?;

        // Cost parameters are read back from the PHC string itself.
        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(HashingConfig::minimal()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("correct horse").unwrap();

        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hasher = hasher();
        let a = hasher.hash("same_password").unwrap();
        let b = hasher.hash("same_password").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify("same_password", &a).unwrap());
        assert!(hasher.verify("same_password", &b).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert_eq!(
            hasher().verify("x", "not-a-phc-string"),
            Err(AuthError::MalformedHash)
        );
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(Argon2Hasher::new(config), Err(AuthError::InvalidParams(_))));
    }

    #[test]
    fn test_password_policy() {
        let policy = PasswordPolicy {
            min_length: 8,
            require_uppercase: true,
            require_number: true,
            ..Default::default()
        };

        assert!(policy.check("Ab1").is_err());
        assert!(policy.check("abcdefgh1").is_err());
        assert!(policy.check("Abcdefgh").is_err());
        assert!(policy.check("Abcdefgh1").is_ok());
        assert_eq!(
            policy.check("short").unwrap_err(),
            "length must be at least 8 characters long"
        );
    }
}
