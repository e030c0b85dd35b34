//! Argon2id implementation of the PasswordHasher port.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::ports::{HashError, PasswordHasher};

/// Argon2id parameters.
#[derive(Clone, Debug)]
pub struct Argon2Config {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost / iterations
    pub time_cost: u32,
    /// Parallelism
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        // OWASP recommended minimum for Argon2id
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Config {
    /// Faster settings for development/testing (NOT for production).
    #[cfg(any(test, debug_assertions))]
    pub fn fast() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Password hasher backed by Argon2id, emitting PHC-formatted hashes.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    config: Argon2Config,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new(Argon2Config::default())
    }
}

impl Argon2PasswordHasher {
    pub fn new(config: Argon2Config) -> Self {
        Self { config }
    }

    fn build_argon2(&self) -> Result<Argon2<'static>, HashError> {
        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            None,
        )
        .map_err(|e| HashError::Hash(format!("Invalid Argon2 params: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self.build_argon2()?;

        argon2::password_hash::PasswordHasher::hash_password(&argon2, password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::Hash(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;

        // Argon2 verification is constant-time.
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
