use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use rand_core::OsRng;

use crate::lifecycle::traits::{CredentialError, CredentialService};

/// Iteration count used when nothing else is configured
pub const DEFAULT_PBKDF2_ROUNDS: u32 = 200_000;

/// PBKDF2-HMAC-SHA256 hashes stored as PHC strings
///
/// The round count is embedded in every hash, so verification keeps working
/// after the configured count changes.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2Credentials {
    rounds: u32,
}

impl Default for Pbkdf2Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_PBKDF2_ROUNDS)
    }
}

impl Pbkdf2Credentials {
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }
}

impl CredentialService for Pbkdf2Credentials {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params {
            rounds: self.rounds,
            output_length: 32,
        };
        Pbkdf2
            .hash_password_customized(password.as_bytes(), None, None, params, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(hash) => Pbkdf2.verify_password(password.as_bytes(), &hash).is_ok(),
            Err(_) => false,
        }
    }
}
