use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;

use crate::error::{Error, Result};

const ARGON2_MEMORY: u32 = 64 * 1024; // KiB, so 64MB
const ARGON2_ITERATIONS: u32 = 1;
const ARGON2_PARALLELISM: u32 = 4;
const ARGON2_OUTPUT_LEN: usize = 32;

const KEY_PREFIX: &str = "slate";
const LOOKUP_LENGTH: usize = 8;
const SECRET_LENGTH: usize = 24;
const SECRET_BYTES: usize = 12;

pub struct KeyGenerator {
    argon2: Argon2<'static>,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyGenerator {
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(
            ARGON2_MEMORY,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            Some(ARGON2_OUTPUT_LEN),
        )
        .expect("invalid argon2 params");

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Generates a new API key with the format: slate_<lookup>_<secret>
    /// Returns (raw_key, lookup, hash)
    pub fn generate(&self) -> Result<(String, String, String)> {
        let lookup = generate_lookup();
        let secret = generate_secret();
        let raw_key = build_key(&lookup, &secret);
        let hash = self.hash(&raw_key)?;
        Ok((raw_key, lookup, hash))
    }

    /// Hashes a raw key using Argon2id
    pub fn hash(&self, key: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(key.as_bytes(), &salt)
            .map_err(|e| Error::Config(format!("failed to hash key: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a raw key against a stored hash
    pub fn verify(&self, key: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| Error::Config(format!("invalid hash format: {e}")))?;

        match self.argon2.verify_password(key.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Config(format!("failed to verify key: {e}"))),
        }
    }
}

/// Generates the lookup portion of the key (first 8 chars of a UUID)
#[must_use]
fn generate_lookup() -> String {
    let uuid = uuid::Uuid::new_v4();
    uuid.to_string()[..LOOKUP_LENGTH].to_string()
}

/// Generates a cryptographically secure random hex string for the secret
#[must_use]
fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)[..SECRET_LENGTH].to_string()
}

fn build_key(lookup: &str, secret: &str) -> String {
    format!("{KEY_PREFIX}_{lookup}_{secret}")
}

/// Parses a key string into its components (lookup, secret)
pub fn parse_key(key: &str) -> Result<(String, String)> {
    let prefix = format!("{KEY_PREFIX}_");
    if !key.starts_with(&prefix) {
        return Err(Error::InvalidKeyFormat);
    }

    let parts: Vec<&str> = key.split('_').collect();
    if parts.len() != 3 {
        return Err(Error::InvalidKeyFormat);
    }

    let lookup = parts[1];
    let secret = parts[2];

    if lookup.len() != LOOKUP_LENGTH || secret.len() != SECRET_LENGTH {
        return Err(Error::InvalidKeyFormat);
    }

    Ok((lookup.to_string(), secret.to_string()))
}
