//! Salted, iterated SHA-256 password credentials

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Iteration count for newly created credentials
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Salt length in bytes
pub const SALT_LEN: usize = 24;

/// Stored form of a password
///
/// The iteration count travels with the credential so that credentials
/// created with different counts can coexist in one registry.
#[derive(Clone, Debug)]
pub struct Credential {
    username: String,
    salt: [u8; SALT_LEN],
    iterations: u32,
    hash: [u8; 32],
}

impl Credential {
    /// Derive a credential with a fresh random salt and the default iteration count
    pub fn new(username: &str, password: &str) -> Self {
        Self::with_iterations(username, password, DEFAULT_ITERATIONS)
    }

    /// Derive a credential with a fresh random salt; `iterations` is raised to at least 1
    pub fn with_iterations(username: &str, password: &str, iterations: u32) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let iterations = iterations.max(1);
        let hash = iterated_hash(iterations, &salt, username, password);
        Self {
            username: username.to_string(),
            salt,
            iterations,
            hash,
        }
    }

    /// Rebuild a credential from previously derived parts
    pub fn from_parts(username: &str, salt: [u8; SALT_LEN], iterations: u32, hash: [u8; 32]) -> Self {
        Self {
            username: username.to_string(),
            salt,
            iterations: iterations.max(1),
            hash,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Recompute the hash for `password` with the stored salt and iterations
    pub fn matches(&self, password: &str) -> bool {
        iterated_hash(self.iterations, &self.salt, &self.username, password) == self.hash
    }
}

/// SHA-256 applied `iterations` times to `salt:username:password`
fn iterated_hash(iterations: u32, salt: &[u8], username: &str, password: &str) -> [u8; 32] {
    let mut seed = Vec::with_capacity(salt.len() + username.len() + password.len() + 2);
    seed.extend_from_slice(salt);
    seed.push(b':');
    seed.extend_from_slice(username.as_bytes());
    seed.push(b':');
    seed.extend_from_slice(password.as_bytes());

    let mut digest: [u8; 32] = Sha256::digest(&seed).into();
    for _ in 1..iterations {
        digest = Sha256::digest(digest).into();
    }
    digest
}

// Identity is (username, hash); the salt is deliberately not compared.
impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username && self.hash == other.hash
    }
}

impl Eq for Credential {}

impl Hash for Credential {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}:{}",
            self.username,
            self.iterations,
            hex::encode(self.salt),
            hex::encode(self.hash)
        )
    }
}
