use super::credential::{Credential, DEFAULT_ITERATIONS};
use std::collections::HashMap;

const SENTINEL_KEY: &str = "";
const SENTINEL_USERNAME: &str = "__dummy__";
const SENTINEL_PASSWORD: &str = "Doesn't matter";
const MISMATCH_PASSWORD: &str = "Something which doesn't match";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credential: username must not be empty")]
    InvalidCredential,
}

/// Username to credential lookup
///
/// A sentinel credential lives under the empty key. Lookups for unknown users
/// are checked against it, so every call to [`UserRegistry::matches`] costs one
/// full hash derivation whether or not the username exists.
#[derive(Debug, Clone)]
pub struct UserRegistry {
    users: HashMap<String, Credential>,
    iterations: u32,
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::with_iterations(DEFAULT_ITERATIONS)
    }

    /// Registry whose sentinel and newly registered users use `iterations`
    pub fn with_iterations(iterations: u32) -> Self {
        let mut users = HashMap::new();
        users.insert(
            SENTINEL_KEY.to_string(),
            Credential::with_iterations(SENTINEL_USERNAME, SENTINEL_PASSWORD, iterations),
        );
        Self {
            users,
            iterations: iterations.max(1),
        }
    }

    /// Add a credential, replacing any existing one for the same username
    pub fn add(&mut self, credential: Credential) -> Result<(), AuthError> {
        if credential.username().is_empty() {
            return Err(AuthError::InvalidCredential);
        }
        self.users.insert(credential.username().to_string(), credential);
        Ok(())
    }

    /// Derive and add a credential for `username`
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() {
            return Err(AuthError::InvalidCredential);
        }
        self.add(Credential::with_iterations(username, password, self.iterations))
    }

    /// Check a username/password pair; unknown users always fail
    pub fn matches(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(credential) if username != SENTINEL_KEY => credential.matches(password),
            _ => {
                // Unknown users pay for one hash too; that password never matches.
                if let Some(sentinel) = self.sentinel() {
                    std::hint::black_box(sentinel.matches(MISMATCH_PASSWORD));
                }
                false
            }
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        username != SENTINEL_KEY && self.users.contains_key(username)
    }

    /// Number of registered users, not counting the sentinel
    pub fn len(&self) -> usize {
        self.users.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sentinel(&self) -> Option<&Credential> {
        self.users.get(SENTINEL_KEY)
    }
}
