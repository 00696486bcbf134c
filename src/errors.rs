//! Crate-level error type
//!
//! Wraps the per-module errors so startup code can use `?` across them.
//! Request-time failures are rendered by [`crate::api::ApiError`] instead.

use crate::{auth::AuthError, config::ConfigError};

/// Root error type for roulette service operations
#[derive(Debug, thiserror::Error)]
pub enum RouletteError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),
}

pub type RouletteResult<T> = Result<T, RouletteError>;
