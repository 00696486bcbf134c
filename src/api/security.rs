//! Authentication Gate
//!
//! HTTP Basic authentication in front of any [`Handler`]. Every rejection
//! looks the same, so a client cannot tell an unknown username from a wrong
//! password.

use super::{
    errors::ApiError,
    handlers::Handler,
    models::{AuthenticatedUser, GameRequest, GameResponse},
};
use crate::auth::UserRegistry;
use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_REALM: &str = "roulette@localhost";

/// Wraps `target`, forwarding only requests with valid Basic credentials
pub struct Authenticate<H> {
    users: Arc<UserRegistry>,
    realm: String,
    target: H,
}

impl<H: Handler> Authenticate<H> {
    pub fn new(users: Arc<UserRegistry>, target: H) -> Self {
        Self::with_realm(users, DEFAULT_REALM, target)
    }

    pub fn with_realm(users: Arc<UserRegistry>, realm: impl Into<String>, target: H) -> Self {
        Self {
            users,
            realm: realm.into(),
            target,
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }
}

impl<H: Handler> Handler for Authenticate<H> {
    fn handle(&self, mut request: GameRequest) -> GameResponse {
        if let Some((username, password)) = basic_credentials(&request.headers) {
            if self.users.matches(&username, &password) {
                debug!("authenticated {}", username);
                request.user = Some(AuthenticatedUser(username));
                return self.target.handle(request);
            }
        }

        warn!("rejected unauthenticated {} {}", request.method, request.path);
        ApiError::Unauthorized {
            realm: self.realm.clone(),
        }
        .into_game_response(request.request_id())
    }
}

/// Extract `(username, password)` from an `Authorization: Basic ...` header
///
/// Returns `None` for a missing header, any other scheme, bad base64,
/// non-UTF-8 content or a payload without a `:`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if scheme != "Basic" {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
