//! API Error Handling
//!
//! Every failure is turned into a status code plus a human-readable reason,
//! rendered as a structured JSON body. Clients branch on the status code.

use super::models::GameResponse;
use crate::games::GameError;
use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
};
use serde::{Deserialize, Serialize};

/// Top-level error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (UNAUTHORIZED, NOT_FOUND, FORBIDDEN, etc.)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Offending request body, when one is to blame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authorized")]
    Unauthorized { realm: String },

    #[error("No route for '{0}'")]
    RouteNotFound(String),

    #[error("Method {method} not allowed for '{path}'")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },

    #[error("Malformed body: {reason}")]
    MalformedBody { reason: String, body: String },

    #[error("{source}")]
    InvalidBet { source: GameError, body: String },

    #[error("Game state unavailable")]
    StateUnavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn malformed(reason: impl ToString, body: &Bytes) -> Self {
        ApiError::MalformedBody {
            reason: reason.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn invalid_bet(source: GameError, body: &Bytes) -> Self {
        ApiError::InvalidBet {
            source,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn method_not_allowed(method: &Method, path: &str, allowed: &[Method]) -> Self {
        ApiError::MethodNotAllowed {
            method: method.clone(),
            path: path.to_string(),
            allowed: allowed.to_vec(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MalformedBody { .. } | ApiError::InvalidBet { .. } => StatusCode::FORBIDDEN,
            ApiError::StateUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::RouteNotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            ApiError::MalformedBody { .. } | ApiError::InvalidBet { .. } => "FORBIDDEN",
            ApiError::StateUnavailable => "SERVICE_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::MalformedBody { body, .. } | ApiError::InvalidBet { body, .. } => {
                Some(serde_json::Value::String(body.clone()))
            }
            _ => None,
        }
    }

    fn extra_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match self {
            ApiError::Unauthorized { realm } => {
                let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
                    .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
                headers.insert(header::WWW_AUTHENTICATE, challenge);
            }
            ApiError::MethodNotAllowed { allowed, .. } => {
                let list = allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&list) {
                    headers.insert(header::ALLOW, value);
                }
            }
            _ => {}
        }
        headers
    }

    /// Render as a structured error response
    pub fn into_game_response(self, request_id: Option<String>) -> GameResponse {
        let body = ErrorResponse {
            request_id,
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };

        let mut response = match GameResponse::json(self.status(), &body) {
            Ok(response) => response,
            Err(_) => GameResponse {
                status: self.status(),
                headers: HeaderMap::new(),
                body: Bytes::from(self.to_string()),
            },
        };
        response.headers.extend(self.extra_headers());
        response
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("Serialization error: {}", e))
    }
}
