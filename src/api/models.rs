//! Request/Response Models
//!
//! Transport-agnostic request and response types plus the JSON payloads the
//! handlers produce.

use crate::games::{serialize_amount, Amount, BetResolution, Outcome};
use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::middleware::REQUEST_ID_HEADER;

/// Identity attached to a request once the authentication gate accepts it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// An already-parsed request as seen by the game core
#[derive(Debug, Clone)]
pub struct GameRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub user: Option<AuthenticatedUser>,
}

impl GameRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            user: None,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach an `Authorization: Basic ...` header
    pub fn with_basic_auth(self, username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        match HeaderValue::from_str(&format!("Basic {}", encoded)) {
            Ok(value) => self.with_header(header::AUTHORIZATION, value),
            Err(_) => self,
        }
    }

    /// First non-empty path segment, if any
    pub fn first_segment(&self) -> Option<&str> {
        self.segment(0)
    }

    /// The `index`-th non-empty path segment
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .nth(index)
    }

    pub fn request_id(&self) -> Option<String> {
        self.headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
}

/// Status, headers and body produced by a handler
#[derive(Debug, Clone)]
pub struct GameResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GameResponse {
    /// JSON response with the given status
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(payload)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        Ok(Self {
            status,
            headers,
            body: Bytes::from(body),
        })
    }

    /// Parse the body back into a JSON value
    pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// GET /player/
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerStatus {
    #[serde(serialize_with = "serialize_amount")]
    pub stake: f64,
    pub rounds: u64,
}

/// Active bets, label to amount
pub type BetsView = HashMap<String, Amount>;

pub fn bets_view(bets: &HashMap<String, f64>) -> BetsView {
    bets.iter()
        .map(|(label, amount)| (label.clone(), Amount(*amount)))
        .collect()
}

/// One bet in a POST /bet/ body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BetRequest {
    pub bet: String,
    pub amount: f64,
}

/// POST /bet/ accepts a single bet object or a list of them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BetPayload {
    Single(BetRequest),
    Many(Vec<BetRequest>),
}

impl BetPayload {
    pub fn into_bets(self) -> Vec<(String, f64)> {
        match self {
            BetPayload::Single(bet) => vec![(bet.bet, bet.amount)],
            BetPayload::Many(bets) => bets.into_iter().map(|b| (b.bet, b.amount)).collect(),
        }
    }
}

/// POST /wheel/
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinResponse {
    pub spin: Outcome,
    pub payout: Vec<BetResolution>,
    #[serde(serialize_with = "serialize_amount")]
    pub stake: f64,
    pub rounds: u64,
}
