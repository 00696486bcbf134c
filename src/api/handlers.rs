//! Request Handlers
//!
//! Each handler owns one path segment. They share a single game session
//! behind a mutex so that reading bets, spinning, resolving and counting the
//! round happen as one step.

use super::{
    errors::ApiError,
    models::{bets_view, BetPayload, BetsView, GameRequest, GameResponse, PlayerStatus, SpinResponse},
};
use crate::games::{Table, Wheel, WheelVariant};
use axum::http::{Method, StatusCode};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Uniform request handling capability shared by every handler and the gate
pub trait Handler: Send + Sync {
    fn handle(&self, request: GameRequest) -> GameResponse;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle(&self, request: GameRequest) -> GameResponse {
        (**self).handle(request)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn handle(&self, request: GameRequest) -> GameResponse {
        (**self).handle(request)
    }
}

/// Table, wheels and round counter for one game session
#[derive(Debug)]
pub struct GameSession {
    pub table: Table,
    /// Spun unless the request names another variant
    pub wheel: Wheel,
    others: Vec<Wheel>,
    pub rounds: u64,
}

impl GameSession {
    pub fn new(table: Table, wheel: Wheel) -> Self {
        Self {
            table,
            wheel,
            others: Vec::new(),
            rounds: 0,
        }
    }

    /// Make `wheel` selectable by its variant; the default wheel is kept
    pub fn with_wheel(mut self, wheel: Wheel) -> Self {
        if wheel.variant() != self.wheel.variant() {
            self.others.retain(|w| w.variant() != wheel.variant());
            self.others.push(wheel);
        }
        self
    }

    /// Wheel for `variant`, or the default one when it is absent or not installed
    pub fn wheel_mut(&mut self, variant: Option<WheelVariant>) -> &mut Wheel {
        let index = variant.and_then(|v| self.others.iter().position(|w| w.variant() == v));
        match index {
            Some(index) => &mut self.others[index],
            None => &mut self.wheel,
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }
}

pub type SharedSession = Arc<Mutex<GameSession>>;

fn lock_session(session: &SharedSession) -> Result<MutexGuard<'_, GameSession>, ApiError> {
    session.lock().map_err(|_| ApiError::StateUnavailable)
}

/// Run `respond` and render any error at the handler boundary
fn respond_with<F>(request: &GameRequest, respond: F) -> GameResponse
where
    F: FnOnce(&GameRequest) -> Result<GameResponse, ApiError>,
{
    respond(request).unwrap_or_else(|e| {
        debug!("{} {} -> {}", request.method, request.path, e.status());
        e.into_game_response(request.request_id())
    })
}

/// Player status
/// GET /player/
pub struct PlayerHandler {
    session: SharedSession,
}

impl PlayerHandler {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    fn respond(&self, request: &GameRequest) -> Result<GameResponse, ApiError> {
        if request.method != Method::GET {
            return Err(ApiError::method_not_allowed(&request.method, &request.path, &[Method::GET]));
        }
        let status = {
            let session = lock_session(&self.session)?;
            PlayerStatus {
                stake: session.table.stake(),
                rounds: session.rounds,
            }
        };
        Ok(GameResponse::json(StatusCode::OK, &status)?)
    }
}

impl Handler for PlayerHandler {
    fn handle(&self, request: GameRequest) -> GameResponse {
        respond_with(&request, |r| self.respond(r))
    }
}

/// Betting
/// GET /bet/ views, POST /bet/ places, DELETE /bet/ clears
pub struct BetHandler {
    session: SharedSession,
}

impl BetHandler {
    const ALLOWED: [Method; 3] = [Method::GET, Method::POST, Method::DELETE];

    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    fn respond(&self, request: &GameRequest) -> Result<GameResponse, ApiError> {
        let bets: BetsView = match request.method {
            Method::GET => bets_view(lock_session(&self.session)?.table.bets()),
            Method::POST => {
                let payload: BetPayload = serde_json::from_slice(&request.body)
                    .map_err(|e| ApiError::malformed(e, &request.body))?;
                let mut session = lock_session(&self.session)?;
                session
                    .table
                    .place_bets(payload.into_bets())
                    .map_err(|e| ApiError::invalid_bet(e, &request.body))?;
                debug!(user = ?request.user, "bets now {:?}", session.table.bets());
                bets_view(session.table.bets())
            }
            Method::DELETE => {
                let mut session = lock_session(&self.session)?;
                session.table.clear_bets();
                bets_view(session.table.bets())
            }
            _ => {
                return Err(ApiError::method_not_allowed(
                    &request.method,
                    &request.path,
                    &Self::ALLOWED,
                ))
            }
        };
        Ok(GameResponse::json(StatusCode::OK, &bets)?)
    }
}

impl Handler for BetHandler {
    fn handle(&self, request: GameRequest) -> GameResponse {
        respond_with(&request, |r| self.respond(r))
    }
}

/// Spin and settle
/// POST /wheel/ spins the default wheel, POST /wheel/eu/ (or /wheel/us/) a
/// specific variant
pub struct WheelHandler {
    session: SharedSession,
}

impl WheelHandler {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    fn respond(&self, request: &GameRequest) -> Result<GameResponse, ApiError> {
        if request.method != Method::POST {
            return Err(ApiError::method_not_allowed(&request.method, &request.path, &[Method::POST]));
        }
        if !request.body.is_empty() {
            return Err(ApiError::malformed("wheel takes no request body", &request.body));
        }

        let variant = request.segment(1).and_then(WheelVariant::from_path_prefix);
        let response = {
            let mut session = lock_session(&self.session)?;
            let wheel = session.wheel_mut(variant);
            let landed_on = wheel.variant();
            let spin = wheel.spin();
            let payout = session.table.resolve(&spin);
            session.rounds += 1;
            info!(
                round = session.rounds,
                stake = session.table.stake(),
                wheel = %landed_on,
                "spin landed on {:?}",
                spin.keys().collect::<Vec<_>>()
            );
            SpinResponse {
                spin,
                payout,
                stake: session.table.stake(),
                rounds: session.rounds,
            }
        };
        Ok(GameResponse::json(StatusCode::OK, &response)?)
    }
}

impl Handler for WheelHandler {
    fn handle(&self, request: GameRequest) -> GameResponse {
        respond_with(&request, |r| self.respond(r))
    }
}
