//! Route Definitions
//!
//! Dispatches on the first path segment.

use super::{
    errors::ApiError,
    handlers::{BetHandler, Handler, PlayerHandler, SharedSession, WheelHandler},
    models::{GameRequest, GameResponse},
};
use tracing::debug;

/// The roulette game: `player`, `bet` and `wheel` over one shared session
pub struct Roulette {
    player: PlayerHandler,
    bet: BetHandler,
    wheel: WheelHandler,
}

impl Roulette {
    pub fn new(session: SharedSession) -> Self {
        Self {
            player: PlayerHandler::new(session.clone()),
            bet: BetHandler::new(session.clone()),
            wheel: WheelHandler::new(session),
        }
    }
}

impl Handler for Roulette {
    fn handle(&self, request: GameRequest) -> GameResponse {
        debug!(user = ?request.user, "{} {}", request.method, request.path);
        match request.first_segment() {
            Some("player") => self.player.handle(request),
            Some("bet") => self.bet.handle(request),
            Some("wheel") => self.wheel.handle(request),
            _ => {
                let request_id = request.request_id();
                ApiError::RouteNotFound(request.path).into_game_response(request_id)
            }
        }
    }
}
