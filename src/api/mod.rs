//! Roulette Game API
//!
//! Transport-agnostic request routing for the roulette game, an
//! authentication gate in front of it, and an axum adapter that serves it.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod server;

pub use errors::ApiError;
pub use handlers::{BetHandler, GameSession, Handler, PlayerHandler, SharedSession, WheelHandler};
pub use models::{AuthenticatedUser, GameRequest, GameResponse};
pub use routes::Roulette;
pub use security::Authenticate;
pub use server::ApiServer;
