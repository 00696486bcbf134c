//! Roulette Service
//!
//! A single-process, in-memory roulette game behind HTTP Basic
//! authentication. The wheel and table live in [`games`], credentials in
//! [`auth`], and request routing plus the axum adapter in [`api`].

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod factory;
pub mod games;

pub use api::{ApiServer, GameRequest, GameResponse, Handler};
pub use config::RouletteConfig;
pub use errors::{RouletteError, RouletteResult};
pub use factory::RouletteFactory;
