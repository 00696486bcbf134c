//! Factory for building the game service from configuration
//!
//! Centralizes the wiring shared by the binary and the integration tests.

use crate::{
    api::{Authenticate, GameSession, Handler, Roulette, SharedSession},
    auth::UserRegistry,
    config::RouletteConfig,
    errors::RouletteResult,
    games::{Table, Wheel, WheelVariant},
};
use std::sync::Arc;
use tracing::info;

pub struct RouletteFactory;

impl RouletteFactory {
    /// Validate `config` and build the authenticated game service
    pub fn create_service(config: &RouletteConfig) -> RouletteResult<Arc<dyn Handler>> {
        let (service, _session) = Self::create_service_with_session(config)?;
        Ok(service)
    }

    /// Same as [`RouletteFactory::create_service`], also returning the session handle
    pub fn create_service_with_session(
        config: &RouletteConfig,
    ) -> RouletteResult<(Arc<dyn Handler>, SharedSession)> {
        config.validate()?;

        let users = Arc::new(Self::create_registry(config)?);
        let session = Self::create_session(config).shared();
        let service = Authenticate::with_realm(
            users,
            config.auth.realm.clone(),
            Roulette::new(session.clone()),
        );
        Ok((Arc::new(service), session))
    }

    /// Registry holding every configured user
    pub fn create_registry(config: &RouletteConfig) -> RouletteResult<UserRegistry> {
        let mut users = UserRegistry::with_iterations(config.auth.iterations);
        for entry in &config.auth.users {
            users.register(&entry.username, &entry.password)?;
        }
        info!("Registered {} user(s)", users.len());
        Ok(users)
    }

    /// Fresh table and wheels for one game session
    ///
    /// The configured variant is the default; the other variant is installed
    /// too so requests can name it in the path.
    pub fn create_session(config: &RouletteConfig) -> GameSession {
        let default = Self::create_wheel(config, config.wheel.variant);
        info!(
            "Wheel: {} ({} slots), seed: {:?}, stake: {}",
            default.variant(),
            default.slots().len(),
            config.wheel.seed,
            config.table.initial_stake
        );

        let other = match config.wheel.variant {
            WheelVariant::American => WheelVariant::European,
            WheelVariant::European => WheelVariant::American,
        };
        GameSession::new(Table::new(config.table.initial_stake), default)
            .with_wheel(Self::create_wheel(config, other))
    }

    fn create_wheel(config: &RouletteConfig, variant: WheelVariant) -> Wheel {
        match config.wheel.seed {
            Some(seed) => Wheel::seeded(variant, seed),
            None => Wheel::new(variant),
        }
    }
}
