//! Roulette Server Binary
//!
//! Loads configuration, registers users and serves the game over HTTP.

use clap::Parser;
use roulette_service::{
    config::UserEntry, games::WheelVariant, ApiServer, RouletteConfig, RouletteFactory,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "roulette-server")]
#[command(about = "In-memory roulette game server", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from the development preset (seeded European wheel, demo user)
    #[arg(long)]
    dev: bool,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,

    /// Wheel variant: american or european
    #[arg(long)]
    variant: Option<WheelVariant>,

    /// Seed for reproducible spins
    #[arg(long)]
    seed: Option<u64>,

    /// Initial table stake
    #[arg(long)]
    stake: Option<f64>,

    /// User to register, as name:password (repeatable)
    #[arg(long = "user", value_parser = parse_user)]
    users: Vec<UserEntry>,
}

fn parse_user(raw: &str) -> Result<UserEntry, String> {
    match raw.split_once(':') {
        Some((username, password)) if !username.is_empty() => Ok(UserEntry {
            username: username.to_string(),
            password: password.to_string(),
        }),
        _ => Err(format!("expected name:password, got '{}'", raw)),
    }
}

impl Args {
    fn into_config(self) -> Result<RouletteConfig, Box<dyn std::error::Error>> {
        let mut config = match (&self.config, self.dev) {
            (Some(path), _) => RouletteConfig::from_file(path)?,
            (None, true) => RouletteConfig::development(),
            (None, false) => RouletteConfig::default(),
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(variant) = self.variant {
            config.wheel.variant = variant;
        }
        if self.seed.is_some() {
            config.wheel.seed = self.seed;
        }
        if let Some(stake) = self.stake {
            config.table.initial_stake = stake;
        }
        for user in self.users {
            config.auth.users.retain(|u| u.username != user.username);
            config.auth.users.push(user);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .init();

    info!("Starting roulette server v{}", env!("CARGO_PKG_VERSION"));
    let service = RouletteFactory::create_service(&config)?;
    if config.auth.users.is_empty() {
        tracing::warn!("No users configured; every request will be rejected with 401");
    }

    ApiServer::new(config.server.clone(), service).run().await
}
