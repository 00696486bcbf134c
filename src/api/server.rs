//! API Server
//!
//! HTTP adapter around the game core. Every method and path is forwarded to
//! the core handler, which does its own routing.

use super::{
    handlers::Handler,
    middleware::{create_cors_layer, request_id_middleware},
    models::{GameRequest, GameResponse},
};
use crate::config::ServerConfig;
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

struct AppState {
    service: Arc<dyn Handler>,
    max_body_bytes: usize,
}

impl IntoResponse for GameResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// HTTP server hosting one game service
pub struct ApiServer {
    config: ServerConfig,
    service: Arc<dyn Handler>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, service: Arc<dyn Handler>) -> Self {
        Self { config, service }
    }

    /// Start serving until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.socket_addr()?;
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Roulette server listening on http://{}", addr);
        self.log_server_info();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Roulette server stopped");
        Ok(())
    }

    /// Build the axum application with its middleware stack
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            service: self.service.clone(),
            max_body_bytes: self.config.max_body_bytes,
        });

        Router::new()
            .fallback(forward_to_game)
            .with_state(state)
            .layer(axum::middleware::from_fn(request_id_middleware))
            .layer(create_cors_layer(self.config.allowed_origins.clone()))
            .layer(TimeoutLayer::new(self.config.request_timeout()))
            .layer(TraceLayer::new_for_http())
    }

    fn socket_addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        Ok(SocketAddr::from((
            self.config.host.parse::<std::net::IpAddr>()?,
            self.config.port,
        )))
    }

    fn log_server_info(&self) {
        info!("   CORS: {:?}", self.config.allowed_origins);
        info!("   Request timeout: {}s", self.config.request_timeout_secs);
        info!("   Max body: {} bytes", self.config.max_body_bytes);
        info!("   GET    /player/  - stake and rounds");
        info!("   GET    /bet/     - active bets");
        info!("   POST   /bet/     - place bet(s)");
        info!("   DELETE /bet/     - clear bets");
        info!("   POST   /wheel/   - spin and settle");
    }
}

/// Convert the HTTP request, hand it to the game core, convert back
async fn forward_to_game(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            warn!("rejected request body: {}", e);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let request = GameRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        headers: parts.headers,
        body,
        user: None,
    };
    state.service.handle(request).into_response()
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
