use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskd_store::TaskStore;

use crate::handlers;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
    /// Include fault detail in 500 responses (development mode).
    pub expose_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            expose_errors: false,
        }
    }
}

/// Shared application state passed to Axum handlers. The store is injected
/// here at startup; handlers never reach for process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    pub started_at: Instant,
    pub expose_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>, expose_errors: bool) -> Self {
        Self {
            store,
            started_at: Instant::now(),
            expose_errors,
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Create and start the server. Returns a handle keeping it alive.
pub async fn start(
    config: ServerConfig,
    store: Arc<dyn TaskStore>,
) -> Result<ServerHandle, std::io::Error> {
    let state = AppState::new(store, config.expose_errors);
    let router = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "task server started");

    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server,
    })
}

/// Handle returned by `start()`; keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}
