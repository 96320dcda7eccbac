//! HTTP route definitions

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::app::AppState;
use crate::client::{ClientBootstrap, PageContext};
use crate::util::time::uptime_secs;
use crate::ws::handler::live_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - support multiple origins (comma-separated in CLIENT_ORIGIN)
    let allowed_origins: Vec<header::HeaderValue> = state
        .config
        .client_origin
        .split(',')
        .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let routes = Router::new()
        .route("/health", get(health_handler))
        .route("/bootstrap", get(bootstrap_handler))
        .route(&state.config.live_endpoint, get(live_handler));

    // Also serve everything below the path prefix when the board is mounted there
    let prefix = state.config.path_prefix.clone();
    let router = if prefix.is_empty() {
        routes
    } else {
        routes.clone().nest(&prefix, routes)
    };

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_sessions: usize,
    commands_relayed: u64,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        active_sessions: state.controller.active_sessions(),
        commands_relayed: state.controller.commands_relayed(),
    })
}

// ============================================================================
// Bootstrap endpoint
// ============================================================================

#[derive(Deserialize)]
struct BootstrapQuery {
    /// Page path the client is running on
    #[serde(default)]
    path: Option<String>,
}

async fn bootstrap_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BootstrapQuery>,
) -> Json<ClientBootstrap> {
    let fallback_host = state.config.server_addr.to_string();
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let page = PageContext {
        host: header_str("x-forwarded-host")
            .or_else(|| header_str(header::HOST.as_str()))
            .unwrap_or(fallback_host.as_str()),
        protocol: header_str("x-forwarded-proto").unwrap_or("http"),
        path: query.path.as_deref().unwrap_or("/"),
        user_agent: header_str(header::USER_AGENT.as_str()).unwrap_or(""),
    };

    Json(ClientBootstrap::build(&state.config, &page))
}
