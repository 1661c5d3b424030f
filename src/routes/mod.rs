// HTTP routes

mod http;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::collector::HostCollector;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) collector: Arc<HostCollector>,
}

pub fn app(collector: Arc<HostCollector>) -> Router {
    let state = AppState { collector };
    Router::new()
        .route("/", get(http::snapshot_handler)) // GET / (full snapshot)
        .route("/uptime", get(http::uptime_handler)) // GET /uptime
        .route("/cpu", get(http::cpu_handler)) // GET /cpu
        .route("/memory", get(http::memory_handler)) // GET /memory
        .route("/network", get(http::network_handler)) // GET /network
        .route("/wireguard", get(http::wireguard_handler)) // GET /wireguard
        .route("/version", get(http::version_handler)) // GET /version
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
