// GET handlers: snapshot, per-metric samples, version

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::AppState;
use crate::error::{CollectError, SampleError};
use crate::models::{CpuUsage, ErrorBody, HostSnapshot, MemUsage, NetUsage, Uptime, WgPeer};
use crate::version::{NAME, VERSION};

/// A failed measurement surfaces as 500 with the `{error}` shape so the
/// check plugin can tell it from a success body.
pub(super) struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: self.0 }),
        )
            .into_response()
    }
}

impl From<SampleError> for ApiError {
    fn from(e: SampleError) -> Self {
        Self(e.to_string())
    }
}

impl From<CollectError> for ApiError {
    fn from(e: CollectError) -> Self {
        Self(e.to_string())
    }
}

/// GET / — one full collection cycle. Partially failed cycles still answer
/// 200; only all measurements failing produces the error shape.
pub(super) async fn snapshot_handler(
    State(state): State<AppState>,
) -> Result<Json<HostSnapshot>, ApiError> {
    Ok(Json(state.collector.collect().await?))
}

/// GET /uptime — seconds since boot.
pub(super) async fn uptime_handler(
    State(state): State<AppState>,
) -> Result<Json<Uptime>, ApiError> {
    let uptime = state.collector.uptime()?;
    Ok(Json(Uptime { uptime }))
}

/// GET /cpu — CPU usage over one sampling window.
pub(super) async fn cpu_handler(State(state): State<AppState>) -> Result<Json<CpuUsage>, ApiError> {
    Ok(Json(state.collector.cpu().await?))
}

/// GET /memory — point-in-time memory usage.
pub(super) async fn memory_handler(
    State(state): State<AppState>,
) -> Result<Json<MemUsage>, ApiError> {
    Ok(Json(state.collector.memory()?))
}

/// GET /network — per-interface rates over one sampling window.
pub(super) async fn network_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<NetUsage>>, ApiError> {
    Ok(Json(state.collector.network().await?))
}

/// GET /wireguard — per-peer rates and handshake ages over one window.
pub(super) async fn wireguard_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<WgPeer>>, ApiError> {
    Ok(Json(state.collector.wireguard().await?))
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
