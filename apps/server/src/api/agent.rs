use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::info;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    agent_enabled: bool,
    last_sync_at: Option<DateTime<Utc>>,
}

/// Current agent toggle and last sync time.
async fn get_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusResponse>> {
    let sync_state = state.sync_state.get()?;
    Ok(Json(StatusResponse {
        agent_enabled: sync_state.agent_enabled,
        last_sync_at: sync_state.last_sync_at,
    }))
}

/// Most recent balance snapshot; an empty object before the first sync.
async fn get_cache(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    match state.snapshots.latest()? {
        Some(snapshot) => {
            let value = serde_json::to_value(snapshot)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(value))
        }
        None => Ok(Json(json!({}))),
    }
}

#[derive(serde::Deserialize)]
struct ToggleRequest {
    enabled: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleResponse {
    agent_enabled: bool,
}

/// Enable or disable the background sync agent.
async fn toggle_agent(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ToggleRequest>,
) -> ApiResult<Json<ToggleResponse>> {
    let sync_state = state.sync_state.set_agent_enabled(body.enabled)?;
    info!("[Agent] Agent mode set to {}", sync_state.agent_enabled);
    Ok(Json(ToggleResponse {
        agent_enabled: sync_state.agent_enabled,
    }))
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncResponse {
    ok: bool,
    last_sync_at: DateTime<Utc>,
}

/// Run a full sync now, regardless of the agent toggle.
async fn trigger_sync(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncResponse>> {
    info!("[Agent] Manual sync requested");
    let snapshot = state.orchestrator.run_full_sync().await?;
    Ok(Json(SyncResponse {
        ok: true,
        last_sync_at: snapshot.generated_at,
    }))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(get_status))
        .route("/cache", get(get_cache))
}

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/agent/toggle", post(toggle_agent))
        .route("/sync", post(trigger_sync))
}
