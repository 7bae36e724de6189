use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use tracing::info;

use coinvault_core::accounts::{AccountSummary, NewAccount};

#[derive(serde::Serialize)]
struct CreatedResponse {
    id: String,
}

#[derive(serde::Serialize)]
struct OkResponse {
    ok: bool,
}

/// List registered accounts, secrets redacted.
async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AccountSummary>>> {
    let accounts = state.accounts.list()?;
    Ok(Json(accounts))
}

/// Register a new exchange account.
async fn add_account(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewAccount>,
) -> ApiResult<Json<CreatedResponse>> {
    let account = state.accounts.add(body)?;
    info!(
        "[Accounts] Added {} account '{}'",
        account.exchange, account.name
    );
    Ok(Json(CreatedResponse { id: account.id }))
}

/// Remove an account. Unknown ids succeed as a no-op.
async fn remove_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<OkResponse>> {
    state.accounts.remove(&id)?;
    info!("[Accounts] Removed account {}", id);
    Ok(Json(OkResponse { ok: true }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts).post(add_account))
        .route("/accounts/{id}", delete(remove_account))
}
