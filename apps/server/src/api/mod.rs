use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::main_lib::AppState;

mod accounts;
mod agent;

/// Assembles the full API surface.
///
/// Status and cache reads stay public; account mutations, the agent
/// toggle, and the manual sync trigger sit behind the admin gate.
pub fn app_router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .merge(accounts::router())
        .merge(agent::admin_router())
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let public = agent::public_router();

    Router::new()
        .nest("/api", public.merge(admin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
