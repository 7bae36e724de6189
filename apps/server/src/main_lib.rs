use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use coinvault_core::accounts::AccountStore;
use coinvault_core::cipher::SecretCipher;
use coinvault_core::exchanges::ExchangeRegistry;
use coinvault_core::snapshot::SnapshotStore;
use coinvault_core::state::StateStore;
use coinvault_core::sync::SyncOrchestrator;

use crate::auth::AdminCredentials;
use crate::config::Config;

pub struct AppState {
    pub accounts: Arc<AccountStore>,
    pub sync_state: Arc<StateStore>,
    pub snapshots: Arc<SnapshotStore>,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub admin: AdminCredentials,
}

pub fn init_tracing() {
    let log_format = std::env::var("CV_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let cipher = Arc::new(SecretCipher::new(&config.server_secret));

    let accounts = Arc::new(AccountStore::new(
        config.data_dir.join("accounts.json"),
        cipher.clone(),
    ));
    let sync_state = Arc::new(StateStore::new(config.data_dir.join("state.json")));
    let snapshots = Arc::new(SnapshotStore::new(config.data_dir.join("cache.json")));

    let registry = Arc::new(ExchangeRegistry::with_defaults(cipher).map_err(anyhow::Error::new)?);
    tracing::info!(
        "Exchange adapters registered: {}",
        registry.exchange_ids().join(", ")
    );

    let orchestrator = Arc::new(SyncOrchestrator::new(
        accounts.clone(),
        registry,
        snapshots.clone(),
        sync_state.clone(),
    ));

    Ok(Arc::new(AppState {
        accounts,
        sync_state,
        snapshots,
        orchestrator,
        admin: AdminCredentials::new(&config.admin_username, &config.admin_password),
    }))
}
