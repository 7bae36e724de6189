use coinvault_server::api::app_router;
use coinvault_server::config::Config;
use coinvault_server::{build_state, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    config.warn_on_insecure_defaults();
    let state = build_state(&config)?;

    // Start background balance sync scheduler
    let _scheduler = scheduler::start_sync_scheduler(state.clone(), config.sync_interval_secs);

    let router = app_router(state);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
