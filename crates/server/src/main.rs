use std::sync::Arc;

use anyhow::Context;
use internship_server::{
    api::{self, AppState, Collaborators},
    config::ServerConfig,
    db,
    notify::dispatcher_from_config,
    session::JwtSessionVerifier,
    storage::SupabaseObjectStore,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting internship server");
    let config = ServerConfig::load().context("failed to load server config")?;

    let db = db::init_pool_and_migrate(config.database_url()?)
        .await
        .context("failed to initialize database")?;

    let notifier = dispatcher_from_config(&config.notifications)
        .context("failed to initialize notification dispatcher")?;
    info!(provider = notifier.name(), "notification dispatcher ready");

    if config.storage.service_key.is_none() {
        warn!("STORAGE_SERVICE_KEY is not set, file routes will fail");
    }
    let collaborators = Collaborators {
        sessions: Arc::new(JwtSessionVerifier::new(
            config.jwt_secret()?,
            config.session.audience.as_deref(),
        )),
        notifier,
        objects: Arc::new(SupabaseObjectStore::new(
            config.storage.base_url.clone(),
            config.storage.service_key.clone(),
        )),
    };

    let state = Arc::new(AppState::new(db, &config, collaborators));
    let app = api::create_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;
    info!(addr = %config.server.listen_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping server");
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
