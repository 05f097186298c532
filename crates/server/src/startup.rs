use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{runtime, seeder, storage::{JsonFileStore, KeyValueStore}};

/// Overrides taken from the command line; they win over config and env.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub port: Option<u16>,
    pub seed: bool,
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration (config.toml → env → CLI overrides) and validate it.
pub fn load_config(opts: &RunOptions) -> Result<AppConfig, StartupError> {
    let mut cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    apply_overrides(&mut cfg, opts)?;
    Ok(cfg)
}

/// Apply command-line overrides on top of an already loaded config.
pub fn apply_overrides(cfg: &mut AppConfig, opts: &RunOptions) -> Result<(), StartupError> {
    if let Some(port) = opts.port {
        cfg.server.port = port;
        cfg.normalize_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    }
    if opts.seed {
        cfg.storage.seed_on_start = true;
    }
    Ok(())
}

/// Port to suggest when `port` is taken; falls back to 8001 at the top of the range.
pub fn suggest_port(port: u16) -> u16 {
    match port.checked_add(1) {
        Some(next) => next,
        None => 8001,
    }
}

/// Bind the listener, reporting an occupied port with a suggestion for another one.
pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener, StartupError> {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr).await.map_err(|source| match source.kind() {
        std::io::ErrorKind::AddrInUse => StartupError::PortInUse { port, suggested: suggest_port(port) },
        _ => StartupError::Bind { addr, source },
    })
}

/// Open the store, optionally seed it, and build the router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(&cfg.server.frontend_dir, &cfg.storage.path).await?;

    let store = JsonFileStore::open_with_quota(&cfg.storage.path, cfg.storage.quota_bytes).await?;
    info!(path = %store.path().display(), "storage opened");
    let store: Arc<dyn KeyValueStore> = store;

    if cfg.storage.seed_on_start {
        seeder::seed(store.as_ref()).await?;
    }

    let state = AppState { store };
    Ok(routes::build_router(state, &cfg.server.frontend_dir, build_cors()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; server will run until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(opts: RunOptions) -> Result<(), StartupError> {
    let cfg = load_config(&opts)?;
    let app = build_app(&cfg).await?;

    let listener = bind_listener(&cfg.server.host, cfg.server.port).await?;
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        root = %cfg.server.frontend_dir,
        "HTTP服务器已启动，请在浏览器中访问: http://localhost:{}",
        cfg.server.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("服务器已停止");
    Ok(())
}
