//! ferrovis-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, seeds reference data and serves the API over HTTP.
//!
//! ```
//! cargo run -p ferrovis-server -- --seed-only
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use ferrovis_core::Catalog;
use ferrovis_server::{AppState, BUILD, ServerConfig};
use ferrovis_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Ferrovis API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Apply the schema and seed reference data, then exit.
  #[arg(long)]
  seed_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  info!(
    version = BUILD.version,
    commit = BUILD.commit,
    build_date = BUILD.date,
    environment = %server_cfg.environment,
    "starting Ferrovis API server"
  );

  let catalog = Catalog::builtin().context("built-in catalog is malformed")?;

  // Open SQLite store; this also applies the schema.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  ferrovis_server::with_store(store, |store| run(store, server_cfg, catalog, cli.seed_only)).await
}

/// Seed, then serve until Ctrl-C. The caller closes `store` afterwards.
async fn run(
  store: SqliteStore,
  server_cfg: ServerConfig,
  catalog: Catalog,
  seed_only: bool,
) -> anyhow::Result<()> {
  ferrovis_server::bootstrap(&store, &catalog)
    .await
    .context("failed to seed reference data")?;

  if seed_only {
    return Ok(());
  }

  let address = server_cfg.address();
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };
  let app = ferrovis_server::router(state);

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  info!("Listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server runs
/// until killed.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to install Ctrl-C handler");
    std::future::pending::<()>().await;
  }
  info!("received Ctrl-C, shutting down");
}
