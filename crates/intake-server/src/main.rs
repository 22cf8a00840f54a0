//! intake-server binary.
//!
//! Reads `intake.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the admissions API over HTTP.
//!
//! # Demo data
//!
//! ```
//! cargo run -p intake-server -- --seed-demo
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use intake_server::{expand_tilde, load_config, router, seed};
use intake_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Intake admissions server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "intake.toml")]
  config: PathBuf,

  /// Insert demo facilities, staff and admissions into an empty store, then
  /// exit.
  #[arg(long)]
  seed_demo: bool,
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

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: seed demo data and exit.
  if cli.seed_demo {
    let summary = seed::seed_demo(&store).await.context("seeding demo data")?;
    println!(
      "seeded {} facilities, {} employees, {} admissions into {}",
      summary.facilities,
      summary.employees,
      summary.admissions,
      store_path.display()
    );
    return Ok(());
  }

  let app = router(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
