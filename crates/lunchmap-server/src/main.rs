//! lunchmap-server binary.
//!
//! Reads `lunchmap.toml` (or the path given with `--config`) and
//! `LUNCHMAP_*` environment variables, opens the configured store, and serves
//! the JSON API under `/api`.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//!
//! [store]
//! backend = "github"
//!
//! [store.github]
//! repo = "team/lunch"
//! path = "restaurants.csv"
//! # token: set LUNCHMAP_STORE__GITHUB__TOKEN instead
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Lunchmap API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, env = "LUNCHMAP_CONFIG", default_value = "lunchmap.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = lunchmap_server::load_config(cli.config)?;
  lunchmap_server::serve(config).await
}
