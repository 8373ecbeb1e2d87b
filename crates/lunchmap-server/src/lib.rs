//! HTTP server for Lunchmap.
//!
//! Wires a configured [`TableStore`] backend into the JSON API, mounted under
//! `/api`, with request tracing.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use config::{ConfigBuilder, Environment, builder::DefaultState};
use lunchmap_core::{service::Lunchmap, store::TableStore};
use lunchmap_store::{GithubConfig, GithubStore, MemoryStore};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`TableStore`] backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// The CSV file in a GitHub repository.
  Github,
  /// An in-process blob, lost on restart.
  #[default]
  Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
  #[serde(default)]
  pub backend:   Backend,
  /// Required when `backend = "github"`.
  #[serde(default)]
  pub github:    Option<GithubConfig>,
  /// CSV file preloaded into the memory backend.
  #[serde(default)]
  pub seed_file: Option<PathBuf>,
}

/// Runtime server configuration, deserialised from `lunchmap.toml` and
/// `LUNCHMAP_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:  String,
  pub port:  u16,
  #[serde(default)]
  pub store: StoreSettings,
}

/// Defaults every source is layered over.
pub fn config_builder() -> anyhow::Result<ConfigBuilder<DefaultState>> {
  Ok(
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store.backend", "memory")?,
  )
}

/// `LUNCHMAP_PORT=9000`, `LUNCHMAP_STORE__GITHUB__TOKEN=...`.
pub fn environment() -> Environment {
  Environment::with_prefix("LUNCHMAP")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

/// Read `path` (optional) under the environment.
pub fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  config_builder()?
    .add_source(config::File::from(path).required(false))
    .add_source(environment())
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API under `/api`, traced.
pub fn app<S>(service: Arc<Lunchmap<S>>) -> Router
where
  S: TableStore + 'static,
{
  Router::new()
    .nest("/api", lunchmap_api::api_router(service))
    .layer(TraceLayer::new_for_http())
}

// ─── Serving ──────────────────────────────────────────────────────────────────

/// Bind `config.host:config.port` and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
  let address = format!("{}:{}", config.host, config.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  match config.store.backend {
    Backend::Github => {
      let github = config
        .store
        .github
        .clone()
        .context("store.backend is \"github\" but [store.github] is missing")?;
      info!(repo = %github.repo, path = %github.path, "using GitHub store");
      let store = GithubStore::new(github).context("failed to build GitHub client")?;
      serve_with(listener, store).await
    }
    Backend::Memory => {
      let store = memory_store(&config.store).await?;
      info!("using in-memory store");
      serve_with(listener, store).await
    }
  }
}

async fn memory_store(settings: &StoreSettings) -> anyhow::Result<MemoryStore> {
  let Some(path) = &settings.seed_file else {
    return Ok(MemoryStore::new());
  };
  let csv = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read seed file {path:?}"))?;
  Ok(MemoryStore::with_blob(csv))
}

async fn serve_with<S>(listener: TcpListener, store: S) -> anyhow::Result<()>
where
  S: TableStore + 'static,
{
  let app = app(Arc::new(Lunchmap::new(store)));
  if let Ok(addr) = listener.local_addr() {
    info!("Listening on http://{addr}");
  }
  axum::serve(listener, app).await.context("server error")
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use config::{File, FileFormat};
  use tower::ServiceExt as _;

  use super::*;

  fn parse(toml: &str, env: &[(&str, &str)]) -> ServerConfig {
    let env: HashMap<String, String> = env
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    config_builder()
      .unwrap()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .add_source(environment().source(Some(env)))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_to_local_memory_store() {
    let cfg = parse("", &[]);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store.backend, Backend::Memory);
    assert!(cfg.store.github.is_none());
  }

  #[test]
  fn github_section_with_env_token() {
    let cfg = parse(
      r#"
        port = 3000

        [store]
        backend = "github"

        [store.github]
        repo   = "team/lunch"
        branch = "data"
      "#,
      &[("LUNCHMAP_STORE__GITHUB__TOKEN", "s3cret"), ("LUNCHMAP_PORT", "9000")],
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.store.backend, Backend::Github);
    let gh = cfg.store.github.unwrap();
    assert_eq!(gh.repo, "team/lunch");
    assert_eq!(gh.branch.as_deref(), Some("data"));
    assert_eq!(gh.path, "restaurants.csv");
    assert_eq!(gh.api_base, "https://api.github.com");
    assert_eq!(gh.token, "s3cret");
  }

  #[tokio::test]
  async fn api_is_mounted_under_api() {
    let store = MemoryStore::with_blob("id,nom,lat,lon,type\nr1,Zen,48.8,2.3,Japonais\n");
    let app = app(Arc::new(Lunchmap::new(store)));

    let req = Request::builder()
      .uri("/api/restaurants/r1")
      .body(Body::empty())
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["emoji"], "🍣");

    let req = Request::builder()
      .uri("/restaurants")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
