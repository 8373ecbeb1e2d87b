//! Store settings: CLI flags override the config file, which overrides
//! defaults.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use lunchmap_store::GithubConfig;
use serde::Deserialize;

/// Where the table lives. Every flag falls back to the config file.
#[derive(Args, Debug, Default)]
pub struct StoreArgs {
  /// GitHub repository holding the table, as `owner/name`.
  #[arg(long, global = true, env = "LUNCHMAP_REPO")]
  pub repo: Option<String>,

  /// Path of the CSV file inside the repository (default: restaurants.csv).
  #[arg(long, global = true, env = "LUNCHMAP_PATH")]
  pub path: Option<String>,

  /// Branch to read and commit to (default: the repository default).
  #[arg(long, global = true, env = "LUNCHMAP_BRANCH")]
  pub branch: Option<String>,

  /// GitHub token with contents read/write access.
  #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// API root, for GitHub Enterprise.
  #[arg(long, global = true, env = "LUNCHMAP_API_BASE")]
  pub api_base: Option<String>,
}

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
pub struct ConfigFile {
  #[serde(default)]
  pub repo:     String,
  #[serde(default)]
  pub path:     String,
  #[serde(default)]
  pub branch:   String,
  #[serde(default)]
  pub token:    String,
  #[serde(default)]
  pub api_base: String,
  /// Name recorded on ratings when `--user` is not given.
  #[serde(default)]
  pub user:     String,
}

impl ConfigFile {
  pub fn read(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// `flag`, else the file value when set.
pub fn layered(flag: Option<String>, file: &str) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then(|| file.to_string()))
}

pub fn github_config(args: StoreArgs, file: &ConfigFile) -> Result<GithubConfig> {
  let Some(repo) = layered(args.repo, &file.repo) else {
    bail!("no repository configured: pass --repo, set LUNCHMAP_REPO, or add `repo` to the config file");
  };
  let mut config = GithubConfig::new(repo, layered(args.token, &file.token).unwrap_or_default());
  if let Some(path) = layered(args.path, &file.path) {
    config.path = path;
  }
  if let Some(api_base) = layered(args.api_base, &file.api_base) {
    config.api_base = api_base;
  }
  config.branch = layered(args.branch, &file.branch);
  Ok(config)
}
