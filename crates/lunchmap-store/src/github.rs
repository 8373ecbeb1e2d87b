//! [`GithubStore`]: the restaurant table as a CSV file in a GitHub repository.

use std::time::Duration;

use lunchmap_core::{
  store::{Revision, Snapshot, TableStore},
  table::Table,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
  Error, Result,
  content::{ContentFile, PutContent, PutResponse, decode_content, encode_content},
};

const USER_AGENT: &str = concat!("lunchmap/", env!("CARGO_PKG_VERSION"));

fn default_api_base() -> String { "https://api.github.com".to_string() }

fn default_path() -> String { "restaurants.csv".to_string() }

/// Where the table lives and how to authenticate.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
  /// API root; override for GitHub Enterprise or tests.
  #[serde(default = "default_api_base")]
  pub api_base: String,
  /// `owner/name`.
  pub repo:     String,
  /// File path inside the repository.
  #[serde(default = "default_path")]
  pub path:     String,
  /// Branch to read and commit to; the repository default when unset.
  #[serde(default)]
  pub branch:   Option<String>,
  /// Personal access token. Requests are anonymous when empty.
  #[serde(default)]
  pub token:    String,
}

impl GithubConfig {
  pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
    Self {
      api_base: default_api_base(),
      repo:     repo.into(),
      path:     default_path(),
      branch:   None,
      token:    token.into(),
    }
  }
}

/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GithubStore {
  client: Client,
  config: GithubConfig,
}

impl GithubStore {
  pub fn new(config: GithubConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(USER_AGENT)
      .build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &GithubConfig { &self.config }

  fn url(&self) -> String {
    format!(
      "{}/repos/{}/contents/{}",
      self.config.api_base.trim_end_matches('/'),
      self.config.repo,
      self.config.path.trim_start_matches('/'),
    )
  }

  fn request(&self, method: Method) -> RequestBuilder {
    let req = self
      .client
      .request(method, self.url())
      .header(header::ACCEPT, "application/vnd.github+json");
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  /// `GET` the file. `Ok(None)` when it does not exist yet.
  async fn get_file(&self) -> Result<Option<ContentFile>> {
    let mut req = self.request(Method::GET);
    if let Some(branch) = &self.config.branch {
      req = req.query(&[("ref", branch)]);
    }
    let resp = req.send().await?;

    match resp.status() {
      StatusCode::NOT_FOUND => {
        debug!(url = %self.url(), "table file does not exist yet");
        Ok(None)
      }
      s if s.is_success() => Ok(Some(resp.json().await?)),
      s => Err(Error::Status {
        method: "GET",
        url:    self.url(),
        status: s.as_u16(),
        body:   resp.text().await.unwrap_or_default(),
      }),
    }
  }
}

impl TableStore for GithubStore {
  type Error = Error;

  async fn fetch(&self) -> Result<Snapshot> {
    let Some(file) = self.get_file().await? else {
      return Ok(Snapshot::default());
    };
    let text = decode_content(&file)?;
    let parsed = lunchmap_csv::parse(&text)?;
    Ok(Snapshot {
      table:    parsed.table,
      revision: Some(Revision::new(file.sha)),
      issues:   parsed.issues,
    })
  }

  async fn current_revision(&self) -> Result<Option<Revision>> {
    Ok(self.get_file().await?.map(|f| Revision::new(f.sha)))
  }

  async fn put<'a>(
    &'a self,
    table: &'a Table,
    message: &'a str,
    expected: Option<&'a Revision>,
  ) -> Result<Revision> {
    let csv = lunchmap_csv::serialize(table)?;
    let body = PutContent {
      message,
      content: encode_content(&csv),
      sha: expected.map(Revision::as_str),
      branch: self.config.branch.as_deref(),
    };

    let resp = self.request(Method::PUT).json(&body).send().await?;
    let status = resp.status();

    // 422 without a sha means the file appeared since we looked.
    let rejected = matches!(status, StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED)
      || (status == StatusCode::UNPROCESSABLE_ENTITY && expected.is_none());
    if rejected {
      let text = resp.text().await.unwrap_or_default();
      warn!(?expected, status = status.as_u16(), "remote rejected conditional write");
      return Err(Error::Rejected(text));
    }
    if !status.is_success() {
      return Err(Error::Status {
        method: "PUT",
        url:    self.url(),
        status: status.as_u16(),
        body:   resp.text().await.unwrap_or_default(),
      });
    }

    let committed: PutResponse = resp.json().await?;
    Ok(Revision::new(committed.content.sha))
  }
}
