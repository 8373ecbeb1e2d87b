//! Error type for `lunchmap-store`.

use lunchmap_core::store::Revision;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{method} {url} returned {status}: {body}")]
  Status {
    method: &'static str,
    url:    String,
    status: u16,
    body:   String,
  },

  /// The stored revision is not the one the write was based on.
  #[error("revision conflict: expected {expected:?}, found {found:?}")]
  Conflict {
    expected: Option<Revision>,
    found:    Option<Revision>,
  },

  /// The remote refused the conditional write (HTTP 409 or 412).
  #[error("write rejected by remote: {0}")]
  Rejected(String),

  /// The file came back in a form other than inline base64; GitHub does this
  /// for files over 1 MB.
  #[error("unsupported content encoding: {0:?}")]
  Encoding(String),

  #[error("base64 decode error: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("stored table is not valid UTF-8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("csv error: {0}")]
  Csv(#[from] lunchmap_csv::Error),
}

impl From<Error> for lunchmap_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Conflict { expected, found } => {
        lunchmap_core::Error::RevisionConflict { expected, found }
      }
      Error::Rejected(body) => lunchmap_core::Error::WriteRejected(body),
      other => lunchmap_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
