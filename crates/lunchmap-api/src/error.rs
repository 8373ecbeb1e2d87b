//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The table changed under a write that was not pinned with `If-Match`.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The `If-Match` revision is no longer current.
  #[error("precondition failed: {0}")]
  PreconditionFailed(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a service error. `pinned` tells whether the request carried
  /// `If-Match`, which turns a conflict into `412`.
  pub fn from_service(e: lunchmap_core::Error, pinned: bool) -> Self {
    use lunchmap_core::Error as E;

    if e.is_validation() {
      return Self::BadRequest(e.to_string());
    }
    if e.is_conflict() {
      return if pinned {
        Self::PreconditionFailed(e.to_string())
      } else {
        Self::Conflict(e.to_string())
      };
    }
    match e {
      E::RestaurantNotFound(id) => Self::NotFound(format!("restaurant {id} not found")),
      E::DuplicateId(id) => Self::Conflict(format!("restaurant id already taken: {id}")),
      other => Self::Store(Box::new(other)),
    }
  }
}

impl From<lunchmap_core::Error> for ApiError {
  fn from(e: lunchmap_core::Error) -> Self { Self::from_service(e, false) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::PreconditionFailed(m) => (StatusCode::PRECONDITION_FAILED, m.clone()),
      ApiError::Store(e) => {
        warn!(error = %e, "store failure");
        (StatusCode::BAD_GATEWAY, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use lunchmap_core::{Error, store::Revision};

  use super::*;

  fn conflict() -> Error {
    Error::RevisionConflict {
      expected: Some(Revision::new("a")),
      found:    Some(Revision::new("b")),
    }
  }

  #[test]
  fn conflicts_depend_on_if_match() {
    assert!(matches!(ApiError::from_service(conflict(), false), ApiError::Conflict(_)));
    assert!(matches!(
      ApiError::from_service(conflict(), true),
      ApiError::PreconditionFailed(_)
    ));
    assert!(matches!(
      ApiError::from_service(Error::WriteRejected("409".into()), true),
      ApiError::PreconditionFailed(_)
    ));
  }

  #[test]
  fn validation_is_bad_request_even_when_pinned() {
    assert!(matches!(ApiError::from_service(Error::EmptyUser, true), ApiError::BadRequest(_)));
  }

  #[test]
  fn store_failures_are_bad_gateway() {
    let resp = ApiError::from(Error::Store("timeout".into())).into_response();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  }
}
