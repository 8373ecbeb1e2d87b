//! Error types for `lunchmap-core`.

use thiserror::Error;

use crate::store::Revision;

#[derive(Debug, Error)]
pub enum Error {
  #[error("restaurant name must not be empty")]
  EmptyName,

  #[error("user name must not be empty")]
  EmptyUser,

  #[error("no restaurant selected")]
  NoRestaurantSelected,

  #[error("score {0} must be between 1 and 5 in steps of 0.5")]
  InvalidScore(f64),

  #[error("invalid coordinates: {lat}, {lon}")]
  InvalidCoordinates { lat: f64, lon: f64 },

  #[error("restaurant not found: {0}")]
  RestaurantNotFound(String),

  #[error("restaurant id already taken: {0}")]
  DuplicateId(String),

  /// The stored table changed between the read that fed this cycle and the
  /// write-back.
  #[error(
    "revision conflict: expected {}, found {}",
    show_revision(.expected),
    show_revision(.found)
  )]
  RevisionConflict {
    expected: Option<Revision>,
    found:    Option<Revision>,
  },

  /// The store refused a conditional write because its revision moved on.
  #[error("the restaurant table was changed by someone else: {0}")]
  WriteRejected(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Whether the error reports a concurrent modification.
  pub fn is_conflict(&self) -> bool {
    matches!(self, Self::RevisionConflict { .. } | Self::WriteRejected(_))
  }

  /// Whether the error was raised by input validation, before any load or
  /// mutation took place.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::EmptyName
        | Self::EmptyUser
        | Self::NoRestaurantSelected
        | Self::InvalidScore(_)
        | Self::InvalidCoordinates { .. }
    )
  }
}

fn show_revision(revision: &Option<Revision>) -> String {
  match revision {
    Some(r) => r.to_string(),
    None => "<none>".to_string(),
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
