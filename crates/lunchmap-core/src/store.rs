//! The `TableStore` trait and the snapshot it hands out.
//!
//! The trait is implemented by storage backends (see `lunchmap-store`).
//! Higher layers depend on this abstraction, not on a concrete backend.
//!
//! Writes are whole-table and conditional: a backend must refuse a
//! [`TableStore::put`] whose `expected` revision no longer matches what it
//! holds.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::table::Table;

// ─── Revision ────────────────────────────────────────────────────────────────

/// Opaque token identifying one version of the stored table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
  pub fn new(token: impl Into<String>) -> Self { Self(token.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Revision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// A recoverable problem found while reading the stored table. The affected
/// cell was replaced by an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadIssue {
  /// 1-based data row (the header is row 0).
  pub row:     usize,
  pub column:  String,
  pub message: String,
}

impl fmt::Display for LoadIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "row {}, column {}: {}", self.row, self.column, self.message)
  }
}

/// The table as read from the store, with the revision it was read at.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
  pub table:    Table,
  /// `None` when nothing has been stored yet.
  pub revision: Option<Revision>,
  pub issues:   Vec<LoadIssue>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the place the restaurant table lives.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers.
pub trait TableStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Read and decode the whole table.
  fn fetch(&self) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;

  /// Read only the current revision token.
  fn current_revision(
    &self,
  ) -> impl Future<Output = Result<Option<Revision>, Self::Error>> + Send + '_;

  /// Replace the stored table with `table` if the stored revision is still
  /// `expected`. Returns the new revision.
  fn put<'a>(
    &'a self,
    table: &'a Table,
    message: &'a str,
    expected: Option<&'a Revision>,
  ) -> impl Future<Output = Result<Revision, Self::Error>> + Send + 'a;
}
