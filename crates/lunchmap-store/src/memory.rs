//! [`MemoryStore`]: the CSV blob held in process.
//!
//! Revisions are the SHA-256 of the blob, so two writes of identical content
//! share a revision, as blob shas do in git.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use lunchmap_core::{
  store::{Revision, Snapshot, TableStore},
  table::Table,
};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// One accepted write.
#[derive(Debug, Clone)]
pub struct Commit {
  pub revision: Revision,
  pub message:  String,
  pub at:       DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
  blob:    Option<String>,
  history: Vec<Commit>,
}

/// Cloning is cheap — clones share the same blob.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

fn revision_of(blob: &str) -> Revision {
  Revision::new(hex::encode(Sha256::digest(blob.as_bytes())))
}

impl MemoryStore {
  /// An empty store: nothing written yet.
  pub fn new() -> Self { Self::default() }

  /// A store already holding `csv`.
  pub fn with_blob(csv: impl Into<String>) -> Self {
    let store = Self::new();
    store.replace_blob(csv, "Initial import");
    store
  }

  /// A store already holding `table`.
  pub fn with_table(table: &Table) -> Result<Self> {
    Ok(Self::with_blob(lunchmap_csv::serialize(table)?))
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Overwrite the blob unconditionally, as an outside editor would.
  pub fn replace_blob(&self, csv: impl Into<String>, message: &str) -> Revision {
    let csv = csv.into();
    let revision = revision_of(&csv);
    let mut inner = self.lock();
    inner.blob = Some(csv);
    inner.history.push(Commit {
      revision: revision.clone(),
      message:  message.to_string(),
      at:       Utc::now(),
    });
    revision
  }

  pub fn blob(&self) -> Option<String> { self.lock().blob.clone() }

  pub fn history(&self) -> Vec<Commit> { self.lock().history.clone() }
}

impl TableStore for MemoryStore {
  type Error = Error;

  async fn fetch(&self) -> Result<Snapshot> {
    let Some(blob) = self.blob() else {
      return Ok(Snapshot::default());
    };
    let parsed = lunchmap_csv::parse(&blob)?;
    Ok(Snapshot {
      table:    parsed.table,
      revision: Some(revision_of(&blob)),
      issues:   parsed.issues,
    })
  }

  async fn current_revision(&self) -> Result<Option<Revision>> {
    Ok(self.lock().blob.as_deref().map(revision_of))
  }

  async fn put<'a>(
    &'a self,
    table: &'a Table,
    message: &'a str,
    expected: Option<&'a Revision>,
  ) -> Result<Revision> {
    let csv = lunchmap_csv::serialize(table)?;
    let revision = revision_of(&csv);

    let mut inner = self.lock();
    let current = inner.blob.as_deref().map(revision_of);
    if current.as_ref() != expected {
      return Err(Error::Conflict {
        expected: expected.cloned(),
        found:    current,
      });
    }
    inner.blob = Some(csv);
    inner.history.push(Commit {
      revision: revision.clone(),
      message:  message.to_string(),
      at:       Utc::now(),
    });
    Ok(revision)
  }
}
