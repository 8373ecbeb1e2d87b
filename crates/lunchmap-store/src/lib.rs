//! Storage backends for the restaurant table.
//!
//! - [`GithubStore`] keeps the table as a CSV file in a GitHub repository,
//!   read and written through the contents API.
//! - [`MemoryStore`] keeps the same CSV blob in process, with content-hash
//!   revisions. Useful for local development and tests.
//!
//! Both implement [`lunchmap_core::store::TableStore`] with conditional
//! writes.

mod content;
mod github;
mod memory;

pub mod error;

pub use error::{Error, Result};
pub use github::{GithubConfig, GithubStore};
pub use memory::{Commit, MemoryStore};
