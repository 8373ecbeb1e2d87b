//! Core types and trait definitions for the lunch map.
//!
//! This crate is deliberately free of HTTP and file-format dependencies. The
//! CSV codec, the remote store and the API all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod cuisine;
pub mod error;
pub mod restaurant;
pub mod service;
pub mod store;
pub mod table;

pub use error::{Error, Result};
