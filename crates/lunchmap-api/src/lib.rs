//! JSON REST API for Lunchmap.
//!
//! Exposes an axum [`Router`] backed by a [`Lunchmap`] service over any
//! [`TableStore`]. Every request is one interaction cycle: the table is read
//! fresh from the store and, for writes, saved back with a revision check.
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lunchmap_api::api_router(service.clone()))
//! ```

pub mod cuisines;
pub mod error;
pub mod pick;
pub mod restaurants;
pub mod view;

mod etag;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use lunchmap_core::{service::Lunchmap, store::TableStore};

pub use error::ApiError;
pub use view::RestaurantView;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<Lunchmap<S>>) -> Router<()>
where
  S: TableStore + 'static,
{
  Router::new()
    .route(
      "/restaurants",
      get(restaurants::list::<S>).post(restaurants::create::<S>),
    )
    .route("/restaurants/{id}", get(restaurants::get_one::<S>))
    .route("/restaurants/{id}/ratings", post(restaurants::rate::<S>))
    .route("/cuisines", get(cuisines::handler::<S>))
    .route("/pick", get(pick::handler::<S>))
    .with_state(service)
}

#[cfg(test)]
mod tests;
