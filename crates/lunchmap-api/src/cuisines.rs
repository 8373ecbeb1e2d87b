//! Handler for `GET /cuisines`.

use std::sync::Arc;

use axum::{Json, extract::State};
use lunchmap_core::{service::Lunchmap, store::TableStore};

/// `GET /cuisines`: sorted distinct non-empty tags, for filter menus.
pub async fn handler<S>(State(svc): State<Arc<Lunchmap<S>>>) -> Json<Vec<String>>
where
  S: TableStore,
{
  Json(svc.cuisines().await)
}
