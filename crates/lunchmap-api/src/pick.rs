//! Handler for `GET /pick`: a random rated restaurant.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use lunchmap_core::{service::Lunchmap, store::TableStore};
use rand::{SeedableRng, rngs::StdRng};

use crate::{error::ApiError, restaurants::CuisineFilter, view::RestaurantView};

/// `GET /pick[?cuisine=<tag>]`: 404 when no matching restaurant is rated.
pub async fn handler<S>(
  State(svc): State<Arc<Lunchmap<S>>>,
  Query(params): Query<CuisineFilter>,
) -> Result<Json<RestaurantView>, ApiError>
where
  S: TableStore,
{
  let mut rng = StdRng::from_entropy();
  let pick = svc
    .pick(params.cuisine.as_deref(), &mut rng)
    .await
    .ok_or_else(|| ApiError::NotFound("no rated restaurant matches".into()))?;
  Ok(Json(RestaurantView::from(&pick.restaurant)))
}
