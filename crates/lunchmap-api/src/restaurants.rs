//! Handlers for `/restaurants` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/restaurants` | Optional `?cuisine=<tag>` (exact match) |
//! | `POST` | `/restaurants` | Body: [`NewRestaurantBody`]; optional `If-Match` |
//! | `GET`  | `/restaurants/{id}` | 404 if not found |
//! | `POST` | `/restaurants/{id}/ratings` | Body: [`RatingSubmission`]; optional `If-Match` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use lunchmap_core::{
  restaurant::{NewRestaurant, RatingSubmission},
  service::{Lunchmap, Saved},
  store::{Revision, TableStore},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  error::ApiError,
  etag::{if_match, with_etag},
  view::RestaurantView,
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct CuisineFilter {
  pub cuisine: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub revision:    Option<Revision>,
  /// Set when the table could not be read and an empty one is served.
  pub warning:     Option<String>,
  pub restaurants: Vec<RestaurantView>,
}

/// `GET /restaurants[?cuisine=<tag>]`
pub async fn list<S>(
  State(svc): State<Arc<Lunchmap<S>>>,
  Query(params): Query<CuisineFilter>,
) -> Response
where
  S: TableStore,
{
  let listing = svc.list(params.cuisine.as_deref()).await;
  let body = ListResponse {
    revision:    listing.revision.clone(),
    warning:     listing.warning,
    restaurants: listing.restaurants.iter().map(RestaurantView::from).collect(),
  };
  with_etag(Json(body).into_response(), listing.revision.as_ref())
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /restaurants/{id}`
pub async fn get_one<S>(
  State(svc): State<Arc<Lunchmap<S>>>,
  Path(id): Path<String>,
) -> Result<Response, ApiError>
where
  S: TableStore,
{
  let snapshot = svc.load().await.snapshot;
  let restaurant = snapshot
    .table
    .get(&id)
    .ok_or_else(|| ApiError::NotFound(format!("restaurant {id} not found")))?;
  let view = RestaurantView::from(restaurant);
  Ok(with_etag(Json(view).into_response(), snapshot.revision.as_ref()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// The add form. `user`, `score` and `comment` seed a first rating; they are
/// ignored when `user` is blank.
#[derive(Debug, Deserialize)]
pub struct NewRestaurantBody {
  pub name:    String,
  pub lat:     f64,
  pub lon:     f64,
  #[serde(default)]
  pub cuisine: String,
  #[serde(default)]
  pub user:    Option<String>,
  #[serde(default)]
  pub score:   Option<f64>,
  #[serde(default)]
  pub comment: Option<String>,
}

impl NewRestaurantBody {
  fn into_input(self) -> Result<NewRestaurant, ApiError> {
    let seed = match self.user.filter(|u| !u.trim().is_empty()) {
      None => None,
      Some(user) => {
        let score = self
          .score
          .ok_or_else(|| ApiError::BadRequest("a score is required with a user".into()))?;
        Some(RatingSubmission {
          user,
          score,
          comment: self.comment,
        })
      }
    };
    Ok(NewRestaurant {
      name: self.name,
      lat: self.lat,
      lon: self.lon,
      cuisine: self.cuisine,
      seed,
    })
  }
}

fn saved_response(status: StatusCode, saved: &Saved) -> Response {
  let view = RestaurantView::from(&saved.restaurant);
  with_etag((status, Json(view)).into_response(), Some(&saved.revision))
}

/// `POST /restaurants`
pub async fn create<S>(
  State(svc): State<Arc<Lunchmap<S>>>,
  headers: HeaderMap,
  Json(body): Json<NewRestaurantBody>,
) -> Result<Response, ApiError>
where
  S: TableStore,
{
  let pinned = if_match(&headers);
  let is_pinned = pinned.is_some();
  let input = body.into_input()?;
  let saved = svc
    .add_restaurant_at(input, pinned)
    .await
    .map_err(|e| ApiError::from_service(e, is_pinned))?;
  info!(id = %saved.restaurant.id, name = %saved.restaurant.name, "restaurant added");
  Ok(saved_response(StatusCode::CREATED, &saved))
}

// ─── Rate ─────────────────────────────────────────────────────────────────────

/// `POST /restaurants/{id}/ratings`: body `{"user":"ana","score":4.5,"comment":"..."}`
pub async fn rate<S>(
  State(svc): State<Arc<Lunchmap<S>>>,
  Path(id): Path<String>,
  headers: HeaderMap,
  Json(body): Json<RatingSubmission>,
) -> Result<Response, ApiError>
where
  S: TableStore,
{
  let pinned = if_match(&headers);
  let is_pinned = pinned.is_some();
  let saved = svc
    .rate_at(&id, body, pinned)
    .await
    .map_err(|e| ApiError::from_service(e, is_pinned))?;
  info!(id = %saved.restaurant.id, "rating recorded");
  Ok(saved_response(StatusCode::OK, &saved))
}
