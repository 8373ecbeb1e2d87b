//! JSON shape of a restaurant as served by the API.
//!
//! Everything a map marker or popup needs is precomputed here so clients
//! never reimplement aggregation.

use lunchmap_core::{
  aggregate::{Aggregate, Tier},
  restaurant::{Restaurant, UserEntry},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingView {
  /// `"4"` or `"4.5"`; `null` when unrated.
  pub display: Option<String>,
  pub value:   Option<f64>,
  pub count:   usize,
  /// Five glyphs, e.g. `"★★★★⯪"`; `null` when unrated.
  pub stars:   Option<String>,
}

impl From<Aggregate> for RatingView {
  fn from(a: Aggregate) -> Self {
    Self {
      display: a.display(),
      value:   a.value(),
      count:   a.count(),
      stars:   a.stars().map(|s| s.to_string()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
  pub user:    String,
  pub score:   Option<f64>,
  pub comment: Option<String>,
}

impl From<UserEntry<'_>> for EntryView {
  fn from(e: UserEntry<'_>) -> Self {
    Self {
      user:    e.user.to_string(),
      score:   e.score,
      comment: e.comment.map(str::to_string),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantView {
  pub id:      String,
  pub name:    String,
  pub lat:     Option<f64>,
  pub lon:     Option<f64>,
  pub cuisine: String,
  pub emoji:   &'static str,
  pub label:   String,
  pub rating:  RatingView,
  pub tier:    Tier,
  pub color:   &'static str,
  pub entries: Vec<EntryView>,
}

impl From<&Restaurant> for RestaurantView {
  fn from(r: &Restaurant) -> Self {
    let aggregate = r.aggregate();
    let tier = aggregate.tier();
    Self {
      id: r.id.clone(),
      name: r.name.clone(),
      lat: r.location.map(|p| p.lat),
      lon: r.location.map(|p| p.lon),
      cuisine: r.cuisine.clone(),
      emoji: r.emoji(),
      label: r.label(),
      rating: aggregate.into(),
      tier,
      color: tier.color(),
      entries: r.entries().into_iter().map(EntryView::from).collect(),
    }
  }
}
