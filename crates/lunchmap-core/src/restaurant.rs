//! Restaurant records and their per-user ratings and comments.
//!
//! Ratings and comments are plain maps keyed by user name. The JSON-in-a-cell
//! encoding used by the stored CSV lives in `lunchmap-csv`; nothing here
//! knows about it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, aggregate::Aggregate, cuisine};

/// Names longer than this are shortened on map markers.
pub const LABEL_MAX_CHARS: usize = 15;

// ─── Location ────────────────────────────────────────────────────────────────

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub lat: f64,
  pub lon: f64,
}

impl GeoPoint {
  pub fn new(lat: f64, lon: f64) -> Result<Self> {
    let valid = lat.is_finite()
      && lon.is_finite()
      && (-90.0..=90.0).contains(&lat)
      && (-180.0..=180.0).contains(&lon);
    if valid {
      Ok(Self { lat, lon })
    } else {
      Err(Error::InvalidCoordinates { lat, lon })
    }
  }
}

// ─── Score ───────────────────────────────────────────────────────────────────

/// A validated rating: between 1 and 5 inclusive, in half-point steps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
  pub const MIN: f64 = 1.0;
  pub const MAX: f64 = 5.0;

  pub fn new(value: f64) -> Result<Self> {
    let in_range = (Self::MIN..=Self::MAX).contains(&value);
    let half_step = (value * 2.0).fract() == 0.0;
    if value.is_finite() && in_range && half_step {
      Ok(Self(value))
    } else {
      Err(Error::InvalidScore(value))
    }
  }

  pub fn value(self) -> f64 { self.0 }
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

/// Scores keyed by user name.
///
/// Values read back from storage are kept as-is, even outside `[1, 5]`;
/// only [`Ratings::upsert`] enforces [`Score`] rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratings(BTreeMap<String, f64>);

impl Ratings {
  pub fn new() -> Self { Self::default() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn get(&self, user: &str) -> Option<f64> { self.0.get(user).copied() }

  /// Insert or replace `user`'s score.
  pub fn upsert(&mut self, user: impl Into<String>, score: Score) {
    self.0.insert(user.into(), score.value());
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
    self.0.iter().map(|(u, v)| (u.as_str(), *v))
  }

  pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
    self.0.values().copied()
  }

  pub fn aggregate(&self) -> Aggregate { Aggregate::of(self) }
}

impl FromIterator<(String, f64)> for Ratings {
  fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// Free-text comments keyed by user name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments(BTreeMap<String, String>);

impl Comments {
  pub fn new() -> Self { Self::default() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn get(&self, user: &str) -> Option<&str> {
    self.0.get(user).map(String::as_str)
  }

  /// Store `text` for `user` unless it is blank. Returns whether anything
  /// was written.
  pub fn upsert(&mut self, user: impl Into<String>, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
      return false;
    }
    self.0.insert(user.into(), text.to_string());
    true
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(u, c)| (u.as_str(), c.as_str()))
  }
}

impl FromIterator<(String, String)> for Comments {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

// ─── Submissions ─────────────────────────────────────────────────────────────

/// A user's rating and optional comment, as typed into a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingSubmission {
  pub user:    String,
  pub score:   f64,
  #[serde(default)]
  pub comment: Option<String>,
}

/// A [`RatingSubmission`] that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRating {
  pub user:    String,
  pub score:   Score,
  pub comment: Option<String>,
}

impl RatingSubmission {
  pub fn validate(&self) -> Result<ValidRating> {
    let user = self.user.trim();
    if user.is_empty() {
      return Err(Error::EmptyUser);
    }
    let score = Score::new(self.score)?;
    let comment = self
      .comment
      .as_deref()
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .map(str::to_string);
    Ok(ValidRating {
      user: user.to_string(),
      score,
      comment,
    })
  }
}

/// Input to [`crate::service::Lunchmap::add_restaurant`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRestaurant {
  pub name:    String,
  pub lat:     f64,
  pub lon:     f64,
  #[serde(default)]
  pub cuisine: String,
  /// Optional first rating from the person adding the restaurant. Ignored
  /// when its user name is blank.
  #[serde(default)]
  pub seed:    Option<RatingSubmission>,
}

// ─── Restaurant ──────────────────────────────────────────────────────────────

/// One row of the restaurant table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
  /// Unique and immutable once assigned.
  pub id:           String,
  pub name:         String,
  /// `None` when the stored coordinates are missing or unreadable.
  pub location:     Option<GeoPoint>,
  /// The stored coordinate text when it could not be read, written back
  /// verbatim on save.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub raw_location: Option<RawLocation>,
  /// Free-text cuisine tag; may be empty.
  pub cuisine:      String,
  pub ratings:      Ratings,
  pub comments:     Comments,
}

/// Unparsed `lat`/`lon` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocation {
  pub lat: String,
  pub lon: String,
}

/// One line of a restaurant's per-user listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserEntry<'a> {
  pub user:    &'a str,
  /// `None` for a user who only left a comment.
  pub score:   Option<f64>,
  pub comment: Option<&'a str>,
}

impl Restaurant {
  /// A record with no ratings or comments yet.
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    location: Option<GeoPoint>,
    cuisine: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      location,
      raw_location: None,
      cuisine: cuisine.into(),
      ratings: Ratings::new(),
      comments: Comments::new(),
    }
  }

  /// Upsert a validated rating and, when present, its comment.
  pub fn apply(&mut self, rating: &ValidRating) {
    self.ratings.upsert(rating.user.clone(), rating.score);
    if let Some(comment) = &rating.comment {
      self.comments.upsert(rating.user.clone(), comment);
    }
  }

  pub fn aggregate(&self) -> Aggregate { self.ratings.aggregate() }

  pub fn emoji(&self) -> &'static str { cuisine::emoji_for(&self.cuisine) }

  /// Marker label: the name, shortened with `…` past
  /// [`LABEL_MAX_CHARS`] characters.
  pub fn label(&self) -> String {
    if self.name.chars().count() <= LABEL_MAX_CHARS {
      return self.name.clone();
    }
    let mut label: String = self.name.chars().take(LABEL_MAX_CHARS).collect();
    label.push('…');
    label
  }

  /// Every user who rated or commented, sorted case-insensitively.
  pub fn entries(&self) -> Vec<UserEntry<'_>> {
    let users: BTreeSet<&str> = self
      .ratings
      .iter()
      .map(|(u, _)| u)
      .chain(self.comments.iter().map(|(u, _)| u))
      .collect();

    let mut entries: Vec<UserEntry<'_>> = users
      .into_iter()
      .map(|user| UserEntry {
        user,
        score: self.ratings.get(user),
        comment: self.comments.get(user),
      })
      .collect();
    entries.sort_by_cached_key(|e| (e.user.to_lowercase(), e.user.to_string()));
    entries
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn score_accepts_half_points_in_range() {
    assert_eq!(Score::new(1.0).unwrap().value(), 1.0);
    assert_eq!(Score::new(3.5).unwrap().value(), 3.5);
    assert_eq!(Score::new(5.0).unwrap().value(), 5.0);
  }

  #[test]
  fn score_rejects_out_of_range_and_odd_steps() {
    assert!(matches!(Score::new(0.5), Err(Error::InvalidScore(_))));
    assert!(matches!(Score::new(5.5), Err(Error::InvalidScore(_))));
    assert!(matches!(Score::new(3.2), Err(Error::InvalidScore(_))));
    assert!(matches!(Score::new(f64::NAN), Err(Error::InvalidScore(_))));
  }

  #[test]
  fn submission_trims_user_and_drops_blank_comment() {
    let valid = RatingSubmission {
      user:    "  Léa ".into(),
      score:   4.5,
      comment: Some("   ".into()),
    }
    .validate()
    .unwrap();
    assert_eq!(valid.user, "Léa");
    assert_eq!(valid.comment, None);
  }

  #[test]
  fn submission_requires_user() {
    let err = RatingSubmission {
      user:    " ".into(),
      score:   4.0,
      comment: None,
    }
    .validate()
    .unwrap_err();
    assert!(matches!(err, Error::EmptyUser));
  }

  #[test]
  fn apply_keeps_previous_comment_when_new_one_is_blank() {
    let mut r = Restaurant::new("r1", "Chez Paul", None, "Bistrot");
    r.apply(&ValidRating {
      user:    "ana".into(),
      score:   Score::new(4.0).unwrap(),
      comment: Some("great steak".into()),
    });
    r.apply(&ValidRating {
      user:    "ana".into(),
      score:   Score::new(3.0).unwrap(),
      comment: None,
    });
    assert_eq!(r.ratings.get("ana"), Some(3.0));
    assert_eq!(r.comments.get("ana"), Some("great steak"));
  }

  #[test]
  fn label_truncates_long_names() {
    let short = Restaurant::new("a", "Sushi Shop", None, "");
    assert_eq!(short.label(), "Sushi Shop");

    let long = Restaurant::new("b", "La Très Grande Brasserie", None, "");
    assert_eq!(long.label(), "La Très Grande …");
  }

  #[test]
  fn entries_include_comment_only_users_sorted_case_insensitively() {
    let mut r = Restaurant::new("r1", "Pho 14", None, "Vietnamien");
    r.ratings = [("bob".to_string(), 4.0), ("Alice".to_string(), 5.0)]
      .into_iter()
      .collect();
    r.comments = [("carl".to_string(), "edited by hand".to_string())]
      .into_iter()
      .collect();

    let entries = r.entries();
    let users: Vec<&str> = entries.iter().map(|e| e.user).collect();
    assert_eq!(users, ["Alice", "bob", "carl"]);
    assert_eq!(entries[2].score, None);
    assert_eq!(entries[2].comment, Some("edited by hand"));
  }

  #[test]
  fn geo_point_rejects_non_finite() {
    assert!(GeoPoint::new(48.87, 2.33).is_ok());
    assert!(GeoPoint::new(f64::NAN, 2.33).is_err());
    assert!(GeoPoint::new(120.0, 2.33).is_err());
  }
}
