//! Interaction flows over a [`TableStore`].
//!
//! Every call is one interaction cycle: read the table fresh, optionally
//! mutate it in memory, write the whole table back. Nothing is cached
//! between calls.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  aggregate::Aggregate,
  restaurant::{GeoPoint, NewRestaurant, RatingSubmission, Restaurant},
  store::{Revision, Snapshot, TableStore},
};

/// The outcome of [`Lunchmap::load`]. Never an error: a failed read yields an
/// empty table and a warning for the user.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
  pub snapshot: Snapshot,
  pub warning:  Option<String>,
}

/// The outcome of [`Lunchmap::list`].
#[derive(Debug, Clone, Default)]
pub struct Listing {
  pub restaurants: Vec<Restaurant>,
  /// Revision the records were read at; `None` when nothing is stored yet.
  pub revision:    Option<Revision>,
  pub warning:     Option<String>,
}

/// A record as written by a successful mutation, with the new revision.
#[derive(Debug, Clone)]
pub struct Saved {
  pub restaurant: Restaurant,
  pub revision:   Revision,
}

/// A randomly chosen rated restaurant.
#[derive(Debug, Clone)]
pub struct Pick {
  pub restaurant: Restaurant,
  pub aggregate:  Aggregate,
}

pub struct Lunchmap<S> {
  store: S,
}

impl<S: TableStore> Lunchmap<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ── Load / save ───────────────────────────────────────────────────────────

  /// Fetch the current table, reporting any failure.
  ///
  /// Mutation flows read through this: a table that could not be read must
  /// never be mistaken for an empty one.
  pub async fn fetch(&self) -> Result<Snapshot> {
    let snapshot = self.store.fetch().await.map_err(Into::into)?;
    for issue in &snapshot.issues {
      warn!(%issue, "recovered from malformed cell");
    }
    debug!(
      records = snapshot.table.len(),
      revision = ?snapshot.revision,
      "loaded restaurant table"
    );
    Ok(snapshot)
  }

  /// Fetch the current table, degrading to an empty one on any failure.
  pub async fn load(&self) -> Loaded {
    match self.fetch().await {
      Ok(snapshot) => Loaded {
        snapshot,
        warning: None,
      },
      Err(e) => {
        warn!(error = %e, "could not load restaurant table, using an empty one");
        Loaded {
          snapshot: Snapshot::default(),
          warning:  Some(format!(
            "could not load the restaurant table ({e}); starting from an empty table"
          )),
        }
      }
    }
  }

  /// Write `table` back if the stored revision is still `expected`.
  ///
  /// Reads the current token first and refuses to write when it differs;
  /// the backend repeats the check on write. There is no retry.
  pub async fn save(
    &self,
    table: &crate::table::Table,
    expected: Option<&Revision>,
    message: &str,
  ) -> Result<Revision> {
    let current = self.store.current_revision().await.map_err(Into::into)?;
    if current.as_ref() != expected {
      warn!(?expected, found = ?current, "table changed since it was read");
      return Err(Error::RevisionConflict {
        expected: expected.cloned(),
        found:    current,
      });
    }

    let revision = self
      .store
      .put(table, message, current.as_ref())
      .await
      .map_err(Into::into)?;
    info!(%revision, message, records = table.len(), "saved restaurant table");
    Ok(revision)
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// Records matching `cuisine` (all when `None` or empty), in table order.
  pub async fn list(&self, cuisine: Option<&str>) -> Listing {
    let Loaded { snapshot, warning } = self.load().await;
    let restaurants = snapshot
      .table
      .filter_cuisine(cuisine)
      .into_iter()
      .cloned()
      .collect();
    Listing {
      restaurants,
      revision: snapshot.revision,
      warning,
    }
  }

  /// Sorted distinct non-empty cuisine tags.
  pub async fn cuisines(&self) -> Vec<String> {
    let loaded = self.load().await;
    loaded
      .snapshot
      .table
      .cuisines()
      .into_iter()
      .map(str::to_string)
      .collect()
  }

  // ── Flows ─────────────────────────────────────────────────────────────────

  /// Add a restaurant at the end of the table.
  pub async fn add_restaurant(&self, input: NewRestaurant) -> Result<Saved> {
    self.add_restaurant_at(input, None).await
  }

  /// As [`Self::add_restaurant`], but checks the write against `pinned`
  /// (a revision the caller saw earlier) instead of this cycle's read.
  pub async fn add_restaurant_at(
    &self,
    input: NewRestaurant,
    pinned: Option<Revision>,
  ) -> Result<Saved> {
    let name = input.name.trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    let location = GeoPoint::new(input.lat, input.lon)?;
    let seed = match &input.seed {
      Some(s) if !s.user.trim().is_empty() => Some(s.validate()?),
      _ => None,
    };

    let mut snapshot = self.fetch().await?;
    let id = snapshot.table.fresh_id();
    let mut restaurant = Restaurant::new(id, name, Some(location), input.cuisine.trim());
    if let Some(rating) = &seed {
      restaurant.apply(rating);
    }
    snapshot.table.append(restaurant.clone())?;

    let expected = pinned.or(snapshot.revision);
    let revision = self
      .save(
        &snapshot.table,
        expected.as_ref(),
        &format!("Add restaurant {name}"),
      )
      .await?;
    Ok(Saved {
      restaurant,
      revision,
    })
  }

  /// Upsert a user's rating (and comment, when non-empty) on restaurant `id`.
  pub async fn rate(&self, id: &str, submission: RatingSubmission) -> Result<Saved> {
    self.rate_at(id, submission, None).await
  }

  /// As [`Self::rate`], with a caller-pinned expected revision.
  pub async fn rate_at(
    &self,
    id: &str,
    submission: RatingSubmission,
    pinned: Option<Revision>,
  ) -> Result<Saved> {
    let id = id.trim();
    if id.is_empty() {
      return Err(Error::NoRestaurantSelected);
    }
    let rating = submission.validate()?;

    let mut snapshot = self.fetch().await?;
    let record = snapshot
      .table
      .get_mut(id)
      .ok_or_else(|| Error::RestaurantNotFound(id.to_string()))?;
    record.apply(&rating);
    let restaurant = record.clone();

    let expected = pinned.or(snapshot.revision);
    let revision = self
      .save(
        &snapshot.table,
        expected.as_ref(),
        &format!("Rate {}", restaurant.name),
      )
      .await?;
    Ok(Saved {
      restaurant,
      revision,
    })
  }

  /// Choose a random rated restaurant among those matching `cuisine`.
  pub async fn pick<R>(&self, cuisine: Option<&str>, rng: &mut R) -> Option<Pick>
  where
    R: Rng + Send + ?Sized,
  {
    let loaded = self.load().await;
    let restaurant = loaded.snapshot.table.pick_rated(cuisine, rng)?.clone();
    let aggregate = restaurant.aggregate();
    info!(id = %restaurant.id, name = %restaurant.name, "picked lunch");
    Some(Pick {
      restaurant,
      aggregate,
    })
  }
}
