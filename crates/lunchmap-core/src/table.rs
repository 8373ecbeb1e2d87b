//! The restaurant table: an append-only, ordered list of records.

use std::collections::BTreeSet;

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, restaurant::Restaurant};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
  records: Vec<Restaurant>,
}

impl Table {
  pub fn new() -> Self { Self::default() }

  /// Build a table from records already in storage order. Identifiers are
  /// taken as-is.
  pub fn from_records(records: Vec<Restaurant>) -> Self { Self { records } }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn records(&self) -> &[Restaurant] { &self.records }

  pub fn iter(&self) -> std::slice::Iter<'_, Restaurant> { self.records.iter() }

  pub fn get(&self, id: &str) -> Option<&Restaurant> {
    self.records.iter().find(|r| r.id == id)
  }

  pub fn get_mut(&mut self, id: &str) -> Option<&mut Restaurant> {
    self.records.iter_mut().find(|r| r.id == id)
  }

  pub fn contains_id(&self, id: &str) -> bool { self.get(id).is_some() }

  /// A UUID v4 string not used by any record.
  pub fn fresh_id(&self) -> String {
    loop {
      let id = Uuid::new_v4().to_string();
      if !self.contains_id(&id) {
        return id;
      }
    }
  }

  /// Append `record` at the end of the table.
  pub fn append(&mut self, record: Restaurant) -> Result<&Restaurant> {
    if self.contains_id(&record.id) {
      return Err(Error::DuplicateId(record.id));
    }
    self.records.push(record);
    Ok(&self.records[self.records.len() - 1])
  }

  /// Records whose cuisine tag equals `cuisine` exactly. `None` or an empty
  /// filter selects every record.
  pub fn filter_cuisine(&self, cuisine: Option<&str>) -> Vec<&Restaurant> {
    match cuisine.filter(|c| !c.is_empty()) {
      None => self.records.iter().collect(),
      Some(c) => self.records.iter().filter(|r| r.cuisine == c).collect(),
    }
  }

  /// Distinct non-empty cuisine tags, sorted.
  pub fn cuisines(&self) -> Vec<&str> {
    self
      .records
      .iter()
      .map(|r| r.cuisine.as_str())
      .filter(|c| !c.is_empty())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }

  /// A uniformly random record among those matching `cuisine` that have at
  /// least one rating.
  pub fn pick_rated<R>(&self, cuisine: Option<&str>, rng: &mut R) -> Option<&Restaurant>
  where
    R: Rng + ?Sized,
  {
    let rated: Vec<&Restaurant> = self
      .filter_cuisine(cuisine)
      .into_iter()
      .filter(|r| !r.ratings.is_empty())
      .collect();
    rated.choose(rng).copied()
  }
}

impl<'a> IntoIterator for &'a Table {
  type Item = &'a Restaurant;
  type IntoIter = std::slice::Iter<'a, Restaurant>;

  fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}
