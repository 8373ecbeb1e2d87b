//! Turn a `<restaurant>` argument into a record: an exact id, or else the
//! best fuzzy match on the name.

use anyhow::{Result, anyhow, bail};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use lunchmap_core::{restaurant::Restaurant, table::Table};

pub fn resolve<'a>(table: &'a Table, query: &str) -> Result<&'a Restaurant> {
  let query = query.trim();
  if query.is_empty() {
    bail!("no restaurant selected");
  }
  if let Some(record) = table.get(query) {
    return Ok(record);
  }

  let matcher = SkimMatcherV2::default();
  let mut best: Option<(i64, &Restaurant)> = None;
  for record in table {
    let Some(score) = matcher.fuzzy_match(&record.name, query) else {
      continue;
    };
    // Ties go to the earlier record.
    if best.is_none_or(|(top, _)| score > top) {
      best = Some((score, record));
    }
  }
  best
    .map(|(_, record)| record)
    .ok_or_else(|| anyhow!("no restaurant matches {query:?}"))
}
