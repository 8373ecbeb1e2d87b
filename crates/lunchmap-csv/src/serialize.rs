//! CSV writer.
//!
//! Produces LF line endings and quotes only the fields that need it.

use lunchmap_core::{
  restaurant::{Comments, Ratings, Restaurant},
  table::Table,
};

use crate::{COLUMNS, error::Result};

/// Quote `s` when it contains a separator, a quote or a line break.
fn escape_field(s: &str) -> String {
  if s.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_string()
  }
}

fn push_row(out: &mut String, fields: &[&str]) {
  let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
  out.push_str(&line.join(","));
  out.push('\n');
}

/// Encode ratings as a JSON object. Non-ASCII user names stay verbatim.
pub fn encode_ratings(ratings: &Ratings) -> Result<String> {
  Ok(serde_json::to_string(ratings)?)
}

/// Encode comments as a JSON object.
pub fn encode_comments(comments: &Comments) -> Result<String> {
  Ok(serde_json::to_string(comments)?)
}

fn record_fields(r: &Restaurant) -> Result<[String; 7]> {
  let (lat, lon) = match (&r.location, &r.raw_location) {
    (Some(p), _) => (p.lat.to_string(), p.lon.to_string()),
    (None, Some(raw)) => (raw.lat.clone(), raw.lon.clone()),
    (None, None) => (String::new(), String::new()),
  };
  Ok([
    r.id.clone(),
    r.name.clone(),
    lat,
    lon,
    r.cuisine.clone(),
    encode_ratings(&r.ratings)?,
    encode_comments(&r.comments)?,
  ])
}

pub(crate) fn serialize_table(table: &Table) -> Result<String> {
  let mut out = String::new();
  push_row(&mut out, &COLUMNS);
  for record in table {
    let fields = record_fields(record)?;
    let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    push_row(&mut out, &refs);
  }
  Ok(out)
}
