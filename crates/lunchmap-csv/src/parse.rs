//! CSV reader and table bootstrap.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_rows()      → Vec<Vec<String>>
//!          └─ Header::new()   → column positions
//!               └─ bootstrap_row() → Restaurant + LoadIssues

use std::collections::{BTreeMap, HashSet};

use lunchmap_core::{
  restaurant::{Comments, GeoPoint, Ratings, RawLocation, Restaurant},
  store::LoadIssue,
  table::Table,
};
use uuid::Uuid;

use crate::{
  COL_COMMENTS, COL_CUISINE, COL_ID, COL_LAT, COL_LON, COL_NAME, COL_RATINGS,
  ParsedTable,
  error::{Error, Result},
};

// ─── Row splitting ───────────────────────────────────────────────────────────

/// Split `input` into rows of fields.
///
/// Handles `"`-quoted fields with `""` escapes (which may span lines), CRLF,
/// LF or bare CR line endings and a leading BOM. Rows whose fields are all
/// blank are dropped.
///
/// Reading is lenient about stray quotes: a `"` in the middle of an unquoted
/// field opens a quoted section that runs to the next closing `"`, so
/// `ab"c,d",e` reads as `abc,d` and `e`. The writer never produces such
/// fields.
pub(crate) fn split_rows(input: &str) -> Result<Vec<Vec<String>>> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);

  let mut rows = Vec::new();
  let mut row: Vec<String> = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut line = 1usize;
  let mut quote_line = 1usize;
  let mut chars = input.chars().peekable();

  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' if chars.peek() == Some(&'"') => {
          chars.next();
          field.push('"');
        }
        '"' => in_quotes = false,
        '\n' => {
          line += 1;
          field.push(c);
        }
        _ => field.push(c),
      }
      continue;
    }

    match c {
      '"' => {
        in_quotes = true;
        quote_line = line;
      }
      ',' => row.push(std::mem::take(&mut field)),
      '\r' if chars.peek() == Some(&'\n') => {}
      '\r' | '\n' => {
        line += 1;
        row.push(std::mem::take(&mut field));
        push_row(&mut rows, std::mem::take(&mut row));
      }
      _ => field.push(c),
    }
  }

  if in_quotes {
    return Err(Error::UnterminatedQuote { line: quote_line });
  }
  if !field.is_empty() || !row.is_empty() {
    row.push(field);
    push_row(&mut rows, row);
  }
  Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
  if row.iter().any(|f| !f.trim().is_empty()) {
    rows.push(row);
  }
}

// ─── Header ──────────────────────────────────────────────────────────────────

/// Position of each known column in the file, if present.
struct Header {
  id:       Option<usize>,
  name:     Option<usize>,
  lat:      Option<usize>,
  lon:      Option<usize>,
  cuisine:  Option<usize>,
  ratings:  Option<usize>,
  comments: Option<usize>,
}

impl Header {
  fn new(fields: &[String]) -> Self {
    let find = |names: &[&str]| {
      fields.iter().position(|f| {
        let f = f.trim();
        names.iter().any(|n| f.eq_ignore_ascii_case(n))
      })
    };
    Self {
      id:       find(&[COL_ID]),
      name:     find(&[COL_NAME, "name"]),
      lat:      find(&[COL_LAT]),
      lon:      find(&[COL_LON]),
      cuisine:  find(&[COL_CUISINE, "cuisine"]),
      ratings:  find(&[COL_RATINGS]),
      comments: find(&[COL_COMMENTS]),
    }
  }
}

/// The cell at `index`, or `""` when the column or the cell is missing.
fn cell(row: &[String], index: Option<usize>) -> &str {
  index
    .and_then(|i| row.get(i))
    .map(String::as_str)
    .unwrap_or_default()
}

// ─── Embedded mappings ───────────────────────────────────────────────────────

/// Decode a `ratings` cell. A blank cell is an empty mapping.
pub fn decode_ratings(cell: &str) -> Result<Ratings> {
  let cell = cell.trim();
  if cell.is_empty() {
    return Ok(Ratings::new());
  }
  let map: BTreeMap<String, f64> = serde_json::from_str(cell)?;
  Ok(map.into_iter().collect())
}

/// Decode a `comments` cell. A blank cell is an empty mapping.
pub fn decode_comments(cell: &str) -> Result<Comments> {
  let cell = cell.trim();
  if cell.is_empty() {
    return Ok(Comments::new());
  }
  let map: BTreeMap<String, String> = serde_json::from_str(cell)?;
  Ok(map.into_iter().collect())
}

// ─── Bootstrap ───────────────────────────────────────────────────────────────

struct RowContext<'a> {
  row:    usize,
  issues: &'a mut Vec<LoadIssue>,
}

impl RowContext<'_> {
  fn issue(&mut self, column: &str, message: impl Into<String>) {
    self.issues.push(LoadIssue {
      row:     self.row,
      column:  column.to_string(),
      message: message.into(),
    });
  }
}

fn parse_coordinate(ctx: &mut RowContext<'_>, column: &str, raw: &str) -> Option<f64> {
  match raw.trim().parse::<f64>() {
    Ok(v) => Some(v),
    Err(_) => {
      ctx.issue(column, format!("not a number: {raw:?}"));
      None
    }
  }
}

fn parse_location(ctx: &mut RowContext<'_>, lat: &str, lon: &str) -> Option<GeoPoint> {
  if lat.trim().is_empty() && lon.trim().is_empty() {
    ctx.issue(COL_LAT, "missing coordinates");
    return None;
  }
  let lat = parse_coordinate(ctx, COL_LAT, lat);
  let lon = parse_coordinate(ctx, COL_LON, lon);
  match GeoPoint::new(lat?, lon?) {
    Ok(p) => Some(p),
    Err(e) => {
      ctx.issue(COL_LAT, e.to_string());
      None
    }
  }
}

fn bootstrap_row(
  header: &Header,
  row: &[String],
  ctx: &mut RowContext<'_>,
  taken_ids: &mut HashSet<String>,
) -> Restaurant {
  let mut id = cell(row, header.id).trim().to_string();
  if id.is_empty() {
    loop {
      id = Uuid::new_v4().to_string();
      if !taken_ids.contains(&id) {
        break;
      }
    }
    ctx.issue(COL_ID, format!("missing id, assigned {id}"));
  }
  taken_ids.insert(id.clone());

  let (lat, lon) = (cell(row, header.lat), cell(row, header.lon));
  let location = parse_location(ctx, lat, lon);
  let blank = lat.trim().is_empty() && lon.trim().is_empty();
  let raw_location = (location.is_none() && !blank).then(|| RawLocation {
    lat: lat.to_string(),
    lon: lon.to_string(),
  });

  let ratings = decode_ratings(cell(row, header.ratings)).unwrap_or_else(|e| {
    ctx.issue(COL_RATINGS, format!("unreadable ratings: {e}"));
    Ratings::new()
  });
  let comments = decode_comments(cell(row, header.comments)).unwrap_or_else(|e| {
    ctx.issue(COL_COMMENTS, format!("unreadable comments: {e}"));
    Comments::new()
  });

  Restaurant {
    id,
    name: cell(row, header.name).to_string(),
    location,
    raw_location,
    cuisine: cell(row, header.cuisine).to_string(),
    ratings,
    comments,
  }
}

pub(crate) fn parse_table(input: &str) -> Result<ParsedTable> {
  let rows = split_rows(input)?;
  let Some((header_row, data)) = rows.split_first() else {
    return Ok(ParsedTable::default());
  };
  let header = Header::new(header_row);

  let mut issues = Vec::new();
  let mut taken_ids: HashSet<String> = data
    .iter()
    .map(|r| cell(r, header.id).trim().to_string())
    .filter(|id| !id.is_empty())
    .collect();

  let records = data
    .iter()
    .enumerate()
    .map(|(i, row)| {
      let mut ctx = RowContext {
        row:    i + 1,
        issues: &mut issues,
      };
      bootstrap_row(&header, row, &mut ctx, &mut taken_ids)
    })
    .collect();

  Ok(ParsedTable {
    table: Table::from_records(records),
    issues,
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
