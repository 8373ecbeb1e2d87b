//! CSV codec for the restaurant table.
//!
//! Converts between the stored CSV blob and [`lunchmap_core::table::Table`].
//! Pure synchronous; no HTTP dependencies.
//!
//! The stored layout is one header line followed by one line per record:
//!
//! ```text
//! id,nom,lat,lon,type,ratings,comments
//! 3f1c…,Sushi Zen,48.8727,2.3357,Japonais,"{""ana"":4.5}","{""ana"":""top""}"
//! ```
//!
//! `ratings` and `comments` hold JSON objects keyed by user name.
//!
//! # Quick start
//!
//! ```no_run
//! let blob = "id,nom,lat,lon,type,ratings\nr1,Sushi Zen,48.87,2.33,Japonais,{}\n";
//! let parsed = lunchmap_csv::parse(blob).unwrap();
//! println!("{} records, {} issues", parsed.table.len(), parsed.issues.len());
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
use lunchmap_core::{store::LoadIssue, table::Table};
pub use parse::{decode_comments, decode_ratings};
pub use serialize::{encode_comments, encode_ratings};

/// Column names, in the order they are written.
pub const COLUMNS: [&str; 7] = [
  COL_ID,
  COL_NAME,
  COL_LAT,
  COL_LON,
  COL_CUISINE,
  COL_RATINGS,
  COL_COMMENTS,
];

pub const COL_ID: &str = "id";
pub const COL_NAME: &str = "nom";
pub const COL_LAT: &str = "lat";
pub const COL_LON: &str = "lon";
pub const COL_CUISINE: &str = "type";
pub const COL_RATINGS: &str = "ratings";
pub const COL_COMMENTS: &str = "comments";

/// The result of parsing a stored table.
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
  pub table:  Table,
  /// Cells that could not be read and were replaced with empty values.
  pub issues: Vec<LoadIssue>,
}

/// Parse and normalise a stored CSV blob.
///
/// Missing columns read as empty, malformed cells are replaced and reported
/// in [`ParsedTable::issues`]. Only a structurally broken file (an
/// unterminated quote) is an error.
pub fn parse(input: &str) -> Result<ParsedTable> { parse::parse_table(input) }

/// Serialise `table` with the canonical header.
pub fn serialize(table: &Table) -> Result<String> {
  serialize::serialize_table(table)
}
