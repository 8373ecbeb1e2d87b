//! Rating aggregation: the value shown for a restaurant, its star row and its
//! colour tier.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::restaurant::Ratings;

/// Averages at or above this are [`Tier::High`].
pub const HIGH_THRESHOLD: f64 = 4.0;
/// Averages at or above this (and below [`HIGH_THRESHOLD`]) are [`Tier::Mid`].
pub const MID_THRESHOLD: f64 = 2.5;
/// Number of slots in a star row.
pub const STAR_SLOTS: u8 = 5;

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// The display value derived from a ratings map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregate {
  /// Nobody rated yet.
  Unrated,
  /// Exactly one rating; shown as-is, not as an average.
  Single { value: f64 },
  /// Arithmetic mean of two or more ratings.
  Mean { value: f64, count: usize },
}

impl Aggregate {
  pub fn of(ratings: &Ratings) -> Self {
    let mut values = ratings.values();
    match (values.next(), ratings.len()) {
      (None, _) => Self::Unrated,
      (Some(value), 1) => Self::Single { value },
      (Some(first), count) => {
        let sum: f64 = first + values.sum::<f64>();
        Self::Mean {
          value: sum / count as f64,
          count,
        }
      }
    }
  }

  pub fn value(&self) -> Option<f64> {
    match self {
      Self::Unrated => None,
      Self::Single { value } | Self::Mean { value, .. } => Some(*value),
    }
  }

  pub fn count(&self) -> usize {
    match self {
      Self::Unrated => 0,
      Self::Single { .. } => 1,
      Self::Mean { count, .. } => *count,
    }
  }

  /// `"4"` for whole numbers, `"4.5"` otherwise; `None` when unrated.
  pub fn display(&self) -> Option<String> { self.value().map(format_score) }

  pub fn stars(&self) -> Option<Stars> { self.value().map(Stars::for_value) }

  pub fn tier(&self) -> Tier { Tier::for_value(self.value()) }
}

/// Format a score without a decimal when whole, else with exactly one.
pub fn format_score(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{value:.0}")
  } else {
    format!("{value:.1}")
  }
}

// ─── Stars ───────────────────────────────────────────────────────────────────

/// A five-slot star row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stars {
  pub full:  u8,
  pub half:  bool,
  pub empty: u8,
}

impl Stars {
  pub const FULL: char = '★';
  pub const HALF: char = '⯪';
  pub const EMPTY: char = '☆';

  /// `floor(value)` full stars, a half star when the remainder is at least
  /// one half, empty slots for the rest.
  pub fn for_value(value: f64) -> Self {
    let clamped = value.clamp(0.0, f64::from(STAR_SLOTS));
    let full = clamped.floor() as u8;
    let half = full < STAR_SLOTS && clamped - clamped.floor() >= 0.5;
    let empty = STAR_SLOTS - full - u8::from(half);
    Self { full, half, empty }
  }
}

impl fmt::Display for Stars {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for _ in 0..self.full {
      write!(f, "{}", Self::FULL)?;
    }
    if self.half {
      write!(f, "{}", Self::HALF)?;
    }
    for _ in 0..self.empty {
      write!(f, "{}", Self::EMPTY)?;
    }
    Ok(())
  }
}

// ─── Tier ────────────────────────────────────────────────────────────────────

/// Colour classification of a restaurant's rating.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
  High,
  Mid,
  Low,
  Neutral,
}

impl Tier {
  pub fn for_value(value: Option<f64>) -> Self {
    match value {
      None => Self::Neutral,
      Some(v) if v >= HIGH_THRESHOLD => Self::High,
      Some(v) if v >= MID_THRESHOLD => Self::Mid,
      Some(_) => Self::Low,
    }
  }

  /// Marker colour name.
  pub fn color(self) -> &'static str {
    match self {
      Self::High => "green",
      Self::Mid => "blue",
      Self::Low => "red",
      Self::Neutral => "orange",
    }
  }

  pub fn emoji(self) -> &'static str {
    match self {
      Self::High => "🟢",
      Self::Mid => "🔵",
      Self::Low => "🔴",
      Self::Neutral => "🟠",
    }
  }
}
