//! Terminal output, coloured by rating tier.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use lunchmap_core::{
  aggregate::{Tier, format_score},
  restaurant::Restaurant,
};

pub fn tier_color(tier: Tier) -> Color {
  match tier {
    Tier::High => Color::Green,
    Tier::Mid => Color::Blue,
    Tier::Low => Color::Red,
    Tier::Neutral => Color::Rgb {
      r: 255,
      g: 165,
      b: 0,
    },
  }
}

/// `🟢 🍣 Sushi Zen  4.5 ★★★★⯪ (2)`
pub fn summary_line(r: &Restaurant) -> String {
  let aggregate = r.aggregate();
  let rating = match (aggregate.display(), aggregate.stars()) {
    (Some(display), Some(stars)) => format!("{display} {stars} ({})", aggregate.count()),
    _ => "not rated yet".to_string(),
  };
  format!("{} {} {}  {rating}", aggregate.tier().emoji(), r.emoji(), r.name)
}

/// Everything known about `r`, one line per fact and per user.
pub fn detail_lines(r: &Restaurant) -> Vec<String> {
  let mut lines = vec![summary_line(r), format!("  id:       {}", r.id)];
  let cuisine: &str = if r.cuisine.is_empty() { "-" } else { &r.cuisine };
  lines.push(format!("  cuisine:  {cuisine}"));
  match r.location {
    Some(p) => lines.push(format!("  location: {}, {}", p.lat, p.lon)),
    None => lines.push("  location: unknown".to_string()),
  }
  for entry in r.entries() {
    let score = entry.score.map_or_else(|| "-".to_string(), format_score);
    match entry.comment {
      Some(comment) => lines.push(format!("  {}: {score}  \"{comment}\"", entry.user)),
      None => lines.push(format!("  {}: {score}", entry.user)),
    }
  }
  lines
}

/// Writes ANSI colours only when `color` is set.
pub struct Printer<W> {
  out:   W,
  color: bool,
}

impl<W: Write> Printer<W> {
  pub fn new(out: W, color: bool) -> Self { Self { out, color } }

  fn line(&mut self, text: String, tint: Color) -> io::Result<()> {
    if self.color {
      writeln!(self.out, "{}", text.with(tint))
    } else {
      writeln!(self.out, "{text}")
    }
  }

  pub fn plain(&mut self, text: &str) -> io::Result<()> { writeln!(self.out, "{text}") }

  pub fn summary(&mut self, r: &Restaurant) -> io::Result<()> {
    let tint = tier_color(r.aggregate().tier());
    let line = format!("{}  [{}]", summary_line(r), r.id);
    self.line(line, tint)
  }

  pub fn detail(&mut self, r: &Restaurant) -> io::Result<()> {
    let tint = tier_color(r.aggregate().tier());
    let mut lines = detail_lines(r).into_iter();
    if let Some(head) = lines.next() {
      self.line(head, tint)?;
    }
    for line in lines {
      self.plain(&line)?;
    }
    Ok(())
  }

  pub fn warning(&mut self, text: &str) -> io::Result<()> {
    self.line(format!("warning: {text}"), Color::Yellow)
  }

  #[cfg(test)]
  pub fn into_inner(self) -> W { self.out }
}
