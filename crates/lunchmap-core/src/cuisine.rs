//! Cuisine tag to marker emoji.

/// Shown when the tag is empty.
pub const NO_TYPE: &str = "⭐";
/// Shown when the tag matches none of [`RULES`].
pub const GENERIC: &str = "🍽️";

/// Ordered substring rules, matched against the lowercased tag. The first
/// rule with a matching needle wins.
pub const RULES: &[(&[&str], &str)] = &[
  (&["jap"], "🍣"),
  (&["ital", "pâtes"], "🍝"),
  (&["pizz"], "🍕"),
  (&["burger"], "🍔"),
  (&["mex"], "🌮"),
  (&["ind"], "🇮🇳"),
  (&["healthy", "salad", "vege"], "🥗"),
  (&["asiat", "chin", "thai"], "🍜"),
  (&["bar", "pub"], "🍺"),
  (&["café", "cafe"], "☕"),
  (&["leban", "liban"], "🥙"),
  (&["fast food", "kfc", "mcdo"], "🍟"),
];

pub fn emoji_for(cuisine: &str) -> &'static str {
  let tag = cuisine.trim();
  if tag.is_empty() {
    return NO_TYPE;
  }
  let tag = tag.to_lowercase();
  RULES
    .iter()
    .find(|(needles, _)| needles.iter().any(|n| tag.contains(n)))
    .map(|(_, emoji)| *emoji)
    .unwrap_or(GENERIC)
}
