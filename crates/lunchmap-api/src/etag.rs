//! Revisions on the wire: `ETag` on reads, `If-Match` on writes.

use axum::{
  http::{HeaderMap, HeaderValue, header},
  response::Response,
};
use lunchmap_core::store::Revision;

/// `If-Match` may carry the revision with or without the surrounding `"`
/// required by RFC 7232, and with a weak `W/` prefix. Both forms are
/// accepted.
fn strip_etag_quotes(s: &str) -> &str { s.trim_start_matches("W/").trim_matches('"') }

/// The revision pinned by the request, if any. `*` pins nothing.
pub(crate) fn if_match(headers: &HeaderMap) -> Option<Revision> {
  let raw = headers.get(header::IF_MATCH)?.to_str().ok()?.trim();
  match strip_etag_quotes(raw) {
    "" | "*" => None,
    token => Some(Revision::new(token)),
  }
}

/// Attach `ETag: "<revision>"` when a revision is known.
pub(crate) fn with_etag(mut resp: Response, revision: Option<&Revision>) -> Response {
  if let Some(value) = revision.and_then(|r| HeaderValue::from_str(&format!("\"{r}\"")).ok()) {
    resp.headers_mut().insert(header::ETAG, value);
  }
  resp
}
