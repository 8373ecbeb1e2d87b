//! JSON envelopes of the GitHub contents API and the base64 blob encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// `GET /repos/{repo}/contents/{path}` response (only the fields we read).
#[derive(Debug, Deserialize)]
pub(crate) struct ContentFile {
  pub sha:      String,
  #[serde(default)]
  pub content:  String,
  #[serde(default)]
  pub encoding: String,
}

/// `PUT /repos/{repo}/contents/{path}` request body.
#[derive(Debug, Serialize)]
pub(crate) struct PutContent<'a> {
  pub message: &'a str,
  /// Base64 of the whole new file.
  pub content: String,
  /// Blob sha being replaced; omitted when creating the file.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sha:     Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub branch:  Option<&'a str>,
}

/// `PUT` response: the new blob sha lives under `content`.
#[derive(Debug, Deserialize)]
pub(crate) struct PutResponse {
  pub content: CommittedFile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommittedFile {
  pub sha: String,
}

/// Decode the file body. GitHub wraps the base64 text at 60 columns.
pub(crate) fn decode_content(file: &ContentFile) -> Result<String> {
  if !file.encoding.eq_ignore_ascii_case("base64") {
    return Err(Error::Encoding(file.encoding.clone()));
  }
  let compact: String = file
    .content
    .chars()
    .filter(|c| !c.is_ascii_whitespace())
    .collect();
  let bytes = B64.decode(compact)?;
  Ok(String::from_utf8(bytes)?)
}

pub(crate) fn encode_content(text: &str) -> String { B64.encode(text.as_bytes()) }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_wrapped_base64() {
    let encoded = encode_content("id,nom\nr1,Crêperie\n");
    let wrapped = format!("{}\n{}\n", &encoded[..10], &encoded[10..]);
    let file = ContentFile {
      sha:      "abc".into(),
      content:  wrapped,
      encoding: "base64".into(),
    };
    assert_eq!(decode_content(&file).unwrap(), "id,nom\nr1,Crêperie\n");
  }

  #[test]
  fn non_base64_encoding_is_an_error() {
    let file = ContentFile {
      sha:      "abc".into(),
      content:  String::new(),
      encoding: "none".into(),
    };
    assert!(matches!(decode_content(&file), Err(Error::Encoding(e)) if e == "none"));
  }

  #[test]
  fn put_body_omits_sha_when_creating() {
    let body = PutContent {
      message: "Add restaurant Zen",
      content: encode_content("x"),
      sha:     None,
      branch:  None,
    };
    let json = serde_json::to_value(&body).unwrap();
    assert!(json.get("sha").is_none());
    assert_eq!(json["message"], "Add restaurant Zen");
  }
}
