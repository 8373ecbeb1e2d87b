//! Router tests against a [`MemoryStore`].

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use lunchmap_core::service::Lunchmap;
use lunchmap_store::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::api_router;

const SEED_CSV: &str = "id,nom,lat,lon,type,ratings,comments\n\
                        r1,Sushi Zen,48.8727,2.3357,Sushi Japonais,\"{\"\"ana\"\": 4, \"\"bob\"\": 5}\",{}\n\
                        r2,Da Mario,48.8719,2.3356,Italien,{},{}\n";

fn app(store: &MemoryStore) -> Router {
  api_router(Arc::new(Lunchmap::new(store.clone())))
}

async fn send(
  store: &MemoryStore,
  method: &str,
  uri: &str,
  headers: Vec<(header::HeaderName, &str)>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  app(store).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn etag(resp: &Response) -> String {
  resp
    .headers()
    .get(header::ETAG)
    .unwrap()
    .to_str()
    .unwrap()
    .to_string()
}

// ── Reads ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_views_and_etag() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(&store, "GET", "/restaurants", vec![], None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let revision = store.history().last().unwrap().revision.to_string();
  assert_eq!(etag(&resp), format!("\"{revision}\""));

  let body = json_body(resp).await;
  assert_eq!(body["revision"], revision);
  assert!(body["warning"].is_null());
  let zen = &body["restaurants"][0];
  assert_eq!(zen["emoji"], "🍣");
  assert_eq!(zen["rating"]["display"], "4.5");
  assert_eq!(zen["rating"]["stars"], "★★★★⯪");
  assert_eq!(zen["tier"], "high");
  assert_eq!(zen["color"], "green");
  assert_eq!(body["restaurants"][1]["tier"], "neutral");
}

#[tokio::test]
async fn list_filters_by_cuisine() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(&store, "GET", "/restaurants?cuisine=Italien", vec![], None).await;
  let body = json_body(resp).await;
  let list = body["restaurants"].as_array().unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["id"], "r2");
}

#[tokio::test]
async fn unreadable_table_lists_empty_with_warning() {
  let store = MemoryStore::with_blob("id,nom\nr1,\"unterminated\n");
  let resp = send(&store, "GET", "/restaurants", vec![], None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["restaurants"], json!([]));
  assert!(body["warning"].is_string());
}

#[tokio::test]
async fn get_one_and_not_found() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(&store, "GET", "/restaurants/r1", vec![], None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["name"], "Sushi Zen");

  let resp = send(&store, "GET", "/restaurants/nope", vec![], None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn cuisines_are_sorted() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(&store, "GET", "/cuisines", vec![], None).await;
  assert_eq!(json_body(resp).await, json!(["Italien", "Sushi Japonais"]));
}

#[tokio::test]
async fn pick_only_returns_rated() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(&store, "GET", "/pick", vec![], None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["id"], "r1");

  let resp = send(&store, "GET", "/pick?cuisine=Italien", vec![], None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Writes ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rating_an_unreadable_table_is_bad_gateway() {
  let store = MemoryStore::with_blob("id,nom\nr1,\"unterminated\n");
  let resp = send(
    &store,
    "POST",
    "/restaurants/r1/ratings",
    vec![],
    Some(json!({ "user": "ana", "score": 4 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  assert_eq!(store.history().len(), 1);
}

#[tokio::test]
async fn create_with_seed_rating() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(
    &store,
    "POST",
    "/restaurants",
    vec![],
    Some(json!({
      "name": "  Pho 14 ",
      "lat": 48.83,
      "lon": 2.36,
      "cuisine": "Vietnamien",
      "user": "Léa",
      "score": 3.5,
      "comment": "bouillon parfait",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let new_etag = etag(&resp);
  let body = json_body(resp).await;
  assert_eq!(body["name"], "Pho 14");
  assert_eq!(body["rating"]["display"], "3.5");
  assert_eq!(body["entries"][0]["comment"], "bouillon parfait");

  let head = store.history().last().unwrap().clone();
  assert_eq!(head.message, "Add restaurant Pho 14");
  assert_eq!(new_etag, format!("\"{}\"", head.revision));
  assert!(store.blob().unwrap().contains("Pho 14"));
}

#[tokio::test]
async fn create_rejects_invalid_input_without_writing() {
  let store = MemoryStore::with_blob(SEED_CSV);
  for body in [
    json!({ "name": "   ", "lat": 48.0, "lon": 2.0 }),
    json!({ "name": "Nowhere", "lat": 123.0, "lon": 2.0 }),
    json!({ "name": "Zen", "lat": 48.0, "lon": 2.0, "user": "ana" }),
    json!({ "name": "Zen", "lat": 48.0, "lon": 2.0, "user": "ana", "score": 4.2 }),
  ] {
    let resp = send(&store, "POST", "/restaurants", vec![], Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
  assert_eq!(store.history().len(), 1);
}

#[tokio::test]
async fn rate_upserts_and_returns_new_etag() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(
    &store,
    "POST",
    "/restaurants/r2/ratings",
    vec![],
    Some(json!({ "user": "ana", "score": 2, "comment": "" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["rating"]["display"], "2");
  assert_eq!(body["tier"], "low");
  assert!(body["entries"][0]["comment"].is_null());
  assert_eq!(store.history().last().unwrap().message, "Rate Da Mario");
}

#[tokio::test]
async fn rate_unknown_restaurant_is_404() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let resp = send(
    &store,
    "POST",
    "/restaurants/zzz/ratings",
    vec![],
    Some(json!({ "user": "ana", "score": 4 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn current_if_match_is_accepted() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let tag = etag(&send(&store, "GET", "/restaurants", vec![], None).await);
  let resp = send(
    &store,
    "POST",
    "/restaurants/r1/ratings",
    vec![(header::IF_MATCH, tag.as_str())],
    Some(json!({ "user": "cleo", "score": 3 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn stale_if_match_is_412_and_keeps_the_table() {
  let store = MemoryStore::with_blob(SEED_CSV);
  let tag = etag(&send(&store, "GET", "/restaurants", vec![], None).await);

  store.replace_blob(
    "id,nom,lat,lon,type,ratings,comments\nr1,Sushi Zen,48.8,2.3,Japonais,{},{}\n",
    "Edited by hand",
  );
  let before = store.blob();

  let resp = send(
    &store,
    "POST",
    "/restaurants/r1/ratings",
    vec![(header::IF_MATCH, tag.as_str())],
    Some(json!({ "user": "cleo", "score": 3 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
  assert_eq!(store.blob(), before);
}
