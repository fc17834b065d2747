use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use mediaflow::addon::demo_addon;
use mediaflow::api;
use mediaflow::api::state::AppState;
use mediaflow::config::Config;

/// Creates a minimal config for testing
fn create_test_config() -> Config {
    let config_toml = r#"
[server]
bind_addr = "127.0.0.1:8080"

[engine]
max_resolve_depth = 5
    "#;

    toml::from_str(config_toml).expect("Failed to parse test config")
}

/// Builds the app with the demo addon registered
fn build_test_app() -> Router {
    let config = create_test_config();
    let addon = demo_addon().expect("Failed to build demo addon");
    let state = AppState::new(config, reqwest::Client::new(), vec![addon]);
    api::router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_registered_addons() {
    let app = build_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["addons"], json!(1));
}

#[tokio::test]
async fn addons_listing_includes_stages_and_resolvers() {
    let app = build_test_app();

    let response = app.oneshot(get("/addons")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let addon = &body["addons"][0];
    assert_eq!(addon["manifest"]["id"], json!("demo"));
    assert_eq!(addon["stages"], json!(["catalog", "item", "source"]));
    assert_eq!(addon["resolve_handlers"], json!(2));
}

#[tokio::test]
async fn manifest_endpoint_returns_addon_metadata() {
    let app = build_test_app();

    let response = app.oneshot(get("/addons/demo/manifest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], json!("demo"));
    assert_eq!(body["item_types"], json!(["movie", "series"]));
}

#[tokio::test]
async fn unknown_addon_is_404_with_stable_code() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json("/addons/nope/catalog", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("UNKNOWN_ADDON"));
}

#[tokio::test]
async fn catalog_returns_first_page_without_cursor() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json("/addons/demo/catalog", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["next_cursor"], Value::Null);
}

#[tokio::test]
async fn catalog_rejects_missing_content_type() {
    let app = build_test_app();

    let request = Request::builder()
        .uri("/addons/demo/catalog")
        .method("POST")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("INVALID_PAYLOAD"));
}

#[tokio::test]
async fn item_lookup_by_imdb_id() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/item",
            json!({ "type": "movie", "ids": { "imdb_id": "tt0807840" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["name"], json!("Elephants Dream"));
    assert!(body["description"].is_string());
}

#[tokio::test]
async fn unknown_item_is_json_null_not_error() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/item",
            json!({ "type": "movie", "name": "no such film" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn empty_identity_is_rejected() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json("/addons/demo/item", json!({ "type": "movie" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("INVALID_PAYLOAD"));
}

#[tokio::test]
async fn source_stage_returns_sources() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/source",
            json!({ "type": "movie", "name": "Big Buck Bunny" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let sources = body.as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["quality"], json!("1080p"));
}

#[tokio::test]
async fn resolve_runs_the_resolver_chain() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/resolve",
            json!({
                "source": {
                    "name": "Resolver example",
                    "url": "https://videocdn.demo.test/play/tt0807840"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["outcome"], json!("streams"));
    let streams = body["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0]["format"], json!("mp4"));
    assert_eq!(streams[1]["format"], json!("webm"));
}

#[tokio::test]
async fn resolve_of_unmatched_url_is_direct_outcome() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/resolve",
            json!({
                "source": {
                    "name": "Plain file",
                    "url": "https://plain.test/video.mp4"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["outcome"], json!("direct"));
    assert_eq!(body["source"]["url"], json!("https://plain.test/video.mp4"));
}

#[tokio::test]
async fn resolve_failure_maps_to_bad_gateway() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/resolve",
            json!({
                "source": {
                    "name": "bad id",
                    "url": "https://videocdn.demo.test/play/tt0000000"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["code"], json!("RESOLUTION_FAILED"));
}

#[tokio::test]
async fn resolve_rejects_non_http_url() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/resolve",
            json!({ "source": { "name": "bad", "url": "file:///etc/passwd" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn streams_resolves_every_source_of_an_item() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/streams",
            json!({ "type": "movie", "name": "jellyfish" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    // Input order is preserved: the hosted 720p file passes through as a
    // single stream, then the page source resolves to three qualities.
    assert_eq!(results[0]["outcome"], json!("streams"));
    assert_eq!(results[0]["streams"].as_array().unwrap().len(), 1);
    assert_eq!(results[1]["outcome"], json!("streams"));
    assert_eq!(results[1]["streams"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn streams_for_unknown_identity_is_empty() {
    let app = build_test_app();

    let response = app
        .oneshot(post_json(
            "/addons/demo/streams",
            json!({ "type": "movie", "name": "nothing here" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["results"], json!([]));
}
