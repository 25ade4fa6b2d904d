//! Integration tests for the live-reload dev server.
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use assetpipe_cli::server::{ServerState, livereload, router};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::IntegrationTestContext;
use tokio::sync::broadcast;
use tower::ServiceExt as _;

async fn get(ctx: &IntegrationTestContext, uri: &str) -> axum::response::Response {
    let (events, _) = broadcast::channel(4);
    let state = Arc::new(ServerState::new(ctx.root_path().to_path_buf(), events));
    router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_page_carries_the_reload_client() {
    let ctx = IntegrationTestContext::new();
    let response = get(&ctx, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache"
    );

    let body = body_text(response).await;
    assert!(body.contains("<h1>Agency</h1>"));
    assert!(body.contains(&format!("{}</body>", livereload::SCRIPT_TAG)), "{body}");
}

#[tokio::test]
async fn assets_are_served_untouched() {
    let ctx = IntegrationTestContext::new();
    let response = get(&ctx, "/js/agency.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains(livereload::SCRIPT_TAG));
    assert!(body.contains("scrollOffset"));
}

#[tokio::test]
async fn reload_client_script_is_javascript() {
    let ctx = IntegrationTestContext::new();
    let response = get(&ctx, livereload::SCRIPT_PATH).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("application/javascript"));
}

#[tokio::test]
async fn traversal_outside_the_root_is_refused() {
    let ctx = IntegrationTestContext::new();
    let response = get(&ctx, "/../package.json").await;
    assert_ne!(response.status(), StatusCode::OK);
}
