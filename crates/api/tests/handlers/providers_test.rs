use axum::http::StatusCode;
use careslot_core::models::provider::{Provider, ProviderKind, ProviderSearchResponse};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{TestContext, CARDIOLOGIST, LAB};

fn ids(response: &ProviderSearchResponse) -> Vec<&str> {
    response.providers.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_search_lists_verified_providers() {
    let ctx = TestContext::new();

    let response: ProviderSearchResponse = ctx.server.get("/providers").await.json();

    assert_eq!(response.count, 3);
    assert_eq!(ids(&response), vec![LAB, "dr-mehta", CARDIOLOGIST]);
}

#[tokio::test]
async fn test_search_filters() {
    let ctx = TestContext::new();

    let response: ProviderSearchResponse = ctx
        .server
        .get("/providers?location=bengal&specialization=cardiologist")
        .await
        .json();
    assert_eq!(ids(&response), vec![CARDIOLOGIST]);

    let response: ProviderSearchResponse = ctx.server.get("/providers?kind=lab").await.json();
    assert_eq!(ids(&response), vec![LAB]);

    let response: ProviderSearchResponse =
        ctx.server.get("/providers?location=Delhi").await.json();
    assert_eq!(response.count, 0);
}

#[tokio::test]
async fn test_invalid_kind_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/providers?kind=pharmacy").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_provider() {
    let ctx = TestContext::new();

    let provider: Provider = ctx.server.get(&format!("/providers/{}", LAB)).await.json();
    assert_eq!(provider.kind, ProviderKind::Lab);
    assert_eq!(provider.tests_offered, vec!["Lipid Profile".to_string()]);

    let response = ctx.server.get("/providers/dr-nobody").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let health: Value = ctx.server.get("/health").await.json();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["providers"], 4);

    let version: Value = ctx.server.get("/version").await.json();
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
}
