use axum::http::StatusCode;
use careslot_core::models::symptom::AnalyzeSymptomsResponse;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{TestContext, CARDIOLOGIST};

#[tokio::test]
async fn test_chest_pain_points_to_cardiology() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/symptoms/analyze")
        .json(&json!({ "symptoms": "Sharp chest pain since yesterday" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: AnalyzeSymptomsResponse = response.json();
    assert_eq!(body.assessment.specialization, "Cardiologist");
    assert_eq!(body.assessment.matched_keyword.as_deref(), Some("chest"));
    // Only the verified cardiologist is suggested
    let doctors: Vec<&str> = body.doctors.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(doctors, vec![CARDIOLOGIST]);
}

#[tokio::test]
async fn test_response_is_flat() {
    let ctx = TestContext::new();

    let body: Value = ctx
        .server
        .post("/symptoms/analyze")
        .json(&json!({ "symptoms": "mild fever" }))
        .await
        .json();

    assert_eq!(body["specialization"], "General Physician");
    assert_eq!(body["matchedKeyword"], "fever");
    assert_eq!(body["doctors"][0]["id"], "dr-mehta");
}

#[tokio::test]
async fn test_unmatched_symptoms_fall_back_to_general_checkup() {
    let ctx = TestContext::new();

    let body: Value = ctx
        .server
        .post("/symptoms/analyze")
        .json(&json!({ "symptoms": "I just feel off" }))
        .await
        .json();

    assert_eq!(body["specialization"], "General Physician");
    assert_eq!(body["matchedKeyword"], Value::Null);
    assert_eq!(
        body["message"],
        "Based on your symptoms, we recommend a general checkup."
    );
}

#[tokio::test]
async fn test_blank_symptoms_are_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/symptoms/analyze")
        .json(&json!({ "symptoms": "  " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = ctx.server.post("/symptoms/analyze").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
