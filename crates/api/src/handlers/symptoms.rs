use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use careslot_core::{
    models::{
        provider::{ProviderKind, ProviderQuery},
        symptom::{AnalyzeSymptomsRequest, AnalyzeSymptomsResponse},
    },
    symptoms,
};
use std::sync::Arc;
use tracing::debug;

use crate::{middleware::error_handling::AppError, ApiState};

/// Suggests a specialty for a symptom description along with verified doctors
/// practising it.
#[axum::debug_handler]
pub async fn analyze_symptoms(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AnalyzeSymptomsRequest>, JsonRejection>,
) -> Result<Json<AnalyzeSymptomsResponse>, AppError> {
    let Json(payload) = payload?;

    let assessment = symptoms::analyze(&payload.symptoms)?;
    debug!(
        specialization = %assessment.specialization,
        keyword = ?assessment.matched_keyword,
        "symptoms analyzed"
    );

    let doctors = state
        .catalog
        .search(&ProviderQuery {
            specialization: Some(assessment.specialization.clone()),
            kind: Some(ProviderKind::Doctor),
            ..Default::default()
        })
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(AnalyzeSymptomsResponse {
        assessment,
        doctors,
    }))
}
