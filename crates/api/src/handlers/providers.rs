use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use careslot_core::models::provider::{Provider, ProviderQuery, ProviderSearchResponse};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

/// Searches verified providers by location, specialization and kind.
#[axum::debug_handler]
pub async fn search_providers(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<ProviderQuery>, QueryRejection>,
) -> Result<Json<ProviderSearchResponse>, AppError> {
    let Query(query) = query?;

    let providers: Vec<Provider> = state.catalog.search(&query).into_iter().cloned().collect();

    Ok(Json(ProviderSearchResponse {
        count: providers.len(),
        providers,
    }))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Provider>, AppError> {
    Ok(Json(state.catalog.require(&id)?.clone()))
}
