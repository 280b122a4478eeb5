use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/symptoms/analyze",
        post(handlers::symptoms::analyze_symptoms),
    )
}
