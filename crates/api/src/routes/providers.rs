use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/providers", get(handlers::providers::search_providers))
        .route("/providers/:id", get(handlers::providers::get_provider))
}
