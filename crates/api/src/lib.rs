//! # CareSlot API
//!
//! The API crate provides the web server for the CareSlot booking service. It
//! exposes provider search, symptom triage, slot availability and booking
//! endpoints over the domain logic in `careslot-core`.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into domain calls
//! - **Middleware**: Error mapping and caller identity extraction
//! - **Config**: Environment-driven configuration
//!
//! The API uses Axum as the web framework; bookings are kept by whichever
//! `BookingStore` the configuration selects.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for identity and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use careslot_core::{
    availability::AvailabilityResolver,
    booking::BookingService,
    catalog::ProviderCatalog,
    clock::{Clock, SystemClock},
    notify::{LogNotifier, NotificationSink},
    store::BookingStore,
};
use careslot_db::{
    catalog::load_provider_catalog, create_pool, schema::initialize_database,
    JsonFileBookingStore, MemoryBookingStore, PgBookingStore,
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use config::{ApiConfig, StoreBackend};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Directory of bookable providers
    pub catalog: Arc<ProviderCatalog>,
    /// Read-side view of free slots
    pub availability: AvailabilityResolver,
    /// Booking commits and status transitions
    pub bookings: BookingService,
}

impl ApiState {
    pub fn new(
        catalog: Arc<ProviderCatalog>,
        store: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            availability: AvailabilityResolver::new(Arc::clone(&store), Arc::clone(&clock)),
            bookings: BookingService::new(Arc::clone(&catalog), store, clock, notifier),
            catalog,
        }
    }
}

/// Loads the provider catalog and opens the configured booking store
pub async fn build_state(config: &ApiConfig) -> Result<Arc<ApiState>> {
    let catalog = Arc::new(load_provider_catalog(&config.providers_path).await?);

    let store: Arc<dyn BookingStore> = match &config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory booking store");
            Arc::new(MemoryBookingStore::new(config.store_lock_timeout()))
        }
        StoreBackend::JsonFile { path } => {
            info!("Using JSON booking store at {}", path.display());
            Arc::new(JsonFileBookingStore::open(path, config.store_lock_timeout()).await?)
        }
        StoreBackend::Postgres { database_url } => {
            info!("Using PostgreSQL booking store");
            let pool = create_pool(database_url, config.store_lock_timeout())
                .await
                .wrap_err("Failed to connect to the booking database")?;
            initialize_database(&pool).await?;
            Arc::new(PgBookingStore::new(pool))
        }
    };

    Ok(Arc::new(ApiState::new(
        catalog,
        store,
        Arc::new(SystemClock),
        Arc::new(LogNotifier),
    )))
}

/// Builds the application router with every route attached to `state`
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Provider directory endpoints
        .merge(routes::providers::routes())
        // Symptom triage endpoints
        .merge(routes::symptoms::routes())
        // Slot availability endpoints
        .merge(routes::availability::routes())
        // Booking endpoints
        .merge(routes::bookings::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Installs the global tracing subscriber at the configured level
pub fn init_tracing(config: &ApiConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server with the provided configuration and state
pub async fn start_server(config: ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse())
            .collect::<Result<Vec<axum::http::HeaderValue>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS value")?;

        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
                axum::http::HeaderName::from_static(middleware::identity::SUBJECT_HEADER),
                axum::http::HeaderName::from_static(middleware::identity::ROLE_HEADER),
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request logging and timeout
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
