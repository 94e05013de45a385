use dotenvy::dotenv;
use axum::{
    routing::{get, post},
    Router,
    middleware
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnResponse};
use tracing::Level;
use std::sync::Arc;
use anyhow::Context;

mod handlers {
    pub mod lead_handlers;
    pub mod intake_dtos;
    pub mod admin_handlers;
    pub mod rate_limit;
}
mod models {
    pub mod lead_models;
}
mod repositories {
    pub mod lead_repository;
    pub mod booking_repository;
}
mod config {
    pub mod store;
}
mod schema;


use repositories::lead_repository::LeadRepository;
use repositories::booking_repository::BookingRepository;
use config::store::{self, DbPool, StoreError};
use handlers::rate_limit::{self, SubmissionLimiter};

use handlers::lead_handlers;
use handlers::admin_handlers;


async fn health_check() -> &'static str {
    "OK"
}

pub struct AppState {
    lead_repository: Arc<LeadRepository>,
    booking_repository: Arc<BookingRepository>,
    submission_limiter: SubmissionLimiter,
    admin_api_key: String,
}

impl AppState {
    pub fn new(pool: DbPool, admin_api_key: String, submissions_per_minute: u32) -> Self {
        Self {
            lead_repository: Arc::new(LeadRepository::new(pool.clone())),
            booking_repository: Arc::new(BookingRepository::new(pool)),
            submission_limiter: rate_limit::submission_limiter(submissions_per_minute),
            admin_api_key,
        }
    }

    /// Builds the state on the process-wide store set up by `init_store`.
    pub fn from_store(admin_api_key: String, submissions_per_minute: u32) -> Result<Self, StoreError> {
        let pool = store::get_store()?;
        Ok(Self::new(pool.clone(), admin_api_key, submissions_per_minute))
    }
}

pub fn validate_env() {
    let _ = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    require_non_empty("ADMIN_API_KEY");
    let _ = std::env::var("FRONTEND_URL") // frontend origin allowed by CORS
        .expect("FRONTEND_URL must be set");
}

// A blank admin key would match an empty bearer token
fn require_non_empty(name: &str) -> String {
    let value = std::env::var(name)
        .unwrap_or_else(|_| panic!("{} must be set", name));
    if value.trim().is_empty() {
        panic!("{} must not be empty", name);
    }
    value
}

pub fn app(state: Arc<AppState>) -> Router {
    let submission_routes = Router::new()
        .route("/api/leads", post(lead_handlers::submit_lead))
        .route("/api/bookings", post(lead_handlers::submit_booking))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::limit_submissions));

    let admin_routes = Router::new()
        .route("/api/admin/leads", get(admin_handlers::get_leads))
        .route("/api/admin/leads/{reference}/status", post(admin_handlers::update_lead_status))
        .route("/api/admin/bookings", get(admin_handlers::get_bookings))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_handlers::require_admin_key));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/bookings/slots", get(lead_handlers::get_available_slots))
        .merge(submission_routes)
        .merge(admin_routes)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    validate_env();

    let _guard = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((dsn, sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        }))
    });

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    store::init_store(&database_url).context("Failed to set up the store")?;

    let submissions_per_minute = std::env::var("SUBMISSIONS_PER_MINUTE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    let state = Arc::new(AppState::from_store(
        std::env::var("ADMIN_API_KEY")?,
        submissions_per_minute,
    )?);

    rate_limit::spawn_pruning(state.clone());

    let frontend_url = std::env::var("FRONTEND_URL")?;
    let app = app(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        .layer(
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_origin(frontend_url.parse::<axum::http::HeaderValue>()?)
                .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::AUTHORIZATION])
                .expose_headers([axum::http::header::CONTENT_TYPE])
        );

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::require_non_empty;

    #[test]
    #[should_panic(expected = "INTAKE_TEST_BLANK_KEY must not be empty")]
    fn blank_admin_key_is_refused() {
        std::env::set_var("INTAKE_TEST_BLANK_KEY", "  ");
        require_non_empty("INTAKE_TEST_BLANK_KEY");
    }

    #[test]
    fn set_key_is_returned() {
        std::env::set_var("INTAKE_TEST_SET_KEY", "s3cret");
        assert_eq!(require_non_empty("INTAKE_TEST_SET_KEY"), "s3cret");
    }
}
