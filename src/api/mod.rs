mod handlers;
mod openapi;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Database;
use crate::workouts::Catalog;

pub use handlers::{Envelope, ErrorResponse, Links};
pub use openapi::openapi_document;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Arc<Catalog>,
    pub started: Instant,
}

impl AppState {
    /// Load the exercise catalog from `db`. Fails if the stored catalog is
    /// inconsistent.
    pub fn new(db: Database) -> anyhow::Result<Self> {
        let catalog = db.load_catalog()?;
        Ok(Self {
            db,
            catalog: Arc::new(catalog),
            started: Instant::now(),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    create_router_with_config(state, &Config::default())
}

pub fn create_router_with_config(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api", get(handlers::openapi))
        .route("/stats", get(handlers::get_stats))
        .route("/summary", get(handlers::workouts_summary))
        .route("/exercises", get(handlers::list_exercises))
        // Tracks
        .route("/tracks", get(handlers::list_tracks).post(handlers::create_track))
        .route("/tracks/{id}", get(handlers::get_track))
        // Daily entries
        .route("/entries", get(handlers::list_entries).post(handlers::create_entry))
        .route(
            "/entries/{date}",
            get(handlers::get_entry).patch(handlers::update_entry),
        )
        .route("/entries/{date}/diary", post(handlers::update_diary))
        .route("/workouts/{date}", get(handlers::get_workouts))
        .route("/diary", get(handlers::get_diary))
        .route("/week/{week}", get(handlers::get_week))
        // Food
        .route("/meals", get(handlers::list_meals))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .flatten()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
