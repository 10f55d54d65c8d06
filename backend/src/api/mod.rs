//! API module
//!
//! Contains the router, the shared handler state, and the HTTP request
//! handlers for the reporting endpoints.

pub mod filters;
pub mod health;
pub mod response;
pub mod sales;
pub mod utils;

use crate::sales::SalesStore;
use axum::{
    extract::Request, http::HeaderValue, middleware::Next, response::Response, routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// State shared by every handler
///
/// Holds no mutable data; each request works only through the store.
#[derive(Clone)]
pub struct AppState {
    /// Read-only access to the sales table
    pub store: Arc<dyn SalesStore>,
}

impl AppState {
    /// Create handler state around a store
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self { store }
    }
}

/// Response header carrying the request's correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tag each request with a correlation id and log its outcome
///
/// A caller-supplied `x-request-id` is kept; otherwise a fresh UUID is used.
/// The id is echoed back so dashboard errors can be matched to log lines.
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let start = Instant::now();

    let span = info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis();
    if status >= 500 {
        warn!(%request_id, %path, ?query, status, latency_ms, "Report failed");
    } else {
        info!(%request_id, %path, ?query, status, latency_ms, "Report served");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Build the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        // Sales reports
        .route("/api/sales/top", get(sales::top_sales))
        .route("/api/sales/by-platform", get(sales::sales_by_platform))
        .route("/api/sales/by-region", get(sales::sales_by_region))
        .route("/api/sales/pc-top20", get(sales::pc_top20))
        .route("/api/sales/top-publishers", get(sales::top_publishers))
        .route("/api/sales/by-region-top20", get(sales::region_top))
        .route("/api/sales/by-genre-top", get(sales::genre_top))
        // Filtering
        .route("/api/filters/meta", get(filters::filter_meta))
        .route("/api/games/filtered", get(filters::filtered_games))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
