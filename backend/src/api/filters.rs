//! Filter API handlers
//!
//! Selector metadata for the dashboard and the genre/platform/publisher
//! filtered game list.

use crate::api::response::ApiResponse;
use crate::api::utils::require_param;
use crate::api::AppState;
use crate::error::AppError;
use crate::sales::{FilterOptions, GameFilter, SalesRecord};
use axum::extract::{Query, State};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A record matching the requested filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilteredGame {
    /// Source rank
    pub rank: i32,
    /// Game title
    pub name: String,
    /// Platform code
    pub platform: String,
    /// Publisher name
    pub publisher: String,
    /// Genre label
    pub genre: String,
    /// Worldwide sales
    #[serde(rename = "Global_Sales")]
    pub global_sales: f64,
}

impl From<&SalesRecord> for FilteredGame {
    fn from(record: &SalesRecord) -> Self {
        Self {
            rank: record.rank,
            name: record.name(),
            platform: record.platform(),
            publisher: record.publisher(),
            genre: record.genre(),
            global_sales: record.global_sales(),
        }
    }
}

/// GET /api/filters/meta - Distinct values for each filterable column
pub async fn filter_meta(
    State(state): State<AppState>,
) -> Result<ApiResponse<FilterOptions>, AppError> {
    let options = state.store.filter_options().await?;
    debug!(
        genres = options.genres.len(),
        platforms = options.platforms.len(),
        publishers = options.publishers.len(),
        "Serving filter metadata"
    );
    Ok(ApiResponse::success(options))
}

/// GET /api/games/filtered - Games matching genre, platform and publisher
///
/// All three parameters are required; matching ignores case and
/// surrounding whitespace.
pub async fn filtered_games(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<Vec<FilteredGame>>, AppError> {
    let genre = require_param("genre", params.get("genre").map(String::as_str))?;
    let platform = require_param("platform", params.get("platform").map(String::as_str))?;
    let publisher = require_param("publisher", params.get("publisher").map(String::as_str))?;

    let filter = GameFilter::new(genre, platform, publisher);

    let records = state.store.filtered_records(&filter).await?;
    debug!(?filter, rows = records.len(), "Serving filtered games");

    Ok(ApiResponse::success(
        records.iter().map(FilteredGame::from).collect(),
    ))
}
