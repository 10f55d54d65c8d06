//! Sales reporting API handlers
//!
//! Aggregate and ranking endpoints under `/api/sales`. Each handler validates
//! its parameters, runs one store operation, and shapes the rows into the
//! payload the dashboard charts expect.

use crate::api::response::ApiResponse;
use crate::api::utils::parse_count;
use crate::api::AppState;
use crate::error::AppError;
use crate::sales::{
    GenreLeader, GroupTotal, PublisherTitles, RegionTotals, SalesRecord, UNKNOWN_LABEL,
};
use axum::extract::{Query, State};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Default `n` for `/api/sales/top`
pub const DEFAULT_TOP_N: u64 = 10;
/// Default `n` for `/api/sales/by-region-top20`
pub const DEFAULT_REGION_TOP_N: u64 = 20;
/// Rows fetched per requested region slot, so the client can bucket by region
pub const REGION_OVERFETCH: u64 = 5;
/// Platform code ranked by `/api/sales/pc-top20`
pub const PC_PLATFORM: &str = "PC";
/// Rows returned by `/api/sales/pc-top20`
pub const PC_TOP_LIMIT: u64 = 20;
/// Publishers returned by `/api/sales/top-publishers`
pub const TOP_PUBLISHERS: u64 = 10;
/// Titles listed under each top publisher
pub const TITLES_PER_PUBLISHER: u64 = 3;
/// Region labels, in response order: North America, Europe, Japan, Other
pub const REGION_LABELS: [&str; 4] = ["北美", "欧洲", "日本", "其他"];

/// Entry of the global top-N ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopSale {
    /// Source rank
    pub rank: i32,
    /// Game title
    pub name: String,
    /// Platform code
    pub platform: String,
    /// Worldwide sales
    #[serde(rename = "Global_Sales")]
    pub global_sales: f64,
}

impl From<&SalesRecord> for TopSale {
    fn from(record: &SalesRecord) -> Self {
        Self {
            rank: record.rank,
            name: record.name(),
            platform: record.platform(),
            global_sales: record.global_sales(),
        }
    }
}

/// Per-platform totals as two parallel sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlatformSales {
    /// Platform labels, highest total first
    pub platforms: Vec<String>,
    /// Totals matching `platforms` index for index
    pub total_sales: Vec<f64>,
}

impl From<Vec<GroupTotal>> for PlatformSales {
    fn from(totals: Vec<GroupTotal>) -> Self {
        let (platforms, total_sales) = totals
            .into_iter()
            .map(|t| {
                (
                    t.label.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                    t.total.unwrap_or(0.0),
                )
            })
            .unzip();
        Self {
            platforms,
            total_sales,
        }
    }
}

/// One slice of the regional breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSales {
    /// Region label
    pub region: String,
    /// Summed sales for the region
    pub sales: f64,
}

/// Entry of the PC ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PcTopSale {
    /// Source rank
    pub rank: i32,
    /// Game title
    pub name: String,
    /// Publisher name
    pub publisher: String,
    /// Worldwide sales
    #[serde(rename = "Global_Sales")]
    pub global_sales: f64,
}

impl From<&SalesRecord> for PcTopSale {
    fn from(record: &SalesRecord) -> Self {
        Self {
            rank: record.rank,
            name: record.name(),
            publisher: record.publisher(),
            global_sales: record.global_sales(),
        }
    }
}

/// A title listed under its publisher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherGame {
    /// Game title
    pub name: String,
    /// Worldwide sales
    pub sales: f64,
    /// Platform code
    pub platform: String,
}

/// A top publisher with its best sellers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherGroup {
    /// Publisher name
    pub publisher: String,
    /// Summed worldwide sales
    pub total_sales: f64,
    /// Up to three best sellers, highest first
    pub top_games: Vec<PublisherGame>,
}

impl From<PublisherTitles> for PublisherGroup {
    fn from(group: PublisherTitles) -> Self {
        Self {
            publisher: group
                .publisher
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            total_sales: group.total_sales,
            top_games: group
                .titles
                .iter()
                .map(|r| PublisherGame {
                    name: r.name(),
                    sales: r.global_sales(),
                    platform: r.platform(),
                })
                .collect(),
        }
    }
}

/// Every column of a record, placeholders applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FullSale {
    /// Source rank
    pub rank: i32,
    /// Game title
    pub name: String,
    /// Platform code
    pub platform: String,
    /// Release year, if known
    pub year: Option<i32>,
    /// Genre label
    pub genre: String,
    /// Publisher name
    pub publisher: String,
    /// North America sales
    #[serde(rename = "NA_Sales")]
    pub na_sales: f64,
    /// Europe sales
    #[serde(rename = "EU_Sales")]
    pub eu_sales: f64,
    /// Japan sales
    #[serde(rename = "JP_Sales")]
    pub jp_sales: f64,
    /// Rest-of-world sales
    #[serde(rename = "Other_Sales")]
    pub other_sales: f64,
    /// Worldwide sales
    #[serde(rename = "Global_Sales")]
    pub global_sales: f64,
}

impl From<&SalesRecord> for FullSale {
    fn from(record: &SalesRecord) -> Self {
        Self {
            rank: record.rank,
            name: record.name(),
            platform: record.platform(),
            year: record.year,
            genre: record.genre(),
            publisher: record.publisher(),
            na_sales: record.na_sales.unwrap_or(0.0),
            eu_sales: record.eu_sales.unwrap_or(0.0),
            jp_sales: record.jp_sales.unwrap_or(0.0),
            other_sales: record.other_sales.unwrap_or(0.0),
            global_sales: record.global_sales(),
        }
    }
}

/// Best seller of one genre
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreTopSeller {
    /// Genre label
    pub genre: String,
    /// Title of the best seller
    pub top_game_name: String,
    /// Its worldwide sales
    pub sales: f64,
}

/// Four fixed regional entries; a missing sum becomes zero
pub fn region_breakdown(totals: &RegionTotals) -> Vec<RegionSales> {
    let sums = [totals.na, totals.eu, totals.jp, totals.other];
    REGION_LABELS
        .iter()
        .zip(sums)
        .map(|(label, sum)| RegionSales {
            region: label.to_string(),
            sales: sum.unwrap_or(0.0),
        })
        .collect()
}

/// One entry per genre, ascending by sales
///
/// When several records tie for a genre's maximum, the first one the store
/// returned is kept.
pub fn genre_top_sellers(leaders: Vec<GenreLeader>) -> Vec<GenreTopSeller> {
    let mut seen = HashSet::new();
    let mut sellers: Vec<GenreTopSeller> = leaders
        .into_iter()
        .filter(|l| !l.genre.is_empty() && seen.insert(l.genre.clone()))
        .map(|l| GenreTopSeller {
            top_game_name: l
                .name
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            sales: l.sales.unwrap_or(0.0),
            genre: l.genre,
        })
        .collect();
    sellers.sort_by(|a, b| a.sales.total_cmp(&b.sales));
    sellers
}

/// GET /api/sales/top - Top-N records by worldwide sales
pub async fn top_sales(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<Vec<TopSale>>, AppError> {
    let n = parse_count(params.get("n").map(String::as_str), DEFAULT_TOP_N)?;
    let records = state.store.top_records(n).await?;
    debug!(n, rows = records.len(), "Serving top sales");

    Ok(ApiResponse::success(
        records.iter().map(TopSale::from).collect(),
    ))
}

/// GET /api/sales/by-platform - Worldwide sales summed per platform
pub async fn sales_by_platform(
    State(state): State<AppState>,
) -> Result<ApiResponse<PlatformSales>, AppError> {
    let totals = state.store.platform_totals().await?;
    Ok(ApiResponse::success(PlatformSales::from(totals)))
}

/// GET /api/sales/by-region - Sales summed per region
pub async fn sales_by_region(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<RegionSales>>, AppError> {
    let totals = state.store.region_totals().await?;
    Ok(ApiResponse::success(region_breakdown(&totals)))
}

/// GET /api/sales/pc-top20 - Best-selling PC titles
pub async fn pc_top20(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PcTopSale>>, AppError> {
    let records = state
        .store
        .top_records_for_platform(PC_PLATFORM, PC_TOP_LIMIT)
        .await?;

    Ok(ApiResponse::success(
        records.iter().map(PcTopSale::from).collect(),
    ))
}

/// GET /api/sales/top-publishers - Top publishers and their top titles
pub async fn top_publishers(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PublisherGroup>>, AppError> {
    let groups = state
        .store
        .top_publishers(TOP_PUBLISHERS, TITLES_PER_PUBLISHER)
        .await?;

    Ok(ApiResponse::success(
        groups.into_iter().map(PublisherGroup::from).collect(),
    ))
}

/// GET /api/sales/by-region-top20 - Full records for client-side region bucketing
///
/// Fetches `n × 5` rows so every region has enough candidates.
pub async fn region_top(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<Vec<FullSale>>, AppError> {
    let n = parse_count(params.get("n").map(String::as_str), DEFAULT_REGION_TOP_N)?;
    let limit = n.saturating_mul(REGION_OVERFETCH);
    let records = state.store.top_records(limit).await?;
    debug!(n, limit, rows = records.len(), "Serving region top records");

    Ok(ApiResponse::success(
        records.iter().map(FullSale::from).collect(),
    ))
}

/// GET /api/sales/by-genre-top - Best seller of every genre
pub async fn genre_top(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<GenreTopSeller>>, AppError> {
    let leaders = state.store.genre_leaders().await?;
    Ok(ApiResponse::success(genre_top_sellers(leaders)))
}
