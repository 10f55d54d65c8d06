//! Sales data models
//!
//! Row types read from the `game_sales` table. Column names are mapped onto
//! Rust fields here and nowhere else; callers never look up columns by name.

use serde::Serialize;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, FromRow, Row, TypeInfo};

/// Label substituted for absent string columns
pub const UNKNOWN_LABEL: &str = "未知";

/// `game_sales` columns in `SalesRecord` field order
pub const RECORD_COLUMN_NAMES: [&str; 11] = [
    "Rank",
    "Name",
    "Platform",
    "Year",
    "Genre",
    "Publisher",
    "NA_Sales",
    "EU_Sales",
    "JP_Sales",
    "Other_Sales",
    "Global_Sales",
];

/// Widen a single-precision sales figure through its shortest decimal form
///
/// `82.74f32 as f64` is `82.73999786376953`; this yields `82.74`.
pub fn widen_sales(value: f32) -> f64 {
    value
        .to_string()
        .parse()
        .unwrap_or_else(|_| f64::from(value))
}

/// Read a nullable sales column stored as either FLOAT or DOUBLE
fn sales_column(row: &MySqlRow, column: &str) -> Result<Option<f64>, sqlx::Error> {
    if row.try_column(column)?.type_info().name() == "FLOAT" {
        Ok(row.try_get::<Option<f32>, _>(column)?.map(widen_sales))
    } else {
        row.try_get(column)
    }
}

/// One row of the `game_sales` table
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// Source ranking, unique
    pub rank: i32,
    /// Game title
    pub name: Option<String>,
    /// Platform code, e.g. "PC" or "PS4"
    pub platform: Option<String>,
    /// Release year
    pub year: Option<i32>,
    /// Genre label
    pub genre: Option<String>,
    /// Publisher name
    pub publisher: Option<String>,
    /// North America sales, millions
    pub na_sales: Option<f64>,
    /// Europe sales, millions
    pub eu_sales: Option<f64>,
    /// Japan sales, millions
    pub jp_sales: Option<f64>,
    /// Rest-of-world sales, millions
    pub other_sales: Option<f64>,
    /// Worldwide sales, millions
    pub global_sales: Option<f64>,
}

impl<'r> FromRow<'r, MySqlRow> for SalesRecord {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let [rank, name, platform, year, genre, publisher, na, eu, jp, other, global] =
            RECORD_COLUMN_NAMES;
        Ok(Self {
            rank: row.try_get(rank)?,
            name: row.try_get(name)?,
            platform: row.try_get(platform)?,
            year: row.try_get(year)?,
            genre: row.try_get(genre)?,
            publisher: row.try_get(publisher)?,
            na_sales: sales_column(row, na)?,
            eu_sales: sales_column(row, eu)?,
            jp_sales: sales_column(row, jp)?,
            other_sales: sales_column(row, other)?,
            global_sales: sales_column(row, global)?,
        })
    }
}

impl SalesRecord {
    /// Title, or the unknown placeholder
    pub fn name(&self) -> String {
        label(&self.name)
    }

    /// Platform, or the unknown placeholder
    pub fn platform(&self) -> String {
        label(&self.platform)
    }

    /// Genre, or the unknown placeholder
    pub fn genre(&self) -> String {
        label(&self.genre)
    }

    /// Publisher, or the unknown placeholder
    pub fn publisher(&self) -> String {
        label(&self.publisher)
    }

    /// Worldwide sales, zero when absent
    pub fn global_sales(&self) -> f64 {
        self.global_sales.unwrap_or(0.0)
    }
}

/// A `SUM(Global_Sales)` grouped by one column
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct GroupTotal {
    /// Group key (platform or publisher)
    pub label: Option<String>,
    /// Summed worldwide sales
    pub total: Option<f64>,
}

/// Whole-table sums of the four regional columns
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct RegionTotals {
    /// North America
    pub na: Option<f64>,
    /// Europe
    pub eu: Option<f64>,
    /// Japan
    pub jp: Option<f64>,
    /// Everywhere else
    pub other: Option<f64>,
}

/// A record holding the maximum worldwide sales of its genre
///
/// Several rows may share a genre when their sales tie.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreLeader {
    /// Genre label, never empty
    pub genre: String,
    /// Title of the best seller
    pub name: Option<String>,
    /// Its worldwide sales
    pub sales: Option<f64>,
}

impl<'r> FromRow<'r, MySqlRow> for GenreLeader {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            genre: row.try_get("genre")?,
            name: row.try_get("name")?,
            sales: sales_column(row, "sales")?,
        })
    }
}

/// A top publisher together with its best-selling titles
#[derive(Debug, Clone, PartialEq)]
pub struct PublisherTitles {
    /// Publisher name as stored
    pub publisher: Option<String>,
    /// Summed worldwide sales across the publisher's catalogue
    pub total_sales: f64,
    /// Best sellers, highest first
    pub titles: Vec<SalesRecord>,
}

/// Distinct values available to the dashboard's selectors
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Non-empty genres, alphabetical
    pub genres: Vec<String>,
    /// Non-empty platforms, alphabetical
    pub platforms: Vec<String>,
    /// Non-empty publishers, alphabetical
    pub publishers: Vec<String>,
}

/// Exact-match criteria for the filtered games query
///
/// Values are stored trimmed and lowercased so the store compares them
/// against `LOWER(TRIM(column))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFilter {
    /// Normalized genre
    pub genre: String,
    /// Normalized platform
    pub platform: String,
    /// Normalized publisher
    pub publisher: String,
}

impl GameFilter {
    /// Normalize already-validated parameters
    pub fn new(genre: &str, platform: &str, publisher: &str) -> Self {
        Self {
            genre: normalize(genre),
            platform: normalize(platform),
            publisher: normalize(publisher),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn label(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}
