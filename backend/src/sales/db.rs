//! Sales database operations
//!
//! MySQL implementation of [`SalesStore`]. Every operation acquires one
//! pooled connection up front and runs all of its statements on it; the
//! connection goes back to the pool when it drops, whichever way the
//! operation exits.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::sales::models::{
    FilterOptions, GameFilter, GenreLeader, GroupTotal, PublisherTitles, RegionTotals, SalesRecord,
    RECORD_COLUMN_NAMES,
};
use crate::sales::store::SalesStore;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnection, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlPool};
use tracing::{debug, info};

/// Backticked select list for full-record queries (`Rank` is a reserved word)
fn record_columns() -> String {
    RECORD_COLUMN_NAMES
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn top_records_sql() -> String {
    format!(
        "SELECT {} FROM game_sales ORDER BY Global_Sales DESC LIMIT ?",
        record_columns()
    )
}

fn platform_records_sql() -> String {
    format!(
        "SELECT {} FROM game_sales WHERE Platform = ? ORDER BY Global_Sales DESC LIMIT ?",
        record_columns()
    )
}

// `<=>` so a NULL publisher group still finds its titles
fn publisher_titles_sql() -> String {
    format!(
        "SELECT {} FROM game_sales WHERE Publisher <=> ? ORDER BY Global_Sales DESC LIMIT ?",
        record_columns()
    )
}

fn filtered_records_sql() -> String {
    format!(
        "SELECT {} FROM game_sales \
         WHERE LOWER(TRIM(Genre)) = ? AND LOWER(TRIM(Platform)) = ? \
           AND LOWER(TRIM(Publisher)) = ? \
         ORDER BY Global_Sales DESC",
        record_columns()
    )
}

fn distinct_values_sql(column: &str) -> String {
    format!(
        "SELECT DISTINCT {col} FROM game_sales \
         WHERE {col} IS NOT NULL AND {col} <> '' ORDER BY {col}",
        col = column
    )
}

/// Database connection pool for sales reporting
pub struct SalesDb {
    pool: MySqlPool,
}

impl SalesDb {
    /// Create a lazily-connecting pool
    ///
    /// No connection is opened here, so the server starts even when MySQL is
    /// unreachable; each request then reports the failure on its own.
    pub fn new(config: &DatabaseConfig) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(config.connect_options());

        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Configured MySQL pool"
        );

        Self { pool }
    }

    async fn acquire(&self) -> Result<PoolConnection<MySql>, AppError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::Connection(e.to_string()))
    }

    async fn distinct_values(
        conn: &mut MySqlConnection,
        column: &str,
    ) -> Result<Vec<String>, AppError> {
        let values: Vec<String> = sqlx::query_scalar(&distinct_values_sql(column))
            .fetch_all(conn)
            .await?;
        Ok(values)
    }
}

#[async_trait]
impl SalesStore for SalesDb {
    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    async fn top_records(&self, limit: u64) -> Result<Vec<SalesRecord>, AppError> {
        let mut conn = self.acquire().await?;
        let records = sqlx::query_as::<_, SalesRecord>(&top_records_sql())
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        debug!(limit, rows = records.len(), "Fetched top records");
        Ok(records)
    }

    async fn top_records_for_platform(
        &self,
        platform: &str,
        limit: u64,
    ) -> Result<Vec<SalesRecord>, AppError> {
        let mut conn = self.acquire().await?;
        let records = sqlx::query_as::<_, SalesRecord>(&platform_records_sql())
            .bind(platform)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        debug!(platform, limit, rows = records.len(), "Fetched platform top records");
        Ok(records)
    }

    async fn platform_totals(&self) -> Result<Vec<GroupTotal>, AppError> {
        let mut conn = self.acquire().await?;
        let totals = sqlx::query_as::<_, GroupTotal>(
            "SELECT Platform AS label, SUM(Global_Sales) AS total FROM game_sales \
             GROUP BY Platform ORDER BY total DESC",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(totals)
    }

    async fn region_totals(&self) -> Result<RegionTotals, AppError> {
        let mut conn = self.acquire().await?;
        let totals = sqlx::query_as::<_, RegionTotals>(
            "SELECT SUM(NA_Sales) AS na, SUM(EU_Sales) AS eu, \
             SUM(JP_Sales) AS jp, SUM(Other_Sales) AS other FROM game_sales",
        )
        .fetch_optional(&mut *conn)
        .await?;

        Ok(totals.unwrap_or_default())
    }

    async fn top_publishers(
        &self,
        publishers: u64,
        titles: u64,
    ) -> Result<Vec<PublisherTitles>, AppError> {
        let mut conn = self.acquire().await?;
        let leaders = sqlx::query_as::<_, GroupTotal>(
            "SELECT Publisher AS label, SUM(Global_Sales) AS total FROM game_sales \
             GROUP BY Publisher ORDER BY total DESC LIMIT ?",
        )
        .bind(publishers)
        .fetch_all(&mut *conn)
        .await?;

        // One follow-up query per publisher; the count is small and fixed.
        let titles_sql = publisher_titles_sql();
        let mut result = Vec::with_capacity(leaders.len());
        for leader in leaders {
            let records = sqlx::query_as::<_, SalesRecord>(&titles_sql)
                .bind(leader.label.as_deref())
                .bind(titles)
                .fetch_all(&mut *conn)
                .await?;

            result.push(PublisherTitles {
                publisher: leader.label,
                total_sales: leader.total.unwrap_or(0.0),
                titles: records,
            });
        }

        debug!(publishers = result.len(), "Fetched top publishers");
        Ok(result)
    }

    async fn genre_leaders(&self) -> Result<Vec<GenreLeader>, AppError> {
        let mut conn = self.acquire().await?;
        let leaders = sqlx::query_as::<_, GenreLeader>(
            "SELECT g.Genre AS genre, g.Name AS name, g.Global_Sales AS sales \
             FROM game_sales g \
             JOIN (SELECT Genre, MAX(Global_Sales) AS max_sales FROM game_sales \
                   WHERE Genre IS NOT NULL AND Genre <> '' GROUP BY Genre) m \
               ON g.Genre = m.Genre AND g.Global_Sales = m.max_sales \
             ORDER BY sales ASC",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(leaders)
    }

    async fn filter_options(&self) -> Result<FilterOptions, AppError> {
        let mut conn = self.acquire().await?;
        Ok(FilterOptions {
            genres: Self::distinct_values(&mut conn, "Genre").await?,
            platforms: Self::distinct_values(&mut conn, "Platform").await?,
            publishers: Self::distinct_values(&mut conn, "Publisher").await?,
        })
    }

    async fn filtered_records(&self, filter: &GameFilter) -> Result<Vec<SalesRecord>, AppError> {
        let mut conn = self.acquire().await?;
        let records = sqlx::query_as::<_, SalesRecord>(&filtered_records_sql())
            .bind(&filter.genre)
            .bind(&filter.platform)
            .bind(&filter.publisher)
            .fetch_all(&mut *conn)
            .await?;

        debug!(?filter, rows = records.len(), "Fetched filtered records");
        Ok(records)
    }
}
