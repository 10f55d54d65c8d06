//! Read-only access to the sales table
//!
//! Handlers depend on this trait rather than on the MySQL pool directly.
//! Each method is one unit of work: an implementation acquires a single
//! connection for the whole call and releases it before returning.

use crate::error::AppError;
use crate::sales::models::{
    FilterOptions, GameFilter, GenreLeader, GroupTotal, PublisherTitles, RegionTotals, SalesRecord,
};
use async_trait::async_trait;

/// Queries the reporting endpoints run against the `game_sales` table
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Round-trip to the store, used by the health check
    async fn ping(&self) -> Result<(), AppError>;

    /// All records ordered by worldwide sales, highest first, at most `limit`
    async fn top_records(&self, limit: u64) -> Result<Vec<SalesRecord>, AppError>;

    /// Records on `platform` ordered by worldwide sales, at most `limit`
    async fn top_records_for_platform(
        &self,
        platform: &str,
        limit: u64,
    ) -> Result<Vec<SalesRecord>, AppError>;

    /// Worldwide sales summed per platform, highest first
    async fn platform_totals(&self) -> Result<Vec<GroupTotal>, AppError>;

    /// Regional sales summed over the whole table
    async fn region_totals(&self) -> Result<RegionTotals, AppError>;

    /// The `publishers` best-selling publishers, each with up to `titles`
    /// of its best-selling records
    async fn top_publishers(
        &self,
        publishers: u64,
        titles: u64,
    ) -> Result<Vec<PublisherTitles>, AppError>;

    /// Records holding their genre's maximum worldwide sales, ascending by
    /// sales; ties produce several rows for one genre
    async fn genre_leaders(&self) -> Result<Vec<GenreLeader>, AppError>;

    /// Distinct non-empty genres, platforms and publishers
    async fn filter_options(&self) -> Result<FilterOptions, AppError>;

    /// Records matching all three filter fields, highest sales first
    async fn filtered_records(&self, filter: &GameFilter) -> Result<Vec<SalesRecord>, AppError>;
}
