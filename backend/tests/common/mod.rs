//! Shared fixtures for the API integration tests
//!
//! `FixtureStore` answers the `SalesStore` queries from an in-memory table
//! with the same ordering and grouping rules the MySQL queries use.

#![allow(dead_code)]

use async_trait::async_trait;
use game_sales_backend::api::AppState;
use game_sales_backend::error::AppError;
use game_sales_backend::sales::{
    FilterOptions, GameFilter, GenreLeader, GroupTotal, PublisherTitles, RegionTotals, SalesRecord,
    SalesStore,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory `game_sales` table
#[derive(Default)]
pub struct FixtureStore {
    records: Vec<SalesRecord>,
    calls: AtomicUsize,
}

impl FixtureStore {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of store operations performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn by_sales_desc<'a>(records: impl Iterator<Item = &'a SalesRecord>) -> Vec<SalesRecord> {
        let mut sorted: Vec<SalesRecord> = records.cloned().collect();
        sorted.sort_by(|a, b| b.global_sales().total_cmp(&a.global_sales()));
        sorted
    }

    fn totals_by<F>(&self, key: F) -> Vec<GroupTotal>
    where
        F: Fn(&SalesRecord) -> Option<String>,
    {
        let mut groups: BTreeMap<Option<String>, f64> = BTreeMap::new();
        for record in &self.records {
            *groups.entry(key(record)).or_insert(0.0) += record.global_sales();
        }
        let mut totals: Vec<GroupTotal> = groups
            .into_iter()
            .map(|(label, total)| GroupTotal {
                label,
                total: Some(total),
            })
            .collect();
        totals.sort_by(|a, b| b.total.unwrap_or(0.0).total_cmp(&a.total.unwrap_or(0.0)));
        totals
    }

    fn distinct<F>(&self, key: F) -> Vec<String>
    where
        F: Fn(&SalesRecord) -> Option<String>,
    {
        self.records
            .iter()
            .filter_map(key)
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// SQL SUM over zero rows is NULL.
fn sum<F: Fn(&SalesRecord) -> Option<f64>>(records: &[SalesRecord], f: F) -> Option<f64> {
    if records.is_empty() {
        None
    } else {
        Some(records.iter().map(|r| f(r).unwrap_or(0.0)).sum())
    }
}

// Mirrors `LOWER(TRIM(col)) = ?` on all three columns; NULL never matches.
fn matches_filter(filter: &GameFilter, record: &SalesRecord) -> bool {
    let field = |value: &Option<String>, wanted: &str| {
        value
            .as_deref()
            .is_some_and(|v| v.trim().to_lowercase() == wanted)
    };
    field(&record.genre, &filter.genre)
        && field(&record.platform, &filter.platform)
        && field(&record.publisher, &filter.publisher)
}

#[async_trait]
impl SalesStore for FixtureStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.touch();
        Ok(())
    }

    async fn top_records(&self, limit: u64) -> Result<Vec<SalesRecord>, AppError> {
        self.touch();
        let mut sorted = Self::by_sales_desc(self.records.iter());
        sorted.truncate(limit as usize);
        Ok(sorted)
    }

    async fn top_records_for_platform(
        &self,
        platform: &str,
        limit: u64,
    ) -> Result<Vec<SalesRecord>, AppError> {
        self.touch();
        let mut sorted = Self::by_sales_desc(
            self.records
                .iter()
                .filter(|r| r.platform.as_deref() == Some(platform)),
        );
        sorted.truncate(limit as usize);
        Ok(sorted)
    }

    async fn platform_totals(&self) -> Result<Vec<GroupTotal>, AppError> {
        self.touch();
        Ok(self.totals_by(|r| r.platform.clone()))
    }

    async fn region_totals(&self) -> Result<RegionTotals, AppError> {
        self.touch();
        Ok(RegionTotals {
            na: sum(&self.records, |r| r.na_sales),
            eu: sum(&self.records, |r| r.eu_sales),
            jp: sum(&self.records, |r| r.jp_sales),
            other: sum(&self.records, |r| r.other_sales),
        })
    }

    async fn top_publishers(
        &self,
        publishers: u64,
        titles: u64,
    ) -> Result<Vec<PublisherTitles>, AppError> {
        self.touch();
        let mut leaders = self.totals_by(|r| r.publisher.clone());
        leaders.truncate(publishers as usize);
        Ok(leaders
            .into_iter()
            .map(|leader| {
                let mut games =
                    Self::by_sales_desc(self.records.iter().filter(|r| r.publisher == leader.label));
                games.truncate(titles as usize);
                PublisherTitles {
                    publisher: leader.label,
                    total_sales: leader.total.unwrap_or(0.0),
                    titles: games,
                }
            })
            .collect())
    }

    async fn genre_leaders(&self) -> Result<Vec<GenreLeader>, AppError> {
        self.touch();
        let mut best: BTreeMap<String, f64> = BTreeMap::new();
        for record in &self.records {
            if let Some(genre) = record.genre.as_ref().filter(|g| !g.is_empty()) {
                let entry = best.entry(genre.clone()).or_insert(f64::MIN);
                if record.global_sales() > *entry {
                    *entry = record.global_sales();
                }
            }
        }
        let mut leaders: Vec<GenreLeader> = self
            .records
            .iter()
            .filter_map(|r| {
                let genre = r.genre.clone()?;
                let sales = r.global_sales();
                (best.get(&genre) == Some(&sales)).then(|| GenreLeader {
                    genre,
                    name: r.name.clone(),
                    sales: Some(sales),
                })
            })
            .collect();
        leaders.sort_by(|a, b| a.sales.unwrap_or(0.0).total_cmp(&b.sales.unwrap_or(0.0)));
        Ok(leaders)
    }

    async fn filter_options(&self) -> Result<FilterOptions, AppError> {
        self.touch();
        Ok(FilterOptions {
            genres: self.distinct(|r| r.genre.clone()),
            platforms: self.distinct(|r| r.platform.clone()),
            publishers: self.distinct(|r| r.publisher.clone()),
        })
    }

    async fn filtered_records(&self, filter: &GameFilter) -> Result<Vec<SalesRecord>, AppError> {
        self.touch();
        Ok(Self::by_sales_desc(
            self.records.iter().filter(|r| matches_filter(filter, r)),
        ))
    }
}

/// Store whose every operation fails to connect
pub struct UnreachableStore;

fn unreachable_error() -> AppError {
    AppError::from(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl SalesStore for UnreachableStore {
    async fn ping(&self) -> Result<(), AppError> {
        Err(unreachable_error())
    }

    async fn top_records(&self, _limit: u64) -> Result<Vec<SalesRecord>, AppError> {
        Err(unreachable_error())
    }

    async fn top_records_for_platform(
        &self,
        _platform: &str,
        _limit: u64,
    ) -> Result<Vec<SalesRecord>, AppError> {
        Err(unreachable_error())
    }

    async fn platform_totals(&self) -> Result<Vec<GroupTotal>, AppError> {
        Err(unreachable_error())
    }

    async fn region_totals(&self) -> Result<RegionTotals, AppError> {
        Err(unreachable_error())
    }

    async fn top_publishers(
        &self,
        _publishers: u64,
        _titles: u64,
    ) -> Result<Vec<PublisherTitles>, AppError> {
        Err(unreachable_error())
    }

    async fn genre_leaders(&self) -> Result<Vec<GenreLeader>, AppError> {
        Err(unreachable_error())
    }

    async fn filter_options(&self) -> Result<FilterOptions, AppError> {
        Err(unreachable_error())
    }

    async fn filtered_records(&self, _filter: &GameFilter) -> Result<Vec<SalesRecord>, AppError> {
        Err(unreachable_error())
    }
}

/// Build a record with the fields most tests care about
pub fn record(
    rank: i32,
    name: &str,
    platform: &str,
    genre: &str,
    publisher: &str,
    global_sales: f64,
) -> SalesRecord {
    SalesRecord {
        rank,
        name: Some(name.to_string()),
        platform: Some(platform.to_string()),
        year: Some(2000 + rank),
        genre: Some(genre.to_string()),
        publisher: Some(publisher.to_string()),
        na_sales: Some(global_sales * 0.5),
        eu_sales: Some(global_sales * 0.3),
        jp_sales: Some(global_sales * 0.1),
        other_sales: Some(global_sales * 0.1),
        global_sales: Some(global_sales),
    }
}

/// A small catalogue spanning several platforms, genres and publishers
pub fn catalogue() -> Vec<SalesRecord> {
    let mut records = vec![
        record(1, "Wii Sports", "Wii", "Sports", "Nintendo", 82.74),
        record(2, "Super Mario Bros.", "NES", "Platform", "Nintendo", 40.24),
        record(3, "Mario Kart Wii", "Wii", "Racing", "Nintendo", 35.82),
        record(4, "Grand Theft Auto V", "PS3", "Action", "Take-Two Interactive", 21.40),
        record(5, "The Sims 3", "PC", "Simulation", "Electronic Arts", 6.42),
        record(6, "World of Warcraft", "PC", "Role-Playing", "Activision", 6.28),
        record(7, "Diablo III", "PC", "Role-Playing", "Activision", 5.20),
        record(8, "StarCraft II", "PC", "Strategy", "Activision", 4.83),
        record(9, "Call of Duty: Black Ops", "PC", "Shooter", "Activision", 1.83),
        record(10, "FIFA 15", "PS4", "Sports", "Electronic Arts", 6.08),
        record(11, "Half-Life 2", "PC", "Shooter", "Valve", 1.83),
        record(12, "Tetris", "GB", "Puzzle", "Nintendo", 30.26),
        record(13, "Dr. Mario", "GB", "Puzzle", "Nintendo", 30.26),
    ];
    for i in 0..16 {
        records.push(record(
            100 + i,
            &format!("Indie Title {}", i),
            "PC",
            "Adventure",
            &format!("Studio {}", i),
            0.5 - f64::from(i) * 0.01,
        ));
    }
    records
}

/// Handler state around an in-memory catalogue
pub fn fixture_state(records: Vec<SalesRecord>) -> (AppState, Arc<FixtureStore>) {
    let store = Arc::new(FixtureStore::new(records));
    (AppState::new(store.clone()), store)
}

/// Handler state whose store cannot connect
pub fn unreachable_state() -> AppState {
    AppState::new(Arc::new(UnreachableStore))
}
