//! Sales data access
//!
//! Row models, the store trait the handlers depend on, and its MySQL
//! implementation.

pub mod db;
pub mod models;
pub mod store;

pub use db::SalesDb;
pub use models::{
    FilterOptions, GameFilter, GenreLeader, GroupTotal, PublisherTitles, RegionTotals, SalesRecord,
    RECORD_COLUMN_NAMES, UNKNOWN_LABEL,
};
pub use models::widen_sales;
pub use store::SalesStore;
