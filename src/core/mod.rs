//! Price loading and aggregation

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod loader;
pub mod log;
pub mod price;
pub mod range;

// Re-export main types for cleaner imports
pub use dashboard::{Dashboard, DashboardViews, Query, Summary};
pub use loader::LoadError;
pub use price::{Currency, PricePoint, PriceRecord, PriceTable};
pub use range::{DateRange, EndBound};
