//! Draw statistics: metric computation, caching and aggregation.

pub mod aggregator;
pub mod cache;
pub mod calculator;

pub use aggregator::StatsManager;
pub use cache::StatsCache;
pub use calculator::compute_metrics;
