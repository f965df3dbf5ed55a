//! Per-draw statistics and aggregate report types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric properties of one draw, derived from its numbers and the
/// immediately preceding contest. Persisted alongside the draw so that
/// aggregation never recomputes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawStatistics {
    pub sum: u32,
    pub even_count: u8,
    pub odd_count: u8,
    /// Difference between the largest and smallest drawn number.
    pub range: u32,
    pub prime_count: u8,
    /// Adjacent pairs differing by exactly 1, counted on the sorted numbers.
    pub consecutive_count: u8,
    /// Overlap with the previous contest; 0 when there is no previous draw.
    pub repeated_from_previous: u8,
}

/// Occurrence of one number across the analyzed draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: usize,
    /// `count / total_analyzed`, rounded to 4 decimal places.
    pub frequency: f64,
}

/// Arithmetic means of the per-draw statistics, rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricAverages {
    pub sum: f64,
    pub range: f64,
    pub evens: f64,
    pub odds: f64,
    pub primes: f64,
    pub consecutive: f64,
    pub repeated: f64,
}

/// Aggregated statistics over a filtered window of draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub total_analyzed: usize,
    /// Ordered by descending count; equally frequent numbers come out in
    /// ascending number order.
    pub number_frequencies: Vec<NumberFrequency>,
    pub averages: MetricAverages,
}

/// Selection parameters for [`AggregateReport`] computation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsQuery {
    pub lottery_slug: String,
    /// Only the most recent `window` draws are considered when set.
    pub window: Option<usize>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl StatsQuery {
    pub fn for_lottery(slug: impl Into<String>) -> Self {
        Self {
            lottery_slug: slug.into(),
            ..Default::default()
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}
