//! Aggregation of per-draw statistics over a filtered window.

use log::debug;
use std::collections::BTreeMap;

use super::cache::StatsCache;
use crate::db::repository::{DrawFilter, FullRepository, RepositoryResult};
use crate::models::{
    AggregateReport, Draw, DrawStatistics, MetricAverages, NumberFrequency, StatsQuery,
};

/// Cache-backed aggregator over persisted draw statistics.
#[derive(Clone, Default)]
pub struct StatsManager {
    cache: StatsCache,
}

impl StatsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate statistics for the draws selected by `query`.
    ///
    /// Returns `Ok(None)` when the selection is empty (unknown or inactive
    /// lottery, or no draw matches the filters). Results are cached for
    /// [`StatsCache::TTL_SECONDS`] under a key derived from the query.
    pub async fn aggregated_stats<R: FullRepository>(
        &self,
        repo: &R,
        query: &StatsQuery,
    ) -> RepositoryResult<Option<AggregateReport>> {
        let key = cache_key(query);
        if let Some(cached) = self.cache.get(&key) {
            debug!("stats cache hit for {}", key);
            return Ok(Some(cached));
        }

        let draws = repo
            .draws_filtered(&DrawFilter {
                lottery_slug: query.lottery_slug.clone(),
                start_date: query.start_date,
                end_date: query.end_date,
                window: query.window,
            })
            .await?;
        if draws.is_empty() {
            return Ok(None);
        }

        let mut with_stats = Vec::with_capacity(draws.len());
        for draw in draws {
            let stats = repo.draw_statistics(draw.id).await?;
            with_stats.push((draw, stats));
        }

        let report = aggregate(&with_stats);
        self.cache.set(key, report.clone());
        Ok(Some(report))
    }

    /// Drop every cached aggregate of one lottery. Called from the draw
    /// write path whenever a draw or its statistics change.
    pub fn invalidate(&self, lottery_slug: &str) {
        self.cache.invalidate_prefix(&format!("stats:{}", lottery_slug));
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &StatsCache {
        &self.cache
    }
}

fn cache_key(query: &StatsQuery) -> String {
    let mut parts = vec![format!("stats:{}", query.lottery_slug)];
    if let Some(window) = query.window {
        parts.push(format!("w{}", window));
    }
    if let Some(start) = query.start_date {
        parts.push(format!("s{}", start));
    }
    if let Some(end) = query.end_date {
        parts.push(format!("e{}", end));
    }
    parts.join(":")
}

/// Frequency table and metric means over the selected draws.
///
/// Missing statistics records contribute nothing to the averages but their
/// draw still counts toward `total_analyzed` and the frequency table.
fn aggregate(draws: &[(Draw, Option<DrawStatistics>)]) -> AggregateReport {
    let total = draws.len();

    // BTreeMap keeps equally frequent numbers in ascending order after the
    // stable sort by count below.
    let mut occurrences: BTreeMap<u8, usize> = BTreeMap::new();
    let mut sums = MetricAverages::default();

    for (draw, stats) in draws {
        for &n in &draw.numbers {
            *occurrences.entry(n).or_insert(0) += 1;
        }
        if let Some(stats) = stats {
            sums.sum += stats.sum as f64;
            sums.range += stats.range as f64;
            sums.evens += stats.even_count as f64;
            sums.odds += stats.odd_count as f64;
            sums.primes += stats.prime_count as f64;
            sums.consecutive += stats.consecutive_count as f64;
            sums.repeated += stats.repeated_from_previous as f64;
        }
    }

    let mut number_frequencies: Vec<NumberFrequency> = occurrences
        .into_iter()
        .map(|(number, count)| NumberFrequency {
            number,
            count,
            frequency: round_to(count as f64 / total as f64, 4),
        })
        .collect();
    number_frequencies.sort_by(|a, b| b.count.cmp(&a.count));

    let divisor = total as f64;
    AggregateReport {
        total_analyzed: total,
        number_frequencies,
        averages: MetricAverages {
            sum: round_to(sums.sum / divisor, 2),
            range: round_to(sums.range / divisor, 2),
            evens: round_to(sums.evens / divisor, 2),
            odds: round_to(sums.odds / divisor, 2),
            primes: round_to(sums.primes / divisor, 2),
            consecutive: round_to(sums.consecutive / divisor, 2),
            repeated: round_to(sums.repeated / divisor, 2),
        },
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
