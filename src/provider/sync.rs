//! Draw ingestion write path.
//!
//! Storing a draw, recomputing its metrics and dropping stale aggregate
//! cache entries happen in one explicit sequence here, so every caller
//! that writes a draw goes through the same steps.

use log::{debug, info};

use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{Draw, DrawStatistics, LotteryProfile, ModelError, PrizeTier};
use crate::stats::{compute_metrics, StatsManager};

use super::{extract_matches, ProviderDraw, ResultsProvider};

/// Result of a single ingestion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The draw was new and has been persisted with its metrics.
    Created { number: u32 },
    /// The contest number was already stored; nothing was written.
    AlreadyExists { number: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("provider error: {0}")]
    Provider(anyhow::Error),
}

/// Persist one provider record.
///
/// Skips silently when the contest number is already stored. On the create
/// path the per-draw metrics are computed against the previous contest and
/// upserted, and the lottery's aggregate cache is invalidated.
pub async fn store_draw<R: FullRepository>(
    repo: &R,
    stats: &StatsManager,
    lottery: &LotteryProfile,
    record: ProviderDraw,
) -> Result<SyncOutcome, SyncError> {
    if repo.find_draw(lottery.id, record.number).await?.is_some() {
        debug!(
            "draw {} of {} already stored, skipping",
            record.number, lottery.slug
        );
        return Ok(SyncOutcome::AlreadyExists {
            number: record.number,
        });
    }

    let tiers = record
        .prize_tiers
        .into_iter()
        .map(|t| PrizeTier {
            tier: t.tier,
            matches: extract_matches(&t.description),
            description: t.description,
            winners_count: t.winners_count,
            prize_value: t.prize_value,
        })
        .collect();

    let draw = Draw::new(
        lottery,
        record.number,
        record.draw_date,
        record.numbers,
        record.draw_order,
        record.is_accumulated,
        record.accumulated_value,
        record.next_draw_estimate,
        tiers,
    )?;

    let draw = match repo.insert_draw(draw).await {
        Ok(draw) => draw,
        // A concurrent sync won the insert race.
        Err(err) if matches!(err, RepositoryError::Conflict { .. }) => {
            return Ok(SyncOutcome::AlreadyExists {
                number: record.number,
            });
        }
        Err(err) => return Err(err.into()),
    };

    recompute_statistics(repo, stats, lottery, &draw).await?;

    info!(
        "stored draw {} of {} ({} numbers)",
        draw.number,
        lottery.slug,
        draw.numbers.len()
    );
    Ok(SyncOutcome::Created {
        number: draw.number,
    })
}

/// Fetch the latest draw from the provider and persist it.
pub async fn sync_latest<R, P>(
    repo: &R,
    stats: &StatsManager,
    provider: &P,
    lottery: &LotteryProfile,
) -> Result<SyncOutcome, SyncError>
where
    R: FullRepository,
    P: ResultsProvider + ?Sized,
{
    let record = provider
        .latest_result(&lottery.api_identifier)
        .await
        .map_err(SyncError::Provider)?;
    store_draw(repo, stats, lottery, record).await
}

/// Recompute and upsert the metrics of a stored draw, then drop the
/// lottery's cached aggregates.
pub async fn recompute_statistics<R: FullRepository>(
    repo: &R,
    stats: &StatsManager,
    lottery: &LotteryProfile,
    draw: &Draw,
) -> Result<DrawStatistics, RepositoryError> {
    let previous = if draw.number > 1 {
        repo.find_draw(lottery.id, draw.number - 1).await?
    } else {
        None
    };
    let metrics = compute_metrics(
        &draw.numbers,
        previous.as_ref().map(|p| p.numbers.as_slice()),
    );
    repo.upsert_draw_statistics(draw.id, metrics).await?;
    stats.invalidate(&lottery.slug);
    Ok(metrics)
}

/// Recompute metrics for every stored draw of a lottery.
///
/// Used after backfills, where per-draw metrics that depend on the previous
/// contest may have been computed before that contest existed.
pub async fn recompute_all<R: FullRepository>(
    repo: &R,
    stats: &StatsManager,
    lottery: &LotteryProfile,
) -> Result<usize, RepositoryError> {
    let draws = repo.list_draws(lottery.id).await?;
    for draw in &draws {
        let previous = if draw.number > 1 {
            repo.find_draw(lottery.id, draw.number - 1).await?
        } else {
            None
        };
        let metrics = compute_metrics(
            &draw.numbers,
            previous.as_ref().map(|p| p.numbers.as_slice()),
        );
        repo.upsert_draw_statistics(draw.id, metrics).await?;
    }
    stats.invalidate(&lottery.slug);
    info!("recomputed metrics for {} draws of {}", draws.len(), lottery.slug);
    Ok(draws.len())
}
