//! Ticket checking engine.
//!
//! Compares each bet line of a ticket against a draw, maps hit counts to
//! prize tiers and persists one aggregate result per `(ticket, draw)` pair.
//! Checking is idempotent: an existing result is returned untouched.

use chrono::Utc;
use log::info;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::api::{CheckResultId, DrawId, LotteryId, TicketId};
use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{BetLine, CheckResult, Draw, LineCheckResult, PrizeTier, Ticket};

/// Checking failed before any line was evaluated.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Client-facing validation failure: the ticket and the draw belong to
    /// different lotteries.
    #[error(
        "ticket {ticket} is for lottery {ticket_lottery} but draw {draw} is for lottery {draw_lottery}"
    )]
    LotteryMismatch {
        ticket: TicketId,
        ticket_lottery: LotteryId,
        draw: DrawId,
        draw_lottery: LotteryId,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CheckError {
    /// True when the failure is a missing draw, the 404-equivalent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(e) if e.is_not_found())
    }
}

/// Check a ticket against a specific draw.
///
/// Returns the stored result when the pair was already checked; otherwise
/// evaluates every line, aggregates, and persists the result with its line
/// results as one atomic repository call.
pub async fn check_ticket<R: FullRepository>(
    repo: &R,
    ticket: TicketId,
    draw: DrawId,
) -> Result<CheckResult, CheckError> {
    let ticket = repo.ticket_by_id(ticket).await?;
    let draw = repo.draw_by_id(draw).await?;
    check(repo, &ticket, &draw).await
}

async fn check<R: FullRepository>(
    repo: &R,
    ticket: &Ticket,
    draw: &Draw,
) -> Result<CheckResult, CheckError> {
    if ticket.lottery_id != draw.lottery_id {
        return Err(CheckError::LotteryMismatch {
            ticket: ticket.id,
            ticket_lottery: ticket.lottery_id,
            draw: draw.id,
            draw_lottery: draw.lottery_id,
        });
    }

    if let Some(existing) = repo.find_check_result(ticket.id, draw.id).await? {
        info!(
            "ticket {} already checked against draw {}",
            ticket.id, draw.number
        );
        return Ok(existing);
    }

    let tiers = prize_tier_map(draw);
    let line_results: Vec<LineCheckResult> = ticket
        .lines
        .iter()
        .map(|line| check_line(line, &draw.numbers, &tiers))
        .collect();

    let total_prize: Decimal = line_results.iter().map(|r| r.prize_value).sum();
    let best_hits = line_results.iter().map(|r| r.hits).max().unwrap_or(0);
    let winning_lines_count = line_results.iter().filter(|r| r.prize_tier.is_some()).count() as u32;
    let best_tier = line_results.iter().filter_map(|r| r.prize_tier).min();

    let result = repo
        .insert_check_result(CheckResult {
            id: CheckResultId(0),
            ticket_id: ticket.id,
            draw_id: draw.id,
            checked_at: Utc::now(),
            total_prize,
            best_tier,
            best_hits,
            winning_lines_count,
            line_results,
        })
        .await?;

    info!(
        "checked ticket {} against draw {}: {} max hits, {} winning lines, {} total prize",
        ticket.id, draw.number, best_hits, winning_lines_count, total_prize
    );
    Ok(result)
}

/// Check a ticket against the latest draw of its lottery.
///
/// Fails with a not-found error when the lottery has no draws.
pub async fn check_latest<R: FullRepository>(
    repo: &R,
    ticket: TicketId,
) -> Result<CheckResult, CheckError> {
    let ticket = repo.ticket_by_id(ticket).await?;
    let draw = repo.latest_draw(ticket.lottery_id).await?;
    check(repo, &ticket, &draw).await
}

/// Check a ticket against a specific contest number.
///
/// Fails with a not-found error when no such draw exists for the ticket's
/// lottery.
pub async fn check_by_draw_number<R: FullRepository>(
    repo: &R,
    ticket: TicketId,
    number: u32,
) -> Result<CheckResult, CheckError> {
    let ticket = repo.ticket_by_id(ticket).await?;
    let draw = repo.draw_by_number(ticket.lottery_id, number).await?;
    check(repo, &ticket, &draw).await
}

/// Index the draw's tiers by required hit count. Tiers without a numeric
/// match count (accumulation brackets) are left out.
fn prize_tier_map(draw: &Draw) -> HashMap<u8, &PrizeTier> {
    draw.prize_tiers
        .iter()
        .filter_map(|tier| tier.matches.map(|m| (m, tier)))
        .collect()
}

fn check_line(
    line: &BetLine,
    draw_numbers: &[u8],
    tiers: &HashMap<u8, &PrizeTier>,
) -> LineCheckResult {
    let mut hit_numbers: Vec<u8> = line
        .numbers
        .iter()
        .copied()
        .filter(|n| draw_numbers.contains(n))
        .collect();
    hit_numbers.sort_unstable();
    let hits = hit_numbers.len() as u8;

    let tier = tiers.get(&hits);
    LineCheckResult {
        bet_line_id: line.id,
        hits,
        hit_numbers,
        prize_tier: tier.map(|t| t.tier),
        prize_value: tier.map(|t| t.prize_value).unwrap_or(Decimal::ZERO),
    }
}
