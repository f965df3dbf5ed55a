//! User tickets, bet lines and check results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{LotteryProfile, ModelError};
use crate::api::{BetLineId, CheckResultId, DrawId, TicketId};

/// One combination of numbers wagered within a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLine {
    pub id: BetLineId,
    pub numbers: Vec<u8>,
    /// Display position inside the ticket, also the persistence tie-break.
    pub order: u32,
}

impl BetLine {
    /// Validate a line against the ticket's lottery and bet size. Numbers
    /// are kept in the order given; matching is set-based.
    pub fn new(
        lottery: &LotteryProfile,
        bet_size: u8,
        numbers: Vec<u8>,
        order: u32,
    ) -> Result<Self, ModelError> {
        if numbers.len() != bet_size as usize {
            return Err(ModelError::WrongNumberCount {
                expected: bet_size,
                actual: numbers.len(),
            });
        }
        let mut seen = HashSet::new();
        for &n in &numbers {
            if !lottery.contains(n) {
                return Err(ModelError::NumberOutOfRange {
                    number: n,
                    min: lottery.min_number,
                    max: lottery.max_number,
                });
            }
            if !seen.insert(n) {
                return Err(ModelError::DuplicateNumber(n));
            }
        }
        Ok(Self {
            id: BetLineId(0),
            numbers,
            order,
        })
    }
}

/// A user's ticket: an ordered collection of bet lines for one lottery.
///
/// `bet_size` may exceed the lottery's drawn count ("extended" bets such as
/// a 7-number Mega-Sena wager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub lottery_id: crate::api::LotteryId,
    pub name: String,
    pub bet_size: u8,
    pub lines: Vec<BetLine>,
}

impl Ticket {
    pub fn new(
        lottery: &LotteryProfile,
        name: impl Into<String>,
        bet_size: u8,
        lines: Vec<Vec<u8>>,
    ) -> Result<Self, ModelError> {
        if bet_size < lottery.numbers_count {
            return Err(ModelError::BetSizeTooSmall {
                bet_size,
                numbers_count: lottery.numbers_count,
            });
        }
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, numbers)| BetLine::new(lottery, bet_size, numbers, i as u32))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: TicketId(0),
            lottery_id: lottery.id,
            name: name.into(),
            bet_size,
            lines,
        })
    }
}

/// Outcome of checking a single bet line against a draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCheckResult {
    pub bet_line_id: BetLineId,
    pub hits: u8,
    /// Intersection of the line and the draw, sorted ascending.
    pub hit_numbers: Vec<u8>,
    /// Rank of the matched prize tier, when the hit count won one.
    pub prize_tier: Option<u8>,
    pub prize_value: Decimal,
}

/// Outcome of checking a whole ticket against one draw.
///
/// At most one record exists per `(ticket, draw)` pair; re-checking returns
/// the stored record unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: CheckResultId,
    pub ticket_id: TicketId,
    pub draw_id: DrawId,
    pub checked_at: DateTime<Utc>,
    pub total_prize: Decimal,
    /// Best (lowest) tier rank among winning lines, `None` if nothing won.
    pub best_tier: Option<u8>,
    pub best_hits: u8,
    pub winning_lines_count: u32,
    pub line_results: Vec<LineCheckResult>,
}
