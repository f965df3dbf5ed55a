//! Lottery configuration, draws and prize tiers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ModelError;
use crate::api::{DrawId, LotteryId};

/// Immutable configuration of one lottery modality.
///
/// `numbers_count` numbers are drawn per contest, each within
/// `min_number..=max_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryProfile {
    pub id: LotteryId,
    pub name: String,
    pub slug: String,
    /// Identifier used by the external results provider.
    pub api_identifier: String,
    pub numbers_count: u8,
    pub min_number: u8,
    pub max_number: u8,
    pub is_active: bool,
}

impl LotteryProfile {
    /// Build a profile with an unassigned id; the repository assigns one on
    /// creation.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        api_identifier: impl Into<String>,
        numbers_count: u8,
        min_number: u8,
        max_number: u8,
    ) -> Result<Self, ModelError> {
        // Widened so the full 0..=255 domain (size 256) does not overflow.
        if min_number > max_number
            || (max_number as u16 - min_number as u16 + 1) < numbers_count as u16
        {
            return Err(ModelError::DomainTooSmall {
                min: min_number,
                max: max_number,
                numbers_count,
            });
        }
        Ok(Self {
            id: LotteryId(0),
            name: name.into(),
            slug: slug.into(),
            api_identifier: api_identifier.into(),
            numbers_count,
            min_number,
            max_number,
            is_active: true,
        })
    }

    /// Check that a single number falls inside this lottery's domain.
    pub fn contains(&self, number: u8) -> bool {
        (self.min_number..=self.max_number).contains(&number)
    }
}

/// One prize bracket of a draw. `tier` 1 is the top prize.
///
/// `matches` is the hit count required to win the bracket; special
/// accumulation brackets have no numeric hit count and carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    pub tier: u8,
    pub description: String,
    pub matches: Option<u8>,
    pub winners_count: u32,
    pub prize_value: Decimal,
}

/// One official contest result. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub id: DrawId,
    pub lottery_id: LotteryId,
    /// Sequential contest number, unique per lottery.
    pub number: u32,
    pub draw_date: NaiveDate,
    /// Drawn numbers, sorted ascending.
    pub numbers: Vec<u8>,
    /// Same numbers in the sequence they were drawn, when the provider
    /// reports it.
    pub draw_order: Option<Vec<u8>>,
    pub is_accumulated: bool,
    pub accumulated_value: Decimal,
    pub next_draw_estimate: Decimal,
    pub prize_tiers: Vec<PrizeTier>,
}

impl Draw {
    /// Validate and build a draw for the given lottery. Numbers are sorted
    /// ascending; `draw_order` must be a permutation of them when present.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lottery: &LotteryProfile,
        number: u32,
        draw_date: NaiveDate,
        mut numbers: Vec<u8>,
        draw_order: Option<Vec<u8>>,
        is_accumulated: bool,
        accumulated_value: Decimal,
        next_draw_estimate: Decimal,
        prize_tiers: Vec<PrizeTier>,
    ) -> Result<Self, ModelError> {
        if numbers.len() != lottery.numbers_count as usize {
            return Err(ModelError::WrongNumberCount {
                expected: lottery.numbers_count,
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
        numbers.sort_unstable();

        if let Some(ref order) = draw_order {
            let mut sorted = order.clone();
            sorted.sort_unstable();
            if sorted != numbers {
                return Err(ModelError::DrawOrderMismatch);
            }
        }

        let mut ranks = HashSet::new();
        for tier in &prize_tiers {
            if !ranks.insert(tier.tier) {
                return Err(ModelError::DuplicateTierRank(tier.tier));
            }
        }

        Ok(Self {
            id: DrawId(0),
            lottery_id: lottery.id,
            number,
            draw_date,
            numbers,
            draw_order,
            is_accumulated,
            accumulated_value,
            next_draw_estimate,
            prize_tiers,
        })
    }
}
