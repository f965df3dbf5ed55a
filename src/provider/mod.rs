//! Results-provider contract.
//!
//! The official results API is an external collaborator; the core only
//! defines the parsed record shape, the trait a client must implement, and
//! the tier-description parsing used when the provider does not report a
//! numeric match count directly.

pub mod sync;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub use sync::{recompute_all, recompute_statistics, store_draw, sync_latest, SyncError, SyncOutcome};

/// One prize bracket as reported by the provider. The hit count is buried
/// in the free-text description ("6 acertos").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTier {
    pub tier: u8,
    pub description: String,
    pub winners_count: u32,
    pub prize_value: Decimal,
}

/// One draw record parsed from the provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDraw {
    pub number: u32,
    pub draw_date: NaiveDate,
    pub numbers: Vec<u8>,
    pub draw_order: Option<Vec<u8>>,
    pub is_accumulated: bool,
    pub accumulated_value: Decimal,
    pub next_draw_estimate: Decimal,
    pub prize_tiers: Vec<ProviderTier>,
    /// Full provider response, kept for auditing.
    #[serde(default)]
    pub raw: serde_json::Value,
}

/// Client contract for the official results API.
///
/// Implementations own retries, timeouts and response parsing; the core
/// only consumes the parsed records.
#[async_trait]
pub trait ResultsProvider: Send + Sync {
    /// Fetch the most recent draw of a lottery.
    async fn latest_result(&self, api_identifier: &str) -> anyhow::Result<ProviderDraw>;

    /// Fetch a specific draw by contest number.
    async fn result_by_number(
        &self,
        api_identifier: &str,
        number: u32,
    ) -> anyhow::Result<ProviderDraw>;
}

static MATCHES_RE: OnceLock<Regex> = OnceLock::new();

/// Extract the required hit count from a tier description.
///
/// "6 acertos" yields 6; descriptions without the pattern (accumulation
/// brackets, special tiers) yield `None`.
pub fn extract_matches(description: &str) -> Option<u8> {
    let re = MATCHES_RE
        .get_or_init(|| Regex::new(r"(?i)(\d+)\s*acertos?").expect("static pattern"));
    re.captures(description)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
