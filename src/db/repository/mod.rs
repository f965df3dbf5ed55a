//! Repository trait definitions for the persistence collaborator.
//!
//! Responsibilities are split across focused traits so that tests and
//! services can depend on exactly what they use:
//!
//! - [`error`]: error types for repository operations
//! - [`LotteryRepository`]: lottery profile CRUD
//! - [`DrawRepository`]: draws, prize tiers and per-draw statistics
//! - [`TicketRepository`]: tickets, bet lines and check results
//!
//! [`FullRepository`] is a blanket composite for functions that need all of
//! them.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{DrawId, LotteryId, TicketId};
use crate::models::{CheckResult, Draw, DrawStatistics, LotteryProfile, Ticket};

/// Draw selection used by the stats aggregator.
#[derive(Debug, Clone, Default)]
pub struct DrawFilter {
    pub lottery_slug: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Keep only the most recent `window` draws after ordering.
    pub window: Option<usize>,
}

/// Lottery profile storage.
#[async_trait]
pub trait LotteryRepository: Send + Sync {
    /// Check if the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a profile; the input id is ignored and a fresh one assigned.
    async fn create_lottery(&self, lottery: LotteryProfile) -> RepositoryResult<LotteryProfile>;

    async fn lottery_by_id(&self, id: LotteryId) -> RepositoryResult<LotteryProfile>;

    async fn lottery_by_slug(&self, slug: &str) -> RepositoryResult<LotteryProfile>;

    async fn list_active_lotteries(&self) -> RepositoryResult<Vec<LotteryProfile>>;
}

/// Draws with their prize tiers, plus the derived per-draw statistics.
#[async_trait]
pub trait DrawRepository: Send + Sync {
    /// Store a draw and its prize tiers as one unit.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the `(lottery, number)`
    /// pair already exists; the uniqueness check and the insert happen under
    /// one write lock.
    async fn insert_draw(&self, draw: Draw) -> RepositoryResult<Draw>;

    async fn draw_by_id(&self, id: DrawId) -> RepositoryResult<Draw>;

    /// Look up a draw by contest number, `Ok(None)` when absent.
    async fn find_draw(&self, lottery: LotteryId, number: u32) -> RepositoryResult<Option<Draw>>;

    /// Look up a draw by contest number, not-found error when absent.
    async fn draw_by_number(&self, lottery: LotteryId, number: u32) -> RepositoryResult<Draw>;

    /// The draw with the highest contest number for the lottery.
    async fn latest_draw(&self, lottery: LotteryId) -> RepositoryResult<Draw>;

    /// All draws of one lottery, ordered by contest number descending.
    async fn list_draws(&self, lottery: LotteryId) -> RepositoryResult<Vec<Draw>>;

    /// Draws selected for aggregation: active lottery resolved by slug, date
    /// range applied, ordered by contest number descending, then truncated
    /// to the window.
    async fn draws_filtered(&self, filter: &DrawFilter) -> RepositoryResult<Vec<Draw>>;

    /// Create or replace the statistics record of a draw.
    async fn upsert_draw_statistics(
        &self,
        draw: DrawId,
        stats: DrawStatistics,
    ) -> RepositoryResult<()>;

    async fn draw_statistics(&self, draw: DrawId) -> RepositoryResult<Option<DrawStatistics>>;
}

/// Tickets and their check results.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Store a ticket and its bet lines; ids are assigned to both.
    async fn create_ticket(&self, ticket: Ticket) -> RepositoryResult<Ticket>;

    async fn ticket_by_id(&self, id: TicketId) -> RepositoryResult<Ticket>;

    /// The stored result for `(ticket, draw)`, if one exists.
    async fn find_check_result(
        &self,
        ticket: TicketId,
        draw: DrawId,
    ) -> RepositoryResult<Option<CheckResult>>;

    /// Store a check result with all line results as one unit.
    ///
    /// When a result for the `(ticket, draw)` pair already exists the stored
    /// record is returned instead; the check and the insert happen under one
    /// write lock so concurrent checkers converge on a single record.
    async fn insert_check_result(&self, result: CheckResult) -> RepositoryResult<CheckResult>;
}

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing the three focused
/// traits.
pub trait FullRepository: LotteryRepository + DrawRepository + TicketRepository {}

impl<T> FullRepository for T where T: LotteryRepository + DrawRepository + TicketRepository {}
