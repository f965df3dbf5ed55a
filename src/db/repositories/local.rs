//! In-memory local repository implementation.
//!
//! Stores all data in HashMaps behind a single `RwLock`, which also gives
//! the atomicity the core's contracts require: uniqueness checks and the
//! corresponding inserts run under one write lock.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{BetLineId, CheckResultId, DrawId, LotteryId, TicketId};
use crate::db::repository::{
    DrawFilter, DrawRepository, ErrorContext, LotteryRepository, RepositoryError,
    RepositoryResult, TicketRepository,
};
use crate::models::{CheckResult, Draw, DrawStatistics, LotteryProfile, Ticket};

/// In-memory repository for unit tests and local development.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    lotteries: HashMap<LotteryId, LotteryProfile>,
    draws: HashMap<DrawId, Draw>,
    draw_numbers: HashMap<(LotteryId, u32), DrawId>,
    draw_stats: HashMap<DrawId, DrawStatistics>,
    tickets: HashMap<TicketId, Ticket>,
    check_results: HashMap<CheckResultId, CheckResult>,
    check_pairs: HashMap<(TicketId, DrawId), CheckResultId>,

    next_lottery_id: i64,
    next_draw_id: i64,
    next_ticket_id: i64,
    next_line_id: i64,
    next_check_id: i64,

    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            lotteries: HashMap::new(),
            draws: HashMap::new(),
            draw_numbers: HashMap::new(),
            draw_stats: HashMap::new(),
            tickets: HashMap::new(),
            check_results: HashMap::new(),
            check_pairs: HashMap::new(),
            next_lottery_id: 1,
            next_draw_id: 1,
            next_ticket_id: 1,
            next_line_id: 1,
            next_check_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let healthy = data.is_healthy;
        *data = LocalData {
            is_healthy: healthy,
            ..Default::default()
        };
    }

    /// Number of stored draws, across all lotteries.
    pub fn draw_count(&self) -> usize {
        self.data.read().draws.len()
    }

    /// Number of stored check results.
    pub fn check_result_count(&self) -> usize {
        self.data.read().check_results.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("repository is not healthy"));
        }
        Ok(())
    }
}

#[async_trait]
impl LotteryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_lottery(&self, mut lottery: LotteryProfile) -> RepositoryResult<LotteryProfile> {
        self.check_health()?;
        let mut data = self.data.write();
        if data.lotteries.values().any(|l| l.slug == lottery.slug) {
            return Err(RepositoryError::conflict(format!(
                "lottery slug '{}' already exists",
                lottery.slug
            )));
        }
        lottery.id = LotteryId(data.next_lottery_id);
        data.next_lottery_id += 1;
        data.lotteries.insert(lottery.id, lottery.clone());
        Ok(lottery)
    }

    async fn lottery_by_id(&self, id: LotteryId) -> RepositoryResult<LotteryProfile> {
        self.check_health()?;
        self.data.read().lotteries.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("lottery {} not found", id),
                ErrorContext::new("lottery_by_id").with_entity("lottery").with_entity_id(id),
            )
        })
    }

    async fn lottery_by_slug(&self, slug: &str) -> RepositoryResult<LotteryProfile> {
        self.check_health()?;
        self.data
            .read()
            .lotteries
            .values()
            .find(|l| l.slug == slug)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("lottery '{}' not found", slug),
                    ErrorContext::new("lottery_by_slug").with_entity("lottery"),
                )
            })
    }

    async fn list_active_lotteries(&self) -> RepositoryResult<Vec<LotteryProfile>> {
        self.check_health()?;
        let mut lotteries: Vec<_> = self
            .data
            .read()
            .lotteries
            .values()
            .filter(|l| l.is_active)
            .cloned()
            .collect();
        lotteries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lotteries)
    }
}

#[async_trait]
impl DrawRepository for LocalRepository {
    async fn insert_draw(&self, mut draw: Draw) -> RepositoryResult<Draw> {
        self.check_health()?;
        let mut data = self.data.write();
        if !data.lotteries.contains_key(&draw.lottery_id) {
            return Err(RepositoryError::validation(format!(
                "draw references unknown lottery {}",
                draw.lottery_id
            )));
        }
        let key = (draw.lottery_id, draw.number);
        if data.draw_numbers.contains_key(&key) {
            return Err(RepositoryError::Conflict {
                message: format!("draw {} already exists", draw.number),
                context: ErrorContext::new("insert_draw")
                    .with_entity("draw")
                    .with_entity_id(draw.number),
            });
        }
        draw.id = DrawId(data.next_draw_id);
        data.next_draw_id += 1;
        data.draw_numbers.insert(key, draw.id);
        data.draws.insert(draw.id, draw.clone());
        Ok(draw)
    }

    async fn draw_by_id(&self, id: DrawId) -> RepositoryResult<Draw> {
        self.check_health()?;
        self.data.read().draws.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("draw {} not found", id),
                ErrorContext::new("draw_by_id").with_entity("draw").with_entity_id(id),
            )
        })
    }

    async fn find_draw(&self, lottery: LotteryId, number: u32) -> RepositoryResult<Option<Draw>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .draw_numbers
            .get(&(lottery, number))
            .and_then(|id| data.draws.get(id))
            .cloned())
    }

    async fn draw_by_number(&self, lottery: LotteryId, number: u32) -> RepositoryResult<Draw> {
        self.find_draw(lottery, number).await?.ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("draw {} not found for lottery {}", number, lottery),
                ErrorContext::new("draw_by_number").with_entity("draw").with_entity_id(number),
            )
        })
    }

    async fn latest_draw(&self, lottery: LotteryId) -> RepositoryResult<Draw> {
        self.check_health()?;
        let data = self.data.read();
        data.draws
            .values()
            .filter(|d| d.lottery_id == lottery)
            .max_by_key(|d| d.number)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("no draws found for lottery {}", lottery),
                    ErrorContext::new("latest_draw").with_entity("draw"),
                )
            })
    }

    async fn list_draws(&self, lottery: LotteryId) -> RepositoryResult<Vec<Draw>> {
        self.check_health()?;
        let data = self.data.read();
        let mut draws: Vec<_> = data
            .draws
            .values()
            .filter(|d| d.lottery_id == lottery)
            .cloned()
            .collect();
        draws.sort_by(|a, b| b.number.cmp(&a.number));
        Ok(draws)
    }

    async fn draws_filtered(&self, filter: &DrawFilter) -> RepositoryResult<Vec<Draw>> {
        self.check_health()?;
        let data = self.data.read();
        let lottery = match data
            .lotteries
            .values()
            .find(|l| l.slug == filter.lottery_slug && l.is_active)
        {
            Some(l) => l.id,
            None => return Ok(Vec::new()),
        };

        let mut draws: Vec<_> = data
            .draws
            .values()
            .filter(|d| d.lottery_id == lottery)
            .filter(|d| filter.start_date.map_or(true, |s| d.draw_date >= s))
            .filter(|d| filter.end_date.map_or(true, |e| d.draw_date <= e))
            .cloned()
            .collect();
        draws.sort_by(|a, b| b.number.cmp(&a.number));
        if let Some(window) = filter.window {
            draws.truncate(window);
        }
        Ok(draws)
    }

    async fn upsert_draw_statistics(
        &self,
        draw: DrawId,
        stats: DrawStatistics,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        if !data.draws.contains_key(&draw) {
            return Err(RepositoryError::not_found_with_context(
                format!("draw {} not found", draw),
                ErrorContext::new("upsert_draw_statistics")
                    .with_entity("draw")
                    .with_entity_id(draw),
            ));
        }
        data.draw_stats.insert(draw, stats);
        Ok(())
    }

    async fn draw_statistics(&self, draw: DrawId) -> RepositoryResult<Option<DrawStatistics>> {
        self.check_health()?;
        Ok(self.data.read().draw_stats.get(&draw).copied())
    }
}

#[async_trait]
impl TicketRepository for LocalRepository {
    async fn create_ticket(&self, mut ticket: Ticket) -> RepositoryResult<Ticket> {
        self.check_health()?;
        let mut data = self.data.write();
        if !data.lotteries.contains_key(&ticket.lottery_id) {
            return Err(RepositoryError::validation(format!(
                "ticket references unknown lottery {}",
                ticket.lottery_id
            )));
        }
        ticket.id = TicketId(data.next_ticket_id);
        data.next_ticket_id += 1;
        for line in &mut ticket.lines {
            line.id = BetLineId(data.next_line_id);
            data.next_line_id += 1;
        }
        data.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn ticket_by_id(&self, id: TicketId) -> RepositoryResult<Ticket> {
        self.check_health()?;
        self.data.read().tickets.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("ticket {} not found", id),
                ErrorContext::new("ticket_by_id").with_entity("ticket").with_entity_id(id),
            )
        })
    }

    async fn find_check_result(
        &self,
        ticket: TicketId,
        draw: DrawId,
    ) -> RepositoryResult<Option<CheckResult>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .check_pairs
            .get(&(ticket, draw))
            .and_then(|id| data.check_results.get(id))
            .cloned())
    }

    async fn insert_check_result(&self, mut result: CheckResult) -> RepositoryResult<CheckResult> {
        self.check_health()?;
        let mut data = self.data.write();
        let pair = (result.ticket_id, result.draw_id);
        // Concurrent checkers may race to this point; the first insert wins
        // and later ones get the stored record.
        if let Some(existing) = data
            .check_pairs
            .get(&pair)
            .and_then(|id| data.check_results.get(id))
        {
            return Ok(existing.clone());
        }
        result.id = CheckResultId(data.next_check_id);
        data.next_check_id += 1;
        data.check_pairs.insert(pair, result.id);
        data.check_results.insert(result.id, result.clone());
        Ok(result)
    }
}
