mod support;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use loterias_rust::db::repositories::LocalRepository;
use loterias_rust::db::repository::DrawRepository;
use loterias_rust::provider::{
    recompute_all, store_draw, sync_latest, ProviderDraw, ProviderTier, ResultsProvider,
    SyncOutcome,
};
use loterias_rust::stats::StatsManager;

use support::{date, mega_sena, seed_lottery};

fn provider_record(number: u32, day: u32, numbers: &[u8]) -> ProviderDraw {
    ProviderDraw {
        number,
        draw_date: date(2024, 6, day),
        numbers: numbers.to_vec(),
        draw_order: None,
        is_accumulated: true,
        accumulated_value: dec!(12000000.00),
        next_draw_estimate: dec!(15000000.00),
        prize_tiers: vec![
            ProviderTier {
                tier: 1,
                description: "6 acertos".to_string(),
                winners_count: 0,
                prize_value: dec!(0.00),
            },
            ProviderTier {
                tier: 2,
                description: "Quina - 5 Acertos".to_string(),
                winners_count: 30,
                prize_value: dec!(54000.10),
            },
            ProviderTier {
                tier: 3,
                description: "Acumulado".to_string(),
                winners_count: 0,
                prize_value: dec!(0.00),
            },
        ],
        raw: serde_json::Value::Null,
    }
}

struct FixedProvider {
    record: ProviderDraw,
}

#[async_trait]
impl ResultsProvider for FixedProvider {
    async fn latest_result(&self, _api_identifier: &str) -> anyhow::Result<ProviderDraw> {
        Ok(self.record.clone())
    }

    async fn result_by_number(
        &self,
        _api_identifier: &str,
        _number: u32,
    ) -> anyhow::Result<ProviderDraw> {
        Ok(self.record.clone())
    }
}

#[tokio::test]
async fn test_store_draw_persists_draw_with_metrics() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;
    let stats = StatsManager::new();

    let outcome = store_draw(
        &repo,
        &stats,
        &lottery,
        provider_record(1000, 1, &[2, 3, 5, 7, 11, 13]),
    )
    .await
    .unwrap();
    assert_eq!(outcome, SyncOutcome::Created { number: 1000 });

    let draw = repo.draw_by_number(lottery.id, 1000).await.unwrap();
    assert_eq!(draw.numbers, vec![2, 3, 5, 7, 11, 13]);
    assert_eq!(draw.prize_tiers.len(), 3);
    assert_eq!(draw.prize_tiers[0].matches, Some(6));
    assert_eq!(draw.prize_tiers[1].matches, Some(5));
    // Accumulation brackets carry no match count.
    assert_eq!(draw.prize_tiers[2].matches, None);

    let metrics = repo.draw_statistics(draw.id).await.unwrap().unwrap();
    assert_eq!(metrics.sum, 41);
    assert_eq!(metrics.prime_count, 6);
    assert_eq!(metrics.repeated_from_previous, 0);
}

#[tokio::test]
async fn test_store_draw_skips_existing_contest() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;
    let stats = StatsManager::new();

    let first = store_draw(
        &repo,
        &stats,
        &lottery,
        provider_record(1001, 4, &[1, 2, 3, 4, 5, 6]),
    )
    .await
    .unwrap();
    assert_eq!(first, SyncOutcome::Created { number: 1001 });

    let second = store_draw(
        &repo,
        &stats,
        &lottery,
        provider_record(1001, 4, &[1, 2, 3, 4, 5, 6]),
    )
    .await
    .unwrap();
    assert_eq!(second, SyncOutcome::AlreadyExists { number: 1001 });
    assert_eq!(repo.draw_count(), 1);
}

#[tokio::test]
async fn test_consecutive_syncs_track_repeats() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;
    let stats = StatsManager::new();

    store_draw(
        &repo,
        &stats,
        &lottery,
        provider_record(1, 1, &[1, 2, 3, 4, 5, 6]),
    )
    .await
    .unwrap();
    store_draw(
        &repo,
        &stats,
        &lottery,
        provider_record(2, 4, &[4, 5, 6, 40, 50, 60]),
    )
    .await
    .unwrap();

    let second = repo.draw_by_number(lottery.id, 2).await.unwrap();
    let metrics = repo.draw_statistics(second.id).await.unwrap().unwrap();
    assert_eq!(metrics.repeated_from_previous, 3);
}

#[tokio::test]
async fn test_sync_latest_pulls_from_provider() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;
    let stats = StatsManager::new();
    let provider = FixedProvider {
        record: provider_record(2600, 8, &[7, 14, 21, 28, 35, 42]),
    };

    let outcome = sync_latest(&repo, &stats, &provider, &lottery)
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Created { number: 2600 });

    let again = sync_latest(&repo, &stats, &provider, &lottery)
        .await
        .unwrap();
    assert_eq!(again, SyncOutcome::AlreadyExists { number: 2600 });
}

#[tokio::test]
async fn test_recompute_all_backfills_previous_contest_metrics() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;
    let stats = StatsManager::new();

    // Ingest out of order: contest 2 first, so its repeat count starts at 0.
    store_draw(
        &repo,
        &stats,
        &lottery,
        provider_record(2, 4, &[1, 2, 3, 40, 50, 60]),
    )
    .await
    .unwrap();
    store_draw(
        &repo,
        &stats,
        &lottery,
        provider_record(1, 1, &[1, 2, 3, 4, 5, 6]),
    )
    .await
    .unwrap();

    let second = repo.draw_by_number(lottery.id, 2).await.unwrap();
    let before = repo.draw_statistics(second.id).await.unwrap().unwrap();
    assert_eq!(before.repeated_from_previous, 0);

    let count = recompute_all(&repo, &stats, &lottery).await.unwrap();
    assert_eq!(count, 2);

    let after = repo.draw_statistics(second.id).await.unwrap().unwrap();
    assert_eq!(after.repeated_from_previous, 3);
}
