mod support;

use loterias_rust::db::repositories::LocalRepository;
use loterias_rust::db::repository::DrawRepository;
use loterias_rust::models::{Draw, StatsQuery};
use loterias_rust::stats::{compute_metrics, StatsManager};

use support::{date, mega_sena, seed_draw, seed_lottery};

async fn seed_draw_with_stats(
    repo: &LocalRepository,
    lottery: &loterias_rust::models::LotteryProfile,
    number: u32,
    day: u32,
    numbers: &[u8],
    previous: Option<&[u8]>,
) -> Draw {
    let draw = seed_draw(repo, lottery, number, date(2024, 5, day), numbers).await;
    let metrics = compute_metrics(&draw.numbers, previous);
    repo.upsert_draw_statistics(draw.id, metrics).await.unwrap();
    draw
}

#[tokio::test]
async fn test_window_of_one_matches_latest_draw_metrics() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;

    seed_draw_with_stats(&repo, &lottery, 1, 1, &[1, 2, 3, 4, 5, 6], None).await;
    seed_draw_with_stats(
        &repo,
        &lottery,
        2,
        4,
        &[10, 20, 30, 40, 50, 60],
        Some(&[1, 2, 3, 4, 5, 6]),
    )
    .await;
    seed_draw_with_stats(
        &repo,
        &lottery,
        3,
        8,
        &[2, 3, 5, 7, 11, 13],
        Some(&[10, 20, 30, 40, 50, 60]),
    )
    .await;

    let stats = StatsManager::new();
    let query = StatsQuery::for_lottery("mega-sena").with_window(1);
    let report = stats
        .aggregated_stats(&repo, &query)
        .await
        .unwrap()
        .unwrap();

    // Only the most recent draw (contest 3) is analyzed, so the averages
    // equal its metrics exactly.
    assert_eq!(report.total_analyzed, 1);
    assert_eq!(report.averages.sum, 41.0);
    assert_eq!(report.averages.evens, 1.0);
    assert_eq!(report.averages.odds, 5.0);
    assert_eq!(report.averages.primes, 6.0);
    assert_eq!(report.averages.range, 11.0);
    assert_eq!(report.averages.consecutive, 1.0);
    assert_eq!(report.averages.repeated, 0.0);
    assert_eq!(report.number_frequencies.len(), 6);
}

#[tokio::test]
async fn test_frequencies_order_by_count_then_number() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;

    seed_draw_with_stats(&repo, &lottery, 1, 1, &[1, 2, 3, 4, 5, 6], None).await;
    seed_draw_with_stats(
        &repo,
        &lottery,
        2,
        4,
        &[1, 2, 3, 40, 50, 60],
        Some(&[1, 2, 3, 4, 5, 6]),
    )
    .await;

    let stats = StatsManager::new();
    let report = stats
        .aggregated_stats(&repo, &StatsQuery::for_lottery("mega-sena"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.total_analyzed, 2);
    let top: Vec<(u8, usize)> = report
        .number_frequencies
        .iter()
        .take(3)
        .map(|f| (f.number, f.count))
        .collect();
    assert_eq!(top, vec![(1, 2), (2, 2), (3, 2)]);
    // Singly drawn numbers follow in ascending order.
    assert_eq!(report.number_frequencies[3].number, 4);
    assert_eq!(report.number_frequencies[3].count, 1);
}

#[tokio::test]
async fn test_unknown_lottery_yields_no_report() {
    let repo = LocalRepository::new();
    seed_lottery(&repo, mega_sena()).await;

    let stats = StatsManager::new();
    let report = stats
        .aggregated_stats(&repo, &StatsQuery::for_lottery("nope"))
        .await
        .unwrap();
    assert!(report.is_none());
}

#[tokio::test]
async fn test_date_range_filters_draws() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;

    seed_draw_with_stats(&repo, &lottery, 1, 1, &[1, 2, 3, 4, 5, 6], None).await;
    seed_draw_with_stats(
        &repo,
        &lottery,
        2,
        10,
        &[7, 8, 9, 10, 11, 12],
        Some(&[1, 2, 3, 4, 5, 6]),
    )
    .await;
    seed_draw_with_stats(
        &repo,
        &lottery,
        3,
        20,
        &[13, 14, 15, 16, 17, 18],
        Some(&[7, 8, 9, 10, 11, 12]),
    )
    .await;

    let stats = StatsManager::new();
    let query = StatsQuery::for_lottery("mega-sena")
        .between(Some(date(2024, 5, 5)), Some(date(2024, 5, 15)));
    let report = stats
        .aggregated_stats(&repo, &query)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.total_analyzed, 1);
    assert_eq!(report.averages.sum, (7 + 8 + 9 + 10 + 11 + 12) as f64);
}

#[tokio::test]
async fn test_invalidation_exposes_new_draws() {
    let repo = LocalRepository::new();
    let lottery = seed_lottery(&repo, mega_sena()).await;
    seed_draw_with_stats(&repo, &lottery, 1, 1, &[1, 2, 3, 4, 5, 6], None).await;

    let stats = StatsManager::new();
    let query = StatsQuery::for_lottery("mega-sena");

    let first = stats
        .aggregated_stats(&repo, &query)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.total_analyzed, 1);

    seed_draw_with_stats(
        &repo,
        &lottery,
        2,
        4,
        &[10, 20, 30, 40, 50, 60],
        Some(&[1, 2, 3, 4, 5, 6]),
    )
    .await;

    // Still served from cache until the lottery is invalidated.
    let cached = stats
        .aggregated_stats(&repo, &query)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.total_analyzed, 1);

    stats.invalidate("mega-sena");
    let refreshed = stats
        .aggregated_stats(&repo, &query)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.total_analyzed, 2);
}
