#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use loterias_rust::db::repositories::LocalRepository;
use loterias_rust::db::repository::{DrawRepository, LotteryRepository};
use loterias_rust::models::{Draw, LotteryProfile, PrizeTier};

pub fn mega_sena() -> LotteryProfile {
    LotteryProfile::new("Mega-Sena", "mega-sena", "megasena", 6, 1, 60).unwrap()
}

pub fn quina() -> LotteryProfile {
    LotteryProfile::new("Quina", "quina", "quina", 5, 1, 80).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Standard Mega-Sena brackets: sena, quina and quadra.
pub fn mega_tiers() -> Vec<PrizeTier> {
    vec![
        PrizeTier {
            tier: 1,
            description: "6 acertos".to_string(),
            matches: Some(6),
            winners_count: 0,
            prize_value: dec!(50000000.00),
        },
        PrizeTier {
            tier: 2,
            description: "5 acertos".to_string(),
            matches: Some(5),
            winners_count: 42,
            prize_value: dec!(68153.20),
        },
        PrizeTier {
            tier: 3,
            description: "4 acertos".to_string(),
            matches: Some(4),
            winners_count: 3200,
            prize_value: dec!(1071.64),
        },
    ]
}

pub fn make_draw(
    lottery: &LotteryProfile,
    number: u32,
    draw_date: NaiveDate,
    numbers: &[u8],
) -> Draw {
    Draw::new(
        lottery,
        number,
        draw_date,
        numbers.to_vec(),
        None,
        false,
        Decimal::ZERO,
        Decimal::ZERO,
        mega_tiers(),
    )
    .unwrap()
}

pub async fn seed_lottery(repo: &LocalRepository, profile: LotteryProfile) -> LotteryProfile {
    repo.create_lottery(profile).await.unwrap()
}

pub async fn seed_draw(
    repo: &LocalRepository,
    lottery: &LotteryProfile,
    number: u32,
    draw_date: NaiveDate,
    numbers: &[u8],
) -> Draw {
    repo.insert_draw(make_draw(lottery, number, draw_date, numbers))
        .await
        .unwrap()
}
