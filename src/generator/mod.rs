//! Constrained game generation engine.
//!
//! Builds a numeric pool from the lottery domain, repeatedly samples
//! candidates, filters them through the rule chain and scores the accepted
//! ones. Infeasible constraints degrade to a short or empty result; only an
//! impossible pool construction is an error.

pub mod validators;

use rand::seq::index::sample;
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;

use crate::models::{GeneratedGame, GenerationConfig, LotteryProfile};
use validators::{build_rules, Rule};

/// Generation failed before sampling started: the pool itself cannot
/// produce a valid game.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("fixed numbers out of range: {0:?}")]
    FixedNumbersOutOfRange(Vec<u8>),

    #[error("pool has {available} numbers but {required} are needed")]
    PoolTooSmall { available: usize, required: usize },
}

/// Engine for generating lottery games under user constraints.
pub struct GameGenerator {
    pool: Vec<u8>,
    fixed: BTreeSet<u8>,
    numbers_count: u8,
    rules: Vec<Box<dyn Rule>>,
}

// Rule trait objects are not Debug; summarize the chain by its size.
impl fmt::Debug for GameGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameGenerator")
            .field("pool_len", &self.pool.len())
            .field("fixed", &self.fixed)
            .field("numbers_count", &self.numbers_count)
            .field("rules_len", &self.rules.len())
            .finish_non_exhaustive()
    }
}

impl GameGenerator {
    /// Safety ceiling on sampling attempts, so infeasible rule sets still
    /// terminate.
    pub const MAX_ATTEMPTS: u32 = 10_000;

    const MAX_SCORE: f64 = 10.0;

    /// Build the pool and the validator chain for one generation run.
    ///
    /// Fails when a fixed number falls outside the lottery domain or when
    /// the pool (domain minus exclusions) is smaller than the effective
    /// numbers count (config override, else the lottery default).
    pub fn new(
        lottery: &LotteryProfile,
        config: &GenerationConfig,
    ) -> Result<Self, GenerationError> {
        let numbers_count = config.numbers_count.unwrap_or(lottery.numbers_count);

        let out_of_range: Vec<u8> = config
            .fixed_numbers
            .iter()
            .copied()
            .filter(|&n| !lottery.contains(n))
            .collect();
        if !out_of_range.is_empty() {
            return Err(GenerationError::FixedNumbersOutOfRange(out_of_range));
        }

        let excluded: BTreeSet<u8> = config.exclude_numbers.iter().copied().collect();
        let pool: Vec<u8> = (lottery.min_number..=lottery.max_number)
            .filter(|n| !excluded.contains(n))
            .collect();

        if pool.len() < numbers_count as usize {
            return Err(GenerationError::PoolTooSmall {
                available: pool.len(),
                required: numbers_count as usize,
            });
        }

        Ok(Self {
            pool,
            fixed: config.fixed_numbers.iter().copied().collect(),
            numbers_count,
            rules: build_rules(config),
        })
    }

    /// Generate up to `count` games with the thread-local RNG.
    pub fn generate(&self, count: usize) -> Result<Vec<GeneratedGame>, GenerationError> {
        self.generate_with_rng(&mut rand::thread_rng(), count)
    }

    /// Generate up to `count` games satisfying every active rule.
    ///
    /// Exhausting the attempt ceiling is not an error; the games accepted
    /// so far (possibly none) are returned.
    pub fn generate_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<GeneratedGame>, GenerationError> {
        let met_rules: Vec<String> = self.rules.iter().map(|r| r.describe()).collect();

        let mut games = Vec::new();
        let mut attempts = 0;
        while games.len() < count && attempts < Self::MAX_ATTEMPTS {
            attempts += 1;

            let mut numbers = self.candidate(rng)?;
            if self.rules.iter().all(|rule| rule.validate(&numbers)) {
                numbers.sort_unstable();
                games.push(GeneratedGame {
                    score: self.score(&numbers),
                    numbers,
                    met_rules: met_rules.clone(),
                });
            }
        }

        Ok(games)
    }

    /// Draw one candidate: the fixed numbers plus a uniform sample without
    /// replacement from the rest of the pool.
    fn candidate<R: Rng>(&self, rng: &mut R) -> Result<Vec<u8>, GenerationError> {
        let mut current: Vec<u8> = self.fixed.iter().copied().collect();
        let count = self.numbers_count as usize;

        if current.len() >= count {
            // More fixed numbers than slots: keep the first `count` of them.
            current.truncate(count);
            return Ok(current);
        }

        let available: Vec<u8> = self
            .pool
            .iter()
            .copied()
            .filter(|n| !self.fixed.contains(n))
            .collect();
        let remaining = count - current.len();

        // Already excluded at construction; re-checked before sampling.
        if available.len() < remaining {
            return Err(GenerationError::PoolTooSmall {
                available: available.len(),
                required: remaining,
            });
        }

        for index in sample(rng, available.len(), remaining) {
            current.push(available[index]);
        }
        Ok(current)
    }

    /// Heuristic quality score on a 0-10 scale. Every accepted game
    /// currently rates at the top of the scale.
    fn score(&self, _numbers: &[u8]) -> f64 {
        Self::MAX_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mega_sena() -> LotteryProfile {
        LotteryProfile::new("Mega-Sena", "megasena", "megasena", 6, 1, 60).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn generates_requested_count_without_constraints() {
        let generator = GameGenerator::new(&mega_sena(), &GenerationConfig::default()).unwrap();
        let games = generator.generate_with_rng(&mut rng(), 5).unwrap();
        assert_eq!(games.len(), 5);
        for game in &games {
            assert_eq!(game.numbers.len(), 6);
            let mut sorted = game.numbers.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted, game.numbers, "numbers sorted and distinct");
            assert!(game.numbers.iter().all(|&n| (1..=60).contains(&n)));
            assert_eq!(game.score, 10.0);
            assert!(game.met_rules.is_empty());
        }
    }

    #[test]
    fn fixed_numbers_always_present() {
        let config = GenerationConfig {
            fixed_numbers: vec![7, 13],
            ..Default::default()
        };
        let generator = GameGenerator::new(&mega_sena(), &config).unwrap();
        let games = generator.generate_with_rng(&mut rng(), 10).unwrap();
        assert!(!games.is_empty());
        for game in &games {
            assert!(game.numbers.contains(&7));
            assert!(game.numbers.contains(&13));
        }
    }

    #[test]
    fn excluded_numbers_never_present() {
        let config = GenerationConfig {
            exclude_numbers: (11..=60).collect(),
            ..Default::default()
        };
        let generator = GameGenerator::new(&mega_sena(), &config).unwrap();
        let games = generator.generate_with_rng(&mut rng(), 3).unwrap();
        assert_eq!(games.len(), 3);
        for game in &games {
            assert!(game.numbers.iter().all(|&n| n <= 10));
        }
    }

    #[test]
    fn fixed_out_of_range_is_configuration_error() {
        let config = GenerationConfig {
            fixed_numbers: vec![61],
            ..Default::default()
        };
        let err = GameGenerator::new(&mega_sena(), &config);
        assert!(matches!(
            err,
            Err(GenerationError::FixedNumbersOutOfRange(ref v)) if v == &vec![61]
        ));
    }

    #[test]
    fn pool_smaller_than_count_is_configuration_error() {
        let config = GenerationConfig {
            exclude_numbers: (6..=60).collect(),
            ..Default::default()
        };
        let err = GameGenerator::new(&mega_sena(), &config);
        assert!(matches!(err, Err(GenerationError::PoolTooSmall { .. })));
    }

    #[test]
    fn infeasible_rules_return_empty_not_error() {
        // No six numbers in 1..=60 sum below 10.
        let config = GenerationConfig {
            max_sum: Some(10),
            ..Default::default()
        };
        let generator = GameGenerator::new(&mega_sena(), &config).unwrap();
        let games = generator.generate_with_rng(&mut rng(), 5).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn more_fixed_than_slots_never_validates() {
        let config = GenerationConfig {
            fixed_numbers: vec![1, 2, 3, 4],
            numbers_count: Some(3),
            ..Default::default()
        };
        let generator = GameGenerator::new(&mega_sena(), &config).unwrap();
        // The candidate is truncated to [1, 2, 3], which can never contain
        // all four fixed numbers, so the inclusion rule rejects every
        // attempt and the batch comes back empty.
        let games = generator.generate_with_rng(&mut rng(), 1).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn debug_output_summarizes_the_engine() {
        let generator =
            GameGenerator::new(&mega_sena(), &GenerationConfig::default()).unwrap();
        let rendered = format!("{:?}", generator);
        assert!(rendered.contains("GameGenerator"));
        assert!(rendered.contains("numbers_count"));
    }

    #[test]
    fn accepted_games_pass_the_whole_chain() {
        let config = GenerationConfig {
            min_sum: Some(100),
            max_sum: Some(220),
            min_even: Some(2),
            max_even: Some(4),
            exclude_numbers: vec![1, 2, 3],
            ..Default::default()
        };
        let generator = GameGenerator::new(&mega_sena(), &config).unwrap();
        let games = generator.generate_with_rng(&mut rng(), 20).unwrap();
        assert!(!games.is_empty());
        for game in &games {
            let sum: u32 = game.numbers.iter().map(|&n| n as u32).sum();
            let evens = game.numbers.iter().filter(|&&n| n % 2 == 0).count();
            assert!((100..=220).contains(&sum));
            assert!((2..=4).contains(&evens));
            assert!(!game.numbers.iter().any(|n| [1, 2, 3].contains(n)));
            assert_eq!(game.met_rules.len(), 3);
        }
    }

    #[test]
    fn numbers_count_override_takes_precedence() {
        let config = GenerationConfig {
            numbers_count: Some(8),
            ..Default::default()
        };
        let generator = GameGenerator::new(&mega_sena(), &config).unwrap();
        let games = generator.generate_with_rng(&mut rng(), 2).unwrap();
        assert!(games.iter().all(|g| g.numbers.len() == 8));
    }
}
