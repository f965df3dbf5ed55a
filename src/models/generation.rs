//! Generation configuration and output types.

use serde::{Deserialize, Serialize};

/// User-supplied constraints for game generation.
///
/// Absent fields leave the corresponding rule out of the validator chain
/// entirely; a rule with neither bound present is never built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub min_sum: Option<u32>,
    pub max_sum: Option<u32>,
    pub min_even: Option<u8>,
    pub max_even: Option<u8>,
    pub min_primes: Option<u8>,
    pub max_primes: Option<u8>,
    pub exclude_numbers: Vec<u8>,
    pub fixed_numbers: Vec<u8>,
    /// Overrides the lottery's default numbers-per-game when set.
    pub numbers_count: Option<u8>,
}

/// One accepted generated game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedGame {
    /// Sorted ascending, `numbers_count` entries.
    pub numbers: Vec<u8>,
    /// Heuristic quality in `[0, 10]`.
    pub score: f64,
    /// Description of every rule active during generation.
    pub met_rules: Vec<String>,
}
