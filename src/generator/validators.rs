//! Rule validators for game generation.
//!
//! Each rule checks one property of a candidate number set. The chain is an
//! unordered AND: a candidate must pass every active rule. Rules whose
//! config keys are absent are not built at all.

use std::collections::BTreeSet;

use crate::models::GenerationConfig;
use crate::stats::calculator::{count_evens, count_primes};

/// One generation constraint.
pub trait Rule: Send + Sync {
    /// Check whether the candidate meets this rule.
    fn validate(&self, numbers: &[u8]) -> bool;

    /// Human-readable description of the rule.
    fn describe(&self) -> String;
}

/// Total of the numbers within `[min, max]`; an absent bound is open.
pub struct SumRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Rule for SumRange {
    fn validate(&self, numbers: &[u8]) -> bool {
        let total: u32 = numbers.iter().map(|&n| n as u32).sum();
        if self.min.is_some_and(|min| total < min) {
            return false;
        }
        if self.max.is_some_and(|max| total > max) {
            return false;
        }
        true
    }

    fn describe(&self) -> String {
        format!("Soma: {}", bounds_label(self.min, self.max))
    }
}

/// Count of even numbers within `[min, max]`.
pub struct EvenCountRange {
    pub min: Option<u8>,
    pub max: Option<u8>,
}

impl Rule for EvenCountRange {
    fn validate(&self, numbers: &[u8]) -> bool {
        let evens = count_evens(numbers);
        if self.min.is_some_and(|min| evens < min) {
            return false;
        }
        if self.max.is_some_and(|max| evens > max) {
            return false;
        }
        true
    }

    fn describe(&self) -> String {
        format!("Pares: {}", bounds_label(self.min, self.max))
    }
}

/// Count of prime numbers within `[min, max]`.
pub struct PrimeCountRange {
    pub min: Option<u8>,
    pub max: Option<u8>,
}

impl Rule for PrimeCountRange {
    fn validate(&self, numbers: &[u8]) -> bool {
        let primes = count_primes(numbers);
        if self.min.is_some_and(|min| primes < min) {
            return false;
        }
        if self.max.is_some_and(|max| primes > max) {
            return false;
        }
        true
    }

    fn describe(&self) -> String {
        format!("Primos: {}", bounds_label(self.min, self.max))
    }
}

/// Fails when the candidate contains any forbidden number.
pub struct Exclusion {
    pub excluded: BTreeSet<u8>,
}

impl Rule for Exclusion {
    fn validate(&self, numbers: &[u8]) -> bool {
        !numbers.iter().any(|n| self.excluded.contains(n))
    }

    fn describe(&self) -> String {
        format!("Excluir: {:?}", self.excluded.iter().collect::<Vec<_>>())
    }
}

/// Fails unless every required number is present in the candidate.
pub struct Inclusion {
    pub required: BTreeSet<u8>,
}

impl Rule for Inclusion {
    fn validate(&self, numbers: &[u8]) -> bool {
        self.required.iter().all(|n| numbers.contains(n))
    }

    fn describe(&self) -> String {
        format!("Fixar: {:?}", self.required.iter().collect::<Vec<_>>())
    }
}

fn bounds_label<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    let mut parts = Vec::new();
    if let Some(min) = min {
        parts.push(format!("min {}", min));
    }
    if let Some(max) = max {
        parts.push(format!("max {}", max));
    }
    parts.join(", ")
}

/// Build the validator chain from the config, skipping constraints with no
/// bounds present.
pub fn build_rules(config: &GenerationConfig) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();

    if config.min_sum.is_some() || config.max_sum.is_some() {
        rules.push(Box::new(SumRange {
            min: config.min_sum,
            max: config.max_sum,
        }));
    }
    if config.min_even.is_some() || config.max_even.is_some() {
        rules.push(Box::new(EvenCountRange {
            min: config.min_even,
            max: config.max_even,
        }));
    }
    if config.min_primes.is_some() || config.max_primes.is_some() {
        rules.push(Box::new(PrimeCountRange {
            min: config.min_primes,
            max: config.max_primes,
        }));
    }
    if !config.exclude_numbers.is_empty() {
        rules.push(Box::new(Exclusion {
            excluded: config.exclude_numbers.iter().copied().collect(),
        }));
    }
    if !config.fixed_numbers.is_empty() {
        rules.push(Box::new(Inclusion {
            required: config.fixed_numbers.iter().copied().collect(),
        }));
    }

    rules
}
