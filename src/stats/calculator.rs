//! Pure per-draw metric computation.
//!
//! Everything here is deterministic over the number set; persistence and
//! aggregation live elsewhere.

use crate::models::DrawStatistics;

/// Compute all metrics for a set of drawn numbers.
///
/// `previous` is the preceding contest's numbers; the overlap metric is 0
/// when it is absent. An empty `numbers` slice yields all-zero metrics.
pub fn compute_metrics(numbers: &[u8], previous: Option<&[u8]>) -> DrawStatistics {
    if numbers.is_empty() {
        return DrawStatistics::default();
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();

    DrawStatistics {
        sum: numbers.iter().map(|&n| n as u32).sum(),
        even_count: count_evens(numbers),
        odd_count: count_odds(numbers),
        range: (sorted[sorted.len() - 1] - sorted[0]) as u32,
        prime_count: count_primes(numbers),
        consecutive_count: count_consecutive_pairs(&sorted),
        repeated_from_previous: count_repeated(numbers, previous),
    }
}

/// Trial-division primality with the 6k±1 wheel; n ≤ 1 is not prime.
pub fn is_prime(n: u8) -> bool {
    let n = n as u32;
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Count prime numbers in the slice.
pub fn count_primes(numbers: &[u8]) -> u8 {
    numbers.iter().filter(|&&n| is_prime(n)).count() as u8
}

/// Count even numbers.
pub fn count_evens(numbers: &[u8]) -> u8 {
    numbers.iter().filter(|&&n| n % 2 == 0).count() as u8
}

/// Count odd numbers.
pub fn count_odds(numbers: &[u8]) -> u8 {
    numbers.iter().filter(|&&n| n % 2 != 0).count() as u8
}

/// Count adjacent pairs differing by exactly 1. Input must be sorted.
///
/// `[1, 2, 4, 5, 8]` has 2 pairs (1-2 and 4-5).
pub fn count_consecutive_pairs(sorted: &[u8]) -> u8 {
    sorted
        .windows(2)
        .filter(|pair| pair[0] + 1 == pair[1])
        .count() as u8
}

/// Count numbers also present in the previous draw.
pub fn count_repeated(numbers: &[u8], previous: Option<&[u8]>) -> u8 {
    match previous {
        Some(prev) if !prev.is_empty() => {
            numbers.iter().filter(|n| prev.contains(n)).count() as u8
        }
        _ => 0,
    }
}
