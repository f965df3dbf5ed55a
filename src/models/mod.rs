//! Domain model types.
//!
//! Constructors validate the structural invariants (number counts, ranges,
//! duplicates) so that the engines can assume well-formed inputs.

pub mod generation;
pub mod lottery;
pub mod stats;
pub mod ticket;

pub use generation::*;
pub use lottery::*;
pub use stats::*;
pub use ticket::*;

/// Validation failure raised by model constructors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("expected {expected} numbers, got {actual}")]
    WrongNumberCount { expected: u8, actual: usize },

    #[error("number {number} outside the allowed range {min}..={max}")]
    NumberOutOfRange { number: u8, min: u8, max: u8 },

    #[error("duplicate number {0}")]
    DuplicateNumber(u8),

    #[error("draw order is not a permutation of the drawn numbers")]
    DrawOrderMismatch,

    #[error("number domain {min}..={max} cannot hold {numbers_count} distinct numbers")]
    DomainTooSmall {
        min: u8,
        max: u8,
        numbers_count: u8,
    },

    #[error("bet size {bet_size} is smaller than the lottery's {numbers_count} drawn numbers")]
    BetSizeTooSmall { bet_size: u8, numbers_count: u8 },

    #[error("prize tier rank {0} appears more than once in the draw")]
    DuplicateTierRank(u8),
}
