//! Identifier newtypes shared across the crate.
//!
//! Every persisted entity is keyed by an `i64` assigned by the repository.
//! Wrapping the raw integers keeps lottery, draw and ticket ids from being
//! mixed up at call sites.

use serde::{Deserialize, Serialize};

/// Lottery identifier (repository primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LotteryId(pub i64);

/// Draw identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrawId(pub i64);

/// Ticket identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(pub i64);

/// Bet line identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BetLineId(pub i64);

/// Check result identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CheckResultId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(LotteryId);
impl_id!(DrawId);
impl_id!(TicketId);
impl_id!(BetLineId);
impl_id!(CheckResultId);
