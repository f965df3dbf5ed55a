//! # Loterias Rust
//!
//! Core engine for tracking Brazilian lottery results.
//!
//! This crate stores official draw results, computes per-draw and aggregate
//! statistics, generates constrained game suggestions, and checks saved
//! bet tickets against stored draws.
//!
//! ## Features
//!
//! - **Draw Tracking**: Persist official contest results with prize tiers
//! - **Statistics**: Per-draw metrics and windowed aggregate reports with caching
//! - **Game Generation**: Random games satisfying user-defined constraints
//! - **Ticket Checking**: Idempotent line-by-line hit and prize evaluation
//! - **Results Sync**: Explicit write path from a results provider into storage
//!
//! ## Architecture
//!
//! - [`models`]: Domain types and their validation rules
//! - [`db`]: Repository traits and the in-memory implementation
//! - [`stats`]: Metric calculator, aggregate reports, and the stats cache
//! - [`generator`]: Constraint rules and the rejection-sampling generator
//! - [`checker`]: Ticket checking against stored draws
//! - [`provider`]: Results-provider contract and the draw ingestion path
//! - [`config`]: Lottery catalog with builtin defaults and TOML overlay

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod checker;
pub mod config;
pub mod db;
pub mod generator;
pub mod models;
pub mod provider;
pub mod stats;

pub use checker::{check_ticket, CheckError};
pub use config::LotteryCatalog;
pub use db::repository::{FullRepository, RepositoryError, RepositoryResult};
pub use generator::{GameGenerator, GenerationError};
pub use stats::StatsManager;
