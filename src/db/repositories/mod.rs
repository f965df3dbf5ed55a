//! Repository implementations.
//!
//! Only the in-memory `local` backend ships with the core; a real database
//! backend plugs in by implementing the traits in [`crate::db::repository`].

pub mod local;

pub use local::LocalRepository;
