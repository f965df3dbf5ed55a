//! Persistence layer: repository traits and the in-memory backend.
//!
//! The engines never touch storage directly; they go through the trait
//! contracts defined in [`repository`], so a database-backed implementation
//! can replace [`LocalRepository`] without touching engine code.

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
pub use repository::{
    DrawFilter, DrawRepository, ErrorContext, FullRepository, LotteryRepository,
    RepositoryError, RepositoryResult, TicketRepository,
};
