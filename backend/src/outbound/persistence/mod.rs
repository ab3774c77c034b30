//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one driven port from
//! [`crate::domain::ports`] over a shared [`DbPool`]. Diesel row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module; repositories convert rows into validated domain types and map
//! database failures onto their port's error enum.
//!
//! # Example
//!
//! ```no_run
//! use polls::outbound::persistence::{DbPool, DieselVoteRepository, PoolConfig, run_migrations};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://polls@localhost/polls";
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let votes = DieselVoteRepository::new(pool);
//! # let _ = votes;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_category_repository;
pub(crate) mod diesel_helpers;
mod diesel_poll_repository;
mod diesel_vote_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_poll_repository::DieselPollRepository;
pub use diesel_vote_repository::DieselVoteRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
