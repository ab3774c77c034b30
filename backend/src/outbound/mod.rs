//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: a process-local store used when no database is configured.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules beyond the constraints storage must enforce.

pub mod memory;
pub mod persistence;
