//! # account-database
//!
//! The [`CredentialStore`] contract consumed by the session layer, its
//! PostgreSQL implementation on top of sqlx repositories, and a
//! process-local in-memory implementation.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
pub use store::CredentialStore;
