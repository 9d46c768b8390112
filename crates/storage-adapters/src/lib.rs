//! # storage-adapters
//!
//! Implementations of the persistence-side ports: post repositories, the
//! attachment store, the public config file, settings and audit writers.

pub mod audit;
pub mod config_file;
pub mod files;
pub mod memory;
pub mod settings;

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(test)]
mod contract;

pub use audit::{JsonlAuditLog, MemoryAuditLog, TracingAuditLog};
pub use config_file::JsonFileConfigSource;
pub use files::LocalFileStore;
pub use memory::InMemoryPostRepository;
pub use settings::InMemorySettings;

#[cfg(feature = "db-postgres")]
pub use postgres::PgPostRepository;
