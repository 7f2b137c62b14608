//! ClickHouse storage for the supplementary archive.

pub mod client;
pub mod config;
pub mod health;
pub mod query;
pub mod schema;
pub mod store;

pub use client::*;
pub use config::*;
pub use query::*;
pub use store::{ArchiveStore, ClickHouseStore, SuppRow};
