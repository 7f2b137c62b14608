//! Shared mocks, fixtures and set-up for the integration tests.

pub mod containers;
pub mod mocks;
pub mod setup;
