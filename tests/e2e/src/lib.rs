//! End-to-end test support for the Revisit engine

pub mod mocks;

pub use mocks::{BatchConfig, TestDataFactory};
