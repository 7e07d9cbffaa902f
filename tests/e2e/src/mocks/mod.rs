//! Test fixtures

pub mod fixtures;

pub use fixtures::{BatchConfig, TestDataFactory};
