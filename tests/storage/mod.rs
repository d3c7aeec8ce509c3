//! Shared storage integration tests.
//!
//! Tests the ItemStore interface against all implementations.
//! Each implementation module imports these test functions and runs them.

pub mod item_store_tests;
