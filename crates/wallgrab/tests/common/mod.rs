//! Shared test utilities for wallgrab integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with temp input/output/scratch folders
//! - Fake extraction tools standing in for RePKG (Unix only)

pub mod harness;

pub use harness::TestHarness;
