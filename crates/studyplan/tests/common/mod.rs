//! Shared test utilities for studyplan integration tests.
//!
//! This module provides:
//! - `FakeBackend`, a scripted stand-in for the remote AI service
//! - `TestHarness` for sessions backed by a temporary data directory

pub mod backend;
pub mod harness;

pub use backend::{analysis_json, Answer, FakeBackend};
pub use harness::TestHarness;
