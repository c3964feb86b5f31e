//! Shared utilities for `dectest`.
//!
//! - Progress indicators for runs over several test files

pub mod progress;
