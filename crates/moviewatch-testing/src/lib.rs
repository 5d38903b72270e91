//! Test utilities for MovieWatch services.
//!
//! Import from `[dev-dependencies]` only, never from production code.

pub mod auth;
pub mod body;
