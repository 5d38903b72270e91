//! Cross-cutting plumbing: tracing setup, request ids, env config helpers,
//! health endpoint, serde helpers and sea-orm extensions.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
