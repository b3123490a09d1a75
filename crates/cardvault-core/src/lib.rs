//! Cross-cutting service plumbing: error bodies, health checks, middleware,
//! configuration, tracing, and small sea-orm / time helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod time;
pub mod tracing;
