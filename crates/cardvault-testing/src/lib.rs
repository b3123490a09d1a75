//! Test utilities for CardVault crates.
//!
//! Provides `MockAuth`, which stands in for the external identity provider.
//! Import in `#[cfg(test)]` blocks and `tests/` only — never in production code.

pub mod auth;
