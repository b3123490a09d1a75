//! Domain types shared across CardVault crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! The catalog service and the HTTP client both speak these enums on the wire.

pub mod card;
pub mod pagination;
pub mod user;
