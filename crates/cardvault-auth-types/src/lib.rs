//! Auth types shared across CardVault crates.
//!
//! Provides bearer-token validation and the `Identity` / `AdminIdentity` extractors.
//! Tokens are issued by the external identity provider; this crate only verifies them.

pub mod identity;
pub mod token;
