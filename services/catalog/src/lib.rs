pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod infra;
pub mod router;
pub mod state;
#[cfg(any(feature = "USE_ONLY_IN_TESTS", test))]
pub mod testing;
pub mod usecase;
