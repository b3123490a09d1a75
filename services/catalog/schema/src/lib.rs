//! sea-orm entities for the catalog service tables.
//!
//! Enum-valued columns (`game`, `condition`, `currency`) are plain text here;
//! the service maps them to `cardvault_domain` enums and the migrations pin the
//! allowed values with CHECK constraints.

pub mod card_prices;
pub mod cards;
pub mod profiles;
pub mod user_collections;
