pub use cardvault_catalog::testing::{MemoryRepo, dollars, price_at};
