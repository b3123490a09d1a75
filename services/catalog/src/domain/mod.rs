pub mod pricing;
pub mod repository;
pub mod types;
