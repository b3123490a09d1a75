use sea_orm_migration::prelude::*;

mod m20250601_000001_create_cards;
mod m20250601_000002_create_card_prices;
mod m20250601_000003_create_user_collections;
mod m20250601_000004_create_profiles;
mod m20250601_000005_add_price_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_cards::Migration),
            Box::new(m20250601_000002_create_card_prices::Migration),
            Box::new(m20250601_000003_create_user_collections::Migration),
            Box::new(m20250601_000004_create_profiles::Migration),
            Box::new(m20250601_000005_add_price_indexes::Migration),
        ]
    }
}
