use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(CardPrices::Table)
                    .col(CardPrices::CardId)
                    .col(CardPrices::Condition)
                    .col(CardPrices::RecordedAt)
                    .name("idx_card_prices_card_condition_recorded_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(CardPrices::Table)
                    .col(CardPrices::RecordedAt)
                    .name("idx_card_prices_recorded_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(UserCollections::Table)
                    .col(UserCollections::UserId)
                    .name("idx_user_collections_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_collections_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_card_prices_recorded_at").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_card_prices_card_condition_recorded_at")
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum CardPrices {
    Table,
    CardId,
    Condition,
    RecordedAt,
}

#[derive(Iden)]
enum UserCollections {
    Table,
    UserId,
}
