use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CardPrices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardPrices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardPrices::CardId).uuid().not_null())
                    .col(
                        ColumnDef::new(CardPrices::Condition)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(CardPrices::Condition).is_in([
                                "mint",
                                "near_mint",
                                "light_play",
                                "moderate_play",
                                "heavy_play",
                                "damaged",
                            ])),
                    )
                    .col(
                        ColumnDef::new(CardPrices::Price)
                            .decimal_len(12, 2)
                            .not_null()
                            .check(Expr::col(CardPrices::Price).gt(0)),
                    )
                    .col(
                        ColumnDef::new(CardPrices::Currency)
                            .char_len(3)
                            .not_null()
                            .default("USD")
                            .check(Expr::col(CardPrices::Currency).is_in([
                                "USD", "EUR", "GBP", "JPY", "CAD", "AUD",
                            ])),
                    )
                    .col(ColumnDef::new(CardPrices::Source).string())
                    .col(
                        ColumnDef::new(CardPrices::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CardPrices::Table, CardPrices::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CardPrices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CardPrices {
    Table,
    Id,
    CardId,
    Condition,
    Price,
    Currency,
    Source,
    RecordedAt,
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
}
