use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCollections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserCollections::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserCollections::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserCollections::CardId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserCollections::Condition)
                            .string_len(16)
                            .not_null()
                            .default("near_mint")
                            .check(Expr::col(UserCollections::Condition).is_in([
                                "mint",
                                "near_mint",
                                "light_play",
                                "moderate_play",
                                "heavy_play",
                                "damaged",
                            ])),
                    )
                    .col(
                        ColumnDef::new(UserCollections::Quantity)
                            .integer()
                            .not_null()
                            .default(1)
                            .check(Expr::col(UserCollections::Quantity).gt(0)),
                    )
                    .col(ColumnDef::new(UserCollections::PurchasePrice).decimal_len(12, 2))
                    .col(ColumnDef::new(UserCollections::PurchaseDate).date())
                    .col(ColumnDef::new(UserCollections::Notes).text())
                    .col(
                        ColumnDef::new(UserCollections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserCollections::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserCollections::Table, UserCollections::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(UserCollections::Table)
                    .col(UserCollections::UserId)
                    .col(UserCollections::CardId)
                    .col(UserCollections::Condition)
                    .unique()
                    .name("uq_user_collections_user_card_condition")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCollections::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserCollections {
    Table,
    Id,
    UserId,
    CardId,
    Condition,
    Quantity,
    PurchasePrice,
    PurchaseDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
}
