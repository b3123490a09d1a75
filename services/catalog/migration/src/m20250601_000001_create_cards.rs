use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cards::Name).string().not_null())
                    .col(
                        ColumnDef::new(Cards::Game)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(Cards::Game).is_in(["yugioh", "mtg", "pokemon"])),
                    )
                    .col(ColumnDef::new(Cards::SetName).string())
                    .col(ColumnDef::new(Cards::Rarity).string())
                    .col(ColumnDef::new(Cards::CardNumber).string())
                    .col(ColumnDef::new(Cards::ImageUrl).string())
                    .col(ColumnDef::new(Cards::Description).text())
                    .col(
                        ColumnDef::new(Cards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Cards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Cards::Table)
                    .col(Cards::Name)
                    .col(Cards::Game)
                    .col(Cards::SetName)
                    .col(Cards::CardNumber)
                    .unique()
                    .nulls_not_distinct()
                    .name("uq_cards_name_game_set_number")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Cards::Table)
                    .col(Cards::Game)
                    .name("idx_cards_game")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
    Name,
    Game,
    SetName,
    Rarity,
    CardNumber,
    ImageUrl,
    Description,
    CreatedAt,
    UpdatedAt,
}
