use sea_orm::entity::prelude::*;

/// A catalog card. Unique on (name, game, set_name, card_number).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub game: String,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::card_prices::Entity")]
    CardPrices,
    #[sea_orm(has_many = "super::user_collections::Entity")]
    UserCollections,
}

impl Related<super::card_prices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardPrices.def()
    }
}

impl Related<super::user_collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCollections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
