use std::str::FromStr;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait as _, Select, SqlErr,
    sea_query::{Alias, Expr, JoinType, OnConflict},
};
use uuid::Uuid;

use cardvault_catalog_schema::{card_prices, cards, profiles, user_collections};
use cardvault_core::sea_ext::contains_ignore_case;
use cardvault_domain::card::{Condition, Currency, Game, UnknownVariant};
use cardvault_domain::pagination::Sort;

use crate::domain::repository::{
    CardRepository, CollectionRepository, PriceRepository, ProfileRepository,
};
use crate::domain::types::{
    Card, CardFilter, CardSortBy, CollectionEntry, CollectionFilter, OwnedCard, PriceRecord,
    Profile,
};
use crate::error::CatalogServiceError;

/// Map a unique-index violation to `conflict`, anything else to an internal error.
fn conflict_or_internal(
    err: DbErr,
    conflict: CatalogServiceError,
    context: &'static str,
) -> CatalogServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => CatalogServiceError::Internal(anyhow::Error::new(err).context(context)),
    }
}

fn parse_column<T>(column: &'static str, value: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .parse()
        .with_context(|| format!("stored {column} column"))
}

// ── Card repository ─────────────────────────────────────────────────────────

/// Filtered, sorted and paged card listing.
fn card_list_query(filter: &CardFilter) -> Select<cards::Entity> {
    let page = filter.page.clamped();
    let mut query = cards::Entity::find();
    if let Some(game) = filter.game {
        query = query.filter(cards::Column::Game.eq(game.as_str()));
    }
    if let Some(search) = filter.search.as_deref() {
        query = query.filter(contains_ignore_case(cards::Column::Name, search));
    }
    query = match filter.sort_by {
        CardSortBy::Name(Sort::Asc) => query.order_by_asc(cards::Column::Name),
        CardSortBy::Name(Sort::Desc) => query.order_by_desc(cards::Column::Name),
        CardSortBy::CreatedAt(Sort::Asc) => query.order_by_asc(cards::Column::CreatedAt),
        CardSortBy::CreatedAt(Sort::Desc) => query.order_by_desc(cards::Column::CreatedAt),
    };
    query
        .order_by_asc(cards::Column::Id)
        .offset(page.offset)
        .limit(page.limit)
}

#[derive(Clone)]
pub struct DbCardRepository {
    pub db: DatabaseConnection,
}

impl CardRepository for DbCardRepository {
    async fn list(&self, filter: &CardFilter) -> Result<Vec<Card>, CatalogServiceError> {
        let models = card_list_query(filter)
            .all(&self.db)
            .await
            .context("list cards")?;
        Ok(models
            .into_iter()
            .map(card_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, CatalogServiceError> {
        let model = cards::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find card by id")?;
        Ok(model.map(card_from_model).transpose()?)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Card>, CatalogServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = cards::Entity::find()
            .filter(cards::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find cards by ids")?;
        Ok(models
            .into_iter()
            .map(card_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn find_by_identity(&self, card: &Card) -> Result<Option<Card>, CatalogServiceError> {
        let mut query = cards::Entity::find()
            .filter(cards::Column::Name.eq(card.name.as_str()))
            .filter(cards::Column::Game.eq(card.game.as_str()));
        query = match card.set_name.as_deref() {
            Some(set) => query.filter(cards::Column::SetName.eq(set)),
            None => query.filter(cards::Column::SetName.is_null()),
        };
        query = match card.card_number.as_deref() {
            Some(number) => query.filter(cards::Column::CardNumber.eq(number)),
            None => query.filter(cards::Column::CardNumber.is_null()),
        };
        let model = query
            .one(&self.db)
            .await
            .context("find card by identity")?;
        Ok(model.map(card_from_model).transpose()?)
    }

    async fn create(&self, card: &Card) -> Result<(), CatalogServiceError> {
        card_active_model(card)
            .insert(&self.db)
            .await
            .map_err(|e| {
                conflict_or_internal(e, CatalogServiceError::CardAlreadyExists, "create card")
            })?;
        Ok(())
    }

    async fn update(&self, card: &Card) -> Result<(), CatalogServiceError> {
        card_active_model(card)
            .update(&self.db)
            .await
            .map_err(|e| {
                conflict_or_internal(e, CatalogServiceError::CardAlreadyExists, "update card")
            })?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogServiceError> {
        let res = cards::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete card")?;
        Ok(res.rows_affected > 0)
    }
}

fn card_active_model(card: &Card) -> cards::ActiveModel {
    cards::ActiveModel {
        id: Set(card.id),
        name: Set(card.name.clone()),
        game: Set(card.game.as_str().to_owned()),
        set_name: Set(card.set_name.clone()),
        rarity: Set(card.rarity.clone()),
        card_number: Set(card.card_number.clone()),
        image_url: Set(card.image_url.clone()),
        description: Set(card.description.clone()),
        created_at: Set(card.created_at),
        updated_at: Set(card.updated_at),
    }
}

fn card_from_model(model: cards::Model) -> anyhow::Result<Card> {
    Ok(Card {
        id: model.id,
        game: parse_column("game", &model.game)?,
        name: model.name,
        set_name: model.set_name,
        rarity: model.rarity,
        card_number: model.card_number,
        image_url: model.image_url,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Price repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPriceRepository {
    pub db: DatabaseConnection,
}

impl PriceRepository for DbPriceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceRecord>, CatalogServiceError> {
        let model = card_prices::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find price by id")?;
        Ok(model.map(price_from_model).transpose()?)
    }

    async fn list_for_cards(
        &self,
        card_ids: &[Uuid],
        currency: Currency,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        if card_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = card_prices::Entity::find()
            .filter(card_prices::Column::CardId.is_in(card_ids.iter().copied()))
            .filter(card_prices::Column::Currency.eq(currency.as_str()))
            .all(&self.db)
            .await
            .context("list prices for cards")?;
        Ok(models
            .into_iter()
            .map(price_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn history(
        &self,
        card_id: Uuid,
        condition: Condition,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        let models = card_prices::Entity::find()
            .filter(card_prices::Column::CardId.eq(card_id))
            .filter(card_prices::Column::Condition.eq(condition.as_str()))
            .filter(card_prices::Column::RecordedAt.gte(since))
            .filter(card_prices::Column::RecordedAt.lte(until))
            .order_by_asc(card_prices::Column::RecordedAt)
            .order_by_asc(card_prices::Column::Id)
            .all(&self.db)
            .await
            .context("list price history")?;
        Ok(models
            .into_iter()
            .map(price_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list_recorded_since(
        &self,
        since: DateTime<Utc>,
        game: Option<Game>,
        currency: Currency,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        let mut query = card_prices::Entity::find()
            .filter(card_prices::Column::RecordedAt.gte(since))
            .filter(card_prices::Column::Currency.eq(currency.as_str()));
        if let Some(game) = game {
            query = query
                .join(JoinType::InnerJoin, card_prices::Relation::Card.def())
                .filter(cards::Column::Game.eq(game.as_str()));
        }
        let models = query
            .all(&self.db)
            .await
            .context("list prices recorded since")?;
        Ok(models
            .into_iter()
            .map(price_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn create(&self, record: &PriceRecord) -> Result<(), CatalogServiceError> {
        price_active_model(record)
            .insert(&self.db)
            .await
            .context("create price record")?;
        Ok(())
    }

    async fn update(&self, record: &PriceRecord) -> Result<(), CatalogServiceError> {
        price_active_model(record)
            .update(&self.db)
            .await
            .context("update price record")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogServiceError> {
        let res = card_prices::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete price record")?;
        Ok(res.rows_affected > 0)
    }
}

fn price_active_model(record: &PriceRecord) -> card_prices::ActiveModel {
    card_prices::ActiveModel {
        id: Set(record.id),
        card_id: Set(record.card_id),
        condition: Set(record.condition.as_str().to_owned()),
        price: Set(record.price),
        currency: Set(record.currency.as_str().to_owned()),
        source: Set(record.source.clone()),
        recorded_at: Set(record.recorded_at),
    }
}

fn price_from_model(model: card_prices::Model) -> anyhow::Result<PriceRecord> {
    Ok(PriceRecord {
        id: model.id,
        card_id: model.card_id,
        condition: parse_column("condition", &model.condition)?,
        price: model.price,
        currency: parse_column("currency", &model.currency)?,
        source: model.source,
        recorded_at: model.recorded_at,
    })
}

// ── Collection repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCollectionRepository {
    pub db: DatabaseConnection,
}

impl CollectionRepository for DbCollectionRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &CollectionFilter,
    ) -> Result<Vec<OwnedCard>, CatalogServiceError> {
        let page = filter.page.clamped();
        let mut query = user_collections::Entity::find()
            .find_also_related(cards::Entity)
            .filter(user_collections::Column::UserId.eq(user_id));
        if let Some(game) = filter.game {
            query = query.filter(cards::Column::Game.eq(game.as_str()));
        }
        if let Some(condition) = filter.condition {
            query = query.filter(user_collections::Column::Condition.eq(condition.as_str()));
        }
        let rows = query
            .order_by_desc(user_collections::Column::CreatedAt)
            .order_by_desc(user_collections::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list collection")?;
        Ok(rows
            .into_iter()
            .map(owned_card_from_row)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<OwnedCard>, CatalogServiceError> {
        let rows = user_collections::Entity::find()
            .find_also_related(cards::Entity)
            .filter(user_collections::Column::UserId.eq(user_id))
            .order_by_desc(user_collections::Column::CreatedAt)
            .order_by_desc(user_collections::Column::Id)
            .all(&self.db)
            .await
            .context("list whole collection")?;
        Ok(rows
            .into_iter()
            .map(owned_card_from_row)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<OwnedCard>, CatalogServiceError> {
        let row = user_collections::Entity::find_by_id(id)
            .find_also_related(cards::Entity)
            .filter(user_collections::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("get collection entry")?;
        Ok(row.map(owned_card_from_row).transpose()?)
    }

    async fn find_by_key(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        condition: Condition,
    ) -> Result<Option<CollectionEntry>, CatalogServiceError> {
        let model = user_collections::Entity::find()
            .filter(user_collections::Column::UserId.eq(user_id))
            .filter(user_collections::Column::CardId.eq(card_id))
            .filter(user_collections::Column::Condition.eq(condition.as_str()))
            .one(&self.db)
            .await
            .context("find collection entry by key")?;
        Ok(model.map(collection_entry_from_model).transpose()?)
    }

    async fn add_or_increment(
        &self,
        entry: &CollectionEntry,
    ) -> Result<CollectionEntry, CatalogServiceError> {
        use user_collections::Column;

        // Single statement, so concurrent adds of the same key both land.
        let model = user_collections::Entity::insert(collection_active_model(entry))
            .on_conflict(
                OnConflict::columns([Column::UserId, Column::CardId, Column::Condition])
                    .value(
                        Column::Quantity,
                        Expr::col((user_collections::Entity, Column::Quantity))
                            .add(Expr::col((Alias::new("excluded"), Column::Quantity))),
                    )
                    .update_column(Column::UpdatedAt)
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .context("add or increment collection entry")?;
        Ok(collection_entry_from_model(model)?)
    }

    async fn update(&self, entry: &CollectionEntry) -> Result<(), CatalogServiceError> {
        user_collections::Entity::update(collection_active_model(entry))
            .filter(user_collections::Column::UserId.eq(entry.user_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                conflict_or_internal(
                    e,
                    CatalogServiceError::DuplicateCollectionEntry,
                    "update collection entry",
                )
            })?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CatalogServiceError> {
        let res = user_collections::Entity::delete_many()
            .filter(user_collections::Column::Id.eq(id))
            .filter(user_collections::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete collection entry")?;
        Ok(res.rows_affected > 0)
    }
}

fn collection_active_model(entry: &CollectionEntry) -> user_collections::ActiveModel {
    user_collections::ActiveModel {
        id: Set(entry.id),
        user_id: Set(entry.user_id),
        card_id: Set(entry.card_id),
        condition: Set(entry.condition.as_str().to_owned()),
        quantity: Set(entry.quantity),
        purchase_price: Set(entry.purchase_price),
        purchase_date: Set(entry.purchase_date),
        notes: Set(entry.notes.clone()),
        created_at: Set(entry.created_at),
        updated_at: Set(entry.updated_at),
    }
}

fn collection_entry_from_model(model: user_collections::Model) -> anyhow::Result<CollectionEntry> {
    Ok(CollectionEntry {
        id: model.id,
        user_id: model.user_id,
        card_id: model.card_id,
        condition: parse_column("condition", &model.condition)?,
        quantity: model.quantity,
        purchase_price: model.purchase_price,
        purchase_date: model.purchase_date,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn owned_card_from_row(
    (entry, card): (user_collections::Model, Option<cards::Model>),
) -> anyhow::Result<OwnedCard> {
    let card = card.with_context(|| format!("collection entry {} has no card", entry.id))?;
    Ok(OwnedCard {
        entry: collection_entry_from_model(entry)?,
        card: card_from_model(card)?,
    })
}

// ── Profile repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, CatalogServiceError> {
        let model = profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profile by id")?;
        Ok(model.map(profile_from_model))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Profile>, CatalogServiceError> {
        let model = profiles::Entity::find()
            .filter(profiles::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find profile by username")?;
        Ok(model.map(profile_from_model))
    }

    async fn create(&self, profile: &Profile) -> Result<(), CatalogServiceError> {
        // Two first requests may race; the loser keeps the winner's row.
        profiles::Entity::insert(profile_active_model(profile))
            .on_conflict(
                OnConflict::column(profiles::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create profile")?;
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> Result<(), CatalogServiceError> {
        profile_active_model(profile)
            .update(&self.db)
            .await
            .map_err(|e| {
                conflict_or_internal(e, CatalogServiceError::UsernameTaken, "update profile")
            })?;
        Ok(())
    }
}

fn profile_active_model(profile: &Profile) -> profiles::ActiveModel {
    profiles::ActiveModel {
        id: Set(profile.id),
        username: Set(profile.username.clone()),
        display_name: Set(profile.display_name.clone()),
        avatar_url: Set(profile.avatar_url.clone()),
        created_at: Set(profile.created_at),
        updated_at: Set(profile.updated_at),
    }
}

fn profile_from_model(model: profiles::Model) -> Profile {
    Profile {
        id: model.id,
        username: model.username,
        display_name: model.display_name,
        avatar_url: model.avatar_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
