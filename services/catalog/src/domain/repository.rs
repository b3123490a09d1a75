#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cardvault_domain::card::{Condition, Currency, Game};

use crate::domain::types::{
    Card, CardFilter, CollectionEntry, CollectionFilter, OwnedCard, PriceRecord, Profile,
};
use crate::error::CatalogServiceError;

/// Repository for catalog cards.
pub trait CardRepository: Send + Sync {
    async fn list(&self, filter: &CardFilter) -> Result<Vec<Card>, CatalogServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, CatalogServiceError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Card>, CatalogServiceError>;

    /// Look up a card by its natural key (name, game, set_name, card_number).
    async fn find_by_identity(&self, card: &Card) -> Result<Option<Card>, CatalogServiceError>;

    async fn create(&self, card: &Card) -> Result<(), CatalogServiceError>;
    async fn update(&self, card: &Card) -> Result<(), CatalogServiceError>;

    /// Delete a card and, by cascade, its prices and collection entries.
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, CatalogServiceError>;
}

/// Repository for the price ledger.
pub trait PriceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceRecord>, CatalogServiceError>;

    /// Every record of the given cards in `currency`, unordered.
    async fn list_for_cards(
        &self,
        card_ids: &[Uuid],
        currency: Currency,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError>;

    /// Records of one card recorded within `[since, until]`, ascending by
    /// `(recorded_at, id)`.
    async fn history(
        &self,
        card_id: Uuid,
        condition: Condition,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError>;

    /// Records in `currency` recorded at or after `since`, optionally limited to one game.
    async fn list_recorded_since(
        &self,
        since: DateTime<Utc>,
        game: Option<Game>,
        currency: Currency,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError>;

    async fn create(&self, record: &PriceRecord) -> Result<(), CatalogServiceError>;
    async fn update(&self, record: &PriceRecord) -> Result<(), CatalogServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, CatalogServiceError>;
}

/// Repository for user collections. Every query is scoped to `user_id`.
pub trait CollectionRepository: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &CollectionFilter,
    ) -> Result<Vec<OwnedCard>, CatalogServiceError>;

    /// The whole collection in listing order, unpaginated.
    async fn list_all(&self, user_id: Uuid) -> Result<Vec<OwnedCard>, CatalogServiceError>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<OwnedCard>, CatalogServiceError>;

    async fn find_by_key(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        condition: Condition,
    ) -> Result<Option<CollectionEntry>, CatalogServiceError>;

    /// Insert `entry`, or add its quantity to the existing entry with the same
    /// (user, card, condition). Returns the stored entry.
    async fn add_or_increment(
        &self,
        entry: &CollectionEntry,
    ) -> Result<CollectionEntry, CatalogServiceError>;

    async fn update(&self, entry: &CollectionEntry) -> Result<(), CatalogServiceError>;

    /// Returns `true` if a row owned by `user_id` was deleted.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CatalogServiceError>;
}

/// Repository for user profiles.
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, CatalogServiceError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<Profile>, CatalogServiceError>;
    async fn create(&self, profile: &Profile) -> Result<(), CatalogServiceError>;
    async fn update(&self, profile: &Profile) -> Result<(), CatalogServiceError>;
}
