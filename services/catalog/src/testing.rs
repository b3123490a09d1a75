//! In-memory repositories and fixtures shared by the unit and integration suites.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use cardvault_domain::card::{Condition, Currency, Game};
use cardvault_domain::pagination::Sort;

use crate::domain::repository::{
    CardRepository, CollectionRepository, PriceRepository, ProfileRepository,
};
use crate::domain::types::{
    Card, CardFilter, CardSortBy, CollectionEntry, CollectionFilter, OwnedCard, PriceRecord,
    Profile,
};
use crate::error::CatalogServiceError;

// ── Store ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Store {
    cards: Mutex<Vec<Card>>,
    prices: Mutex<Vec<PriceRecord>>,
    entries: Mutex<Vec<CollectionEntry>>,
    profiles: Mutex<Vec<Profile>>,
    writes: Mutex<Vec<&'static str>>,
}

/// Stand-in for every repository trait. Clones share one store, the way
/// `AppState` hands out database repositories over one pool. Every write is
/// logged by name in `writes()`.
#[derive(Clone, Default)]
pub struct MemoryRepo {
    store: Arc<Store>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(self, cards: Vec<Card>) -> Self {
        self.store.cards.lock().unwrap().extend(cards);
        self
    }

    pub fn with_prices(self, prices: Vec<PriceRecord>) -> Self {
        self.store.prices.lock().unwrap().extend(prices);
        self
    }

    pub fn with_entries(self, entries: Vec<CollectionEntry>) -> Self {
        self.store.entries.lock().unwrap().extend(entries);
        self
    }

    /// Seed a price without logging a write.
    pub fn insert_price(&self, record: PriceRecord) {
        self.store.prices.lock().unwrap().push(record);
    }

    pub fn writes(&self) -> Vec<&'static str> {
        self.store.writes.lock().unwrap().clone()
    }

    pub fn price_count(&self) -> usize {
        self.store.prices.lock().unwrap().len()
    }

    pub fn entry_count(&self) -> usize {
        self.store.entries.lock().unwrap().len()
    }

    fn record(&self, op: &'static str) {
        self.store.writes.lock().unwrap().push(op);
    }

    fn card_of(&self, card_id: Uuid) -> Option<Card> {
        self.store
            .cards
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == card_id)
            .cloned()
    }

    fn owned(&self, entry: CollectionEntry) -> Option<OwnedCard> {
        let card = self.card_of(entry.card_id)?;
        Some(OwnedCard { entry, card })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn card(name: &str, game: Game) -> Card {
    let now = Utc::now();
    Card {
        id: Uuid::now_v7(),
        name: name.into(),
        game,
        set_name: None,
        rarity: None,
        card_number: None,
        image_url: None,
        description: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn price_at(
    card_id: Uuid,
    condition: Condition,
    cents: i64,
    recorded_at: DateTime<Utc>,
) -> PriceRecord {
    PriceRecord {
        id: Uuid::now_v7(),
        card_id,
        condition,
        price: dollars(cents),
        currency: Currency::Usd,
        source: None,
        recorded_at,
    }
}

// ── CardRepository ───────────────────────────────────────────────────────────

impl CardRepository for MemoryRepo {
    async fn list(&self, filter: &CardFilter) -> Result<Vec<Card>, CatalogServiceError> {
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut cards: Vec<Card> = self
            .store
            .cards
            .lock()
            .unwrap()
            .iter()
            .filter(|c| filter.game.is_none_or(|g| c.game == g))
            .filter(|c| {
                needle
                    .as_deref()
                    .is_none_or(|n| c.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        match filter.sort_by {
            CardSortBy::Name(Sort::Asc) => cards.sort_by(|a, b| a.name.cmp(&b.name)),
            CardSortBy::Name(Sort::Desc) => cards.sort_by(|a, b| b.name.cmp(&a.name)),
            CardSortBy::CreatedAt(Sort::Asc) => cards.sort_by_key(|c| (c.created_at, c.id)),
            CardSortBy::CreatedAt(Sort::Desc) => {
                cards.sort_by_key(|c| Reverse((c.created_at, c.id)))
            }
        }
        Ok(cards
            .into_iter()
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, CatalogServiceError> {
        Ok(self.card_of(id))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Card>, CatalogServiceError> {
        Ok(self
            .store
            .cards
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_by_identity(&self, card: &Card) -> Result<Option<Card>, CatalogServiceError> {
        Ok(self
            .store
            .cards
            .lock()
            .unwrap()
            .iter()
            .find(|c| {
                c.name == card.name
                    && c.game == card.game
                    && c.set_name == card.set_name
                    && c.card_number == card.card_number
            })
            .cloned())
    }

    async fn create(&self, card: &Card) -> Result<(), CatalogServiceError> {
        self.record("card.create");
        self.store.cards.lock().unwrap().push(card.clone());
        Ok(())
    }

    async fn update(&self, card: &Card) -> Result<(), CatalogServiceError> {
        self.record("card.update");
        let mut cards = self.store.cards.lock().unwrap();
        if let Some(held) = cards.iter_mut().find(|c| c.id == card.id) {
            *held = card.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogServiceError> {
        self.record("card.delete");
        let mut cards = self.store.cards.lock().unwrap();
        let before = cards.len();
        cards.retain(|c| c.id != id);
        let deleted = cards.len() < before;
        if deleted {
            self.store.prices.lock().unwrap().retain(|p| p.card_id != id);
            self.store.entries.lock().unwrap().retain(|e| e.card_id != id);
        }
        Ok(deleted)
    }
}

// ── PriceRepository ──────────────────────────────────────────────────────────

impl PriceRepository for MemoryRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PriceRecord>, CatalogServiceError> {
        Ok(self
            .store
            .prices
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_for_cards(
        &self,
        card_ids: &[Uuid],
        currency: Currency,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        Ok(self
            .store
            .prices
            .lock()
            .unwrap()
            .iter()
            .filter(|p| card_ids.contains(&p.card_id) && p.currency == currency)
            .cloned()
            .collect())
    }

    async fn history(
        &self,
        card_id: Uuid,
        condition: Condition,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        let mut records: Vec<PriceRecord> = self
            .store
            .prices
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.card_id == card_id && p.condition == condition)
            .filter(|p| (since..=until).contains(&p.recorded_at))
            .cloned()
            .collect();
        records.sort_by_key(|p| (p.recorded_at, p.id));
        Ok(records)
    }

    async fn list_recorded_since(
        &self,
        since: DateTime<Utc>,
        game: Option<Game>,
        currency: Currency,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        let records: Vec<PriceRecord> = self
            .store
            .prices
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.recorded_at >= since && p.currency == currency)
            .cloned()
            .collect();
        Ok(records
            .into_iter()
            .filter(|p| game.is_none_or(|g| self.card_of(p.card_id).is_some_and(|c| c.game == g)))
            .collect())
    }

    async fn create(&self, record: &PriceRecord) -> Result<(), CatalogServiceError> {
        self.record("price.create");
        self.insert_price(record.clone());
        Ok(())
    }

    async fn update(&self, record: &PriceRecord) -> Result<(), CatalogServiceError> {
        self.record("price.update");
        let mut prices = self.store.prices.lock().unwrap();
        if let Some(held) = prices.iter_mut().find(|p| p.id == record.id) {
            *held = record.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogServiceError> {
        self.record("price.delete");
        let mut prices = self.store.prices.lock().unwrap();
        let before = prices.len();
        prices.retain(|p| p.id != id);
        Ok(prices.len() < before)
    }
}

// ── CollectionRepository ─────────────────────────────────────────────────────

impl CollectionRepository for MemoryRepo {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &CollectionFilter,
    ) -> Result<Vec<OwnedCard>, CatalogServiceError> {
        Ok(self
            .list_all(user_id)
            .await?
            .into_iter()
            .filter(|o| filter.game.is_none_or(|g| o.card.game == g))
            .filter(|o| filter.condition.is_none_or(|c| o.entry.condition == c))
            .skip(filter.page.offset as usize)
            .take(filter.page.limit as usize)
            .collect())
    }

    async fn list_all(&self, user_id: Uuid) -> Result<Vec<OwnedCard>, CatalogServiceError> {
        let mut entries: Vec<CollectionEntry> = self
            .store
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| Reverse((e.created_at, e.id)));
        Ok(entries.into_iter().filter_map(|e| self.owned(e)).collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<OwnedCard>, CatalogServiceError> {
        let entry = self
            .store
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned();
        Ok(entry.and_then(|e| self.owned(e)))
    }

    async fn find_by_key(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        condition: Condition,
    ) -> Result<Option<CollectionEntry>, CatalogServiceError> {
        Ok(self
            .store
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.user_id == user_id && e.card_id == card_id && e.condition == condition)
            .cloned())
    }

    async fn add_or_increment(
        &self,
        entry: &CollectionEntry,
    ) -> Result<CollectionEntry, CatalogServiceError> {
        self.record("collection.add");
        let mut entries = self.store.entries.lock().unwrap();
        let held = entries.iter_mut().find(|e| {
            e.user_id == entry.user_id && e.card_id == entry.card_id && e.condition == entry.condition
        });
        match held {
            Some(held) => {
                held.quantity += entry.quantity;
                held.updated_at = entry.updated_at;
                Ok(held.clone())
            }
            None => {
                entries.push(entry.clone());
                Ok(entry.clone())
            }
        }
    }

    async fn update(&self, entry: &CollectionEntry) -> Result<(), CatalogServiceError> {
        self.record("collection.update");
        let mut entries = self.store.entries.lock().unwrap();
        if let Some(held) = entries
            .iter_mut()
            .find(|e| e.id == entry.id && e.user_id == entry.user_id)
        {
            *held = entry.clone();
        }
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CatalogServiceError> {
        self.record("collection.delete");
        let mut entries = self.store.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(entries.len() < before)
    }
}

// ── ProfileRepository ────────────────────────────────────────────────────────

impl ProfileRepository for MemoryRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, CatalogServiceError> {
        Ok(self
            .store
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Profile>, CatalogServiceError> {
        Ok(self
            .store
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.username.as_deref() == Some(username))
            .cloned())
    }

    async fn create(&self, profile: &Profile) -> Result<(), CatalogServiceError> {
        self.record("profile.create");
        let mut profiles = self.store.profiles.lock().unwrap();
        if !profiles.iter().any(|p| p.id == profile.id) {
            profiles.push(profile.clone());
        }
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> Result<(), CatalogServiceError> {
        self.record("profile.update");
        let mut profiles = self.store.profiles.lock().unwrap();
        if let Some(held) = profiles.iter_mut().find(|p| p.id == profile.id) {
            *held = profile.clone();
        }
        Ok(())
    }
}
