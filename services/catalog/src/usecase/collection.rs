use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use cardvault_domain::card::{Condition, Currency, Game};
use cardvault_domain::pagination::PageRequest;

use crate::domain::pricing::{
    COMPARISON_WINDOW_DAYS, CollectionSummary, PriceKey, rank_gainers, summarize_collection,
};
use crate::domain::repository::{CardRepository, CollectionRepository, PriceRepository};
use crate::domain::types::{CollectionEntry, CollectionFilter, OwnedCard};
use crate::error::CatalogServiceError;
use crate::usecase::{non_blank, parse_condition};
use crate::usecase::price::{RankedGainer, join_cards};

fn check_purchase_price(price: Option<Decimal>) -> Result<(), CatalogServiceError> {
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(CatalogServiceError::InvalidPurchasePrice);
    }
    Ok(())
}

// ── ListCollection ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ListCollectionInput {
    pub game: Option<String>,
    pub condition: Option<String>,
    pub page: PageRequest,
}

pub struct ListCollectionUseCase<R: CollectionRepository> {
    pub repo: R,
}

impl<R: CollectionRepository> ListCollectionUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: ListCollectionInput,
    ) -> Result<Vec<OwnedCard>, CatalogServiceError> {
        let filter = CollectionFilter {
            game: input.game.as_deref().map(str::parse::<Game>).transpose()?,
            condition: input
                .condition
                .as_deref()
                .map(str::parse::<Condition>)
                .transpose()?,
            page: input.page.clamped(),
        };
        self.repo.list(user_id, &filter).await
    }
}

// ── GetCollectionEntry ──────────────────────────────────────────────────────

pub struct GetCollectionEntryUseCase<R: CollectionRepository> {
    pub repo: R,
}

impl<R: CollectionRepository> GetCollectionEntryUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<OwnedCard, CatalogServiceError> {
        self.repo
            .get(user_id, id)
            .await?
            .ok_or(CatalogServiceError::CollectionEntryNotFound)
    }
}

// ── AddToCollection ─────────────────────────────────────────────────────────

pub struct AddToCollectionInput {
    pub card_id: Uuid,
    pub condition: Option<String>,
    pub quantity: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub struct AddToCollectionUseCase<C: CardRepository, R: CollectionRepository> {
    pub cards: C,
    pub collection: R,
}

impl<C: CardRepository, R: CollectionRepository> AddToCollectionUseCase<C, R> {
    /// Adding a (card, condition) the user already holds adds to its quantity.
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: AddToCollectionInput,
    ) -> Result<OwnedCard, CatalogServiceError> {
        let quantity = input.quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(CatalogServiceError::InvalidQuantity);
        }
        check_purchase_price(input.purchase_price)?;
        let condition = parse_condition(input.condition.as_deref())?;

        let card = self
            .cards
            .find_by_id(input.card_id)
            .await?
            .ok_or(CatalogServiceError::CardNotFound)?;

        let now = Utc::now();
        let entry = CollectionEntry {
            id: Uuid::now_v7(),
            user_id,
            card_id: card.id,
            condition,
            quantity,
            purchase_price: input.purchase_price,
            purchase_date: input.purchase_date,
            notes: non_blank(input.notes),
            created_at: now,
            updated_at: now,
        };
        let entry = self.collection.add_or_increment(&entry).await?;
        Ok(OwnedCard { entry, card })
    }
}

// ── UpdateCollectionEntry ───────────────────────────────────────────────────

/// Partial update. `Some("")` clears the notes.
#[derive(Default)]
pub struct UpdateCollectionEntryInput {
    pub condition: Option<String>,
    pub quantity: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub struct UpdateCollectionEntryUseCase<R: CollectionRepository> {
    pub repo: R,
}

impl<R: CollectionRepository> UpdateCollectionEntryUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateCollectionEntryInput,
    ) -> Result<OwnedCard, CatalogServiceError> {
        if input.condition.is_none()
            && input.quantity.is_none()
            && input.purchase_price.is_none()
            && input.purchase_date.is_none()
            && input.notes.is_none()
        {
            return Err(CatalogServiceError::MissingData);
        }
        if input.quantity.is_some_and(|q| q <= 0) {
            return Err(CatalogServiceError::InvalidQuantity);
        }
        check_purchase_price(input.purchase_price)?;
        let condition = input
            .condition
            .as_deref()
            .map(str::parse::<Condition>)
            .transpose()?;

        let OwnedCard { mut entry, card } = self
            .repo
            .get(user_id, id)
            .await?
            .ok_or(CatalogServiceError::CollectionEntryNotFound)?;

        if let Some(condition) = condition {
            if condition != entry.condition
                && self
                    .repo
                    .find_by_key(user_id, entry.card_id, condition)
                    .await?
                    .is_some()
            {
                return Err(CatalogServiceError::DuplicateCollectionEntry);
            }
            entry.condition = condition;
        }
        if let Some(quantity) = input.quantity {
            entry.quantity = quantity;
        }
        if input.purchase_price.is_some() {
            entry.purchase_price = input.purchase_price;
        }
        if input.purchase_date.is_some() {
            entry.purchase_date = input.purchase_date;
        }
        if input.notes.is_some() {
            entry.notes = non_blank(input.notes);
        }
        entry.updated_at = Utc::now();

        self.repo.update(&entry).await?;
        Ok(OwnedCard { entry, card })
    }
}

// ── RemoveFromCollection ────────────────────────────────────────────────────

pub struct RemoveFromCollectionUseCase<R: CollectionRepository> {
    pub repo: R,
}

impl<R: CollectionRepository> RemoveFromCollectionUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), CatalogServiceError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(CatalogServiceError::CollectionEntryNotFound);
        }
        Ok(())
    }
}

// ── GetCollectionStats ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CollectionStats {
    pub summary: CollectionSummary,
    /// Best relative gain among the (card, condition) pairs the user owns.
    pub top_gainer: Option<RankedGainer>,
}

pub struct GetCollectionStatsUseCase<R: CollectionRepository, P: PriceRepository> {
    pub collection: R,
    pub prices: P,
    pub currency: Currency,
}

impl<R: CollectionRepository, P: PriceRepository> GetCollectionStatsUseCase<R, P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CollectionStats, CatalogServiceError> {
        let owned = self.collection.list_all(user_id).await?;
        if owned.is_empty() {
            return Ok(CollectionStats {
                summary: summarize_collection(&[], &[]),
                top_gainer: None,
            });
        }

        let mut card_ids: Vec<Uuid> = owned.iter().map(|o| o.card.id).collect();
        card_ids.sort_unstable();
        card_ids.dedup();
        let records = self.prices.list_for_cards(&card_ids, self.currency).await?;
        let summary = summarize_collection(&owned, &records);

        let keys: HashSet<PriceKey> = owned
            .iter()
            .map(|o| (o.entry.card_id, o.entry.condition))
            .collect();
        let since = now - Duration::days(COMPARISON_WINDOW_DAYS);
        let recent: Vec<_> = records
            .into_iter()
            .filter(|r| r.recorded_at >= since && keys.contains(&(r.card_id, r.condition)))
            .collect();
        let cards = owned.into_iter().map(|o| o.card).collect();
        let top_gainer = join_cards(rank_gainers(&recent, now, 1), cards)
            .into_iter()
            .next();

        Ok(CollectionStats {
            summary,
            top_gainer,
        })
    }
}
