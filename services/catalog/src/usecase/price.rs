use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use cardvault_domain::card::{Currency, Game};

use crate::domain::pricing::{
    COMPARISON_WINDOW_DAYS, PriceChange, latest_by_condition, rank_gainers,
};
use crate::domain::repository::{CardRepository, PriceRepository};
use crate::domain::types::{Card, PriceRecord};
use crate::error::CatalogServiceError;
use crate::usecase::{non_blank, parse_condition};

pub const DEFAULT_HISTORY_DAYS: i64 = 30;
pub const MAX_HISTORY_DAYS: i64 = 365;
pub const DEFAULT_GAINERS_LIMIT: i64 = 10;
pub const MAX_GAINERS_LIMIT: i64 = 50;

/// A ranked price change joined with the card it belongs to.
#[derive(Debug, Clone)]
pub struct RankedGainer {
    pub card: Card,
    pub change: PriceChange,
}

/// Attach cards to ranked changes, dropping changes whose card is gone.
pub(crate) fn join_cards(changes: Vec<PriceChange>, cards: Vec<Card>) -> Vec<RankedGainer> {
    let by_id: HashMap<Uuid, Card> = cards.into_iter().map(|c| (c.id, c)).collect();
    changes
        .into_iter()
        .filter_map(|change| {
            let card = by_id.get(&change.card_id)?.clone();
            Some(RankedGainer { card, change })
        })
        .collect()
}

// ── GetPrice ────────────────────────────────────────────────────────────────

pub struct GetPriceUseCase<P: PriceRepository> {
    pub repo: P,
}

impl<P: PriceRepository> GetPriceUseCase<P> {
    pub async fn execute(&self, id: Uuid) -> Result<PriceRecord, CatalogServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogServiceError::PriceNotFound)
    }
}

// ── GetCurrentPrices ────────────────────────────────────────────────────────

pub struct GetCurrentPricesUseCase<P: PriceRepository> {
    pub repo: P,
    pub currency: Currency,
}

impl<P: PriceRepository> GetCurrentPricesUseCase<P> {
    /// Latest price per condition, best condition first. Unknown cards yield an empty list.
    pub async fn execute(&self, card_id: Uuid) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        let records = self.repo.list_for_cards(&[card_id], self.currency).await?;
        Ok(latest_by_condition(&records)
            .into_values()
            .cloned()
            .collect())
    }
}

// ── GetPriceHistory ─────────────────────────────────────────────────────────

pub struct GetPriceHistoryUseCase<P: PriceRepository> {
    pub repo: P,
}

impl<P: PriceRepository> GetPriceHistoryUseCase<P> {
    /// Observations of one (card, condition) within `[now - days, now]`, oldest first.
    pub async fn execute(
        &self,
        card_id: Uuid,
        condition: Option<&str>,
        days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>, CatalogServiceError> {
        let condition = parse_condition(condition)?;
        let days = days.unwrap_or(DEFAULT_HISTORY_DAYS);
        if !(1..=MAX_HISTORY_DAYS).contains(&days) {
            return Err(CatalogServiceError::InvalidDays);
        }
        self.repo
            .history(card_id, condition, now - Duration::days(days), now)
            .await
    }
}

// ── GetTopGainers ───────────────────────────────────────────────────────────

pub struct GetTopGainersUseCase<C: CardRepository, P: PriceRepository> {
    pub cards: C,
    pub prices: P,
    pub currency: Currency,
}

impl<C: CardRepository, P: PriceRepository> GetTopGainersUseCase<C, P> {
    pub async fn execute(
        &self,
        limit: Option<i64>,
        game: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedGainer>, CatalogServiceError> {
        let limit = limit.unwrap_or(DEFAULT_GAINERS_LIMIT);
        if !(1..=MAX_GAINERS_LIMIT).contains(&limit) {
            return Err(CatalogServiceError::InvalidLimit);
        }
        let game = game.map(str::parse::<Game>).transpose()?;

        let since = now - Duration::days(COMPARISON_WINDOW_DAYS);
        let records = self
            .prices
            .list_recorded_since(since, game, self.currency)
            .await?;
        let changes = rank_gainers(&records, now, limit as usize);
        if changes.is_empty() {
            return Ok(vec![]);
        }

        let mut ids: Vec<Uuid> = changes.iter().map(|c| c.card_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let cards = self.cards.find_by_ids(&ids).await?;
        Ok(join_cards(changes, cards))
    }
}

// ── CreatePrice ─────────────────────────────────────────────────────────────

pub struct CreatePriceInput {
    pub card_id: Uuid,
    pub condition: Option<String>,
    pub price: Decimal,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

pub struct CreatePriceUseCase<C: CardRepository, P: PriceRepository> {
    pub cards: C,
    pub prices: P,
}

impl<C: CardRepository, P: PriceRepository> CreatePriceUseCase<C, P> {
    pub async fn execute(
        &self,
        input: CreatePriceInput,
    ) -> Result<PriceRecord, CatalogServiceError> {
        if input.price <= Decimal::ZERO {
            return Err(CatalogServiceError::InvalidPrice);
        }
        let condition = parse_condition(input.condition.as_deref())?;
        let currency = match input.currency.as_deref() {
            Some(raw) => raw.parse::<Currency>()?,
            None => Currency::default(),
        };

        if self.cards.find_by_id(input.card_id).await?.is_none() {
            return Err(CatalogServiceError::CardNotFound);
        }

        let record = PriceRecord {
            id: Uuid::now_v7(),
            card_id: input.card_id,
            condition,
            price: input.price,
            currency,
            source: non_blank(input.source),
            recorded_at: input.recorded_at.unwrap_or_else(Utc::now),
        };
        self.prices.create(&record).await?;
        tracing::info!(
            price_id = %record.id,
            card_id = %record.card_id,
            condition = record.condition.as_str(),
            "price recorded"
        );
        Ok(record)
    }
}

// ── UpdatePrice ─────────────────────────────────────────────────────────────

/// Administrative correction of an existing observation.
#[derive(Default)]
pub struct UpdatePriceInput {
    pub condition: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

pub struct UpdatePriceUseCase<P: PriceRepository> {
    pub repo: P,
}

impl<P: PriceRepository> UpdatePriceUseCase<P> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdatePriceInput,
    ) -> Result<PriceRecord, CatalogServiceError> {
        if input.condition.is_none()
            && input.price.is_none()
            && input.currency.is_none()
            && input.source.is_none()
            && input.recorded_at.is_none()
        {
            return Err(CatalogServiceError::MissingData);
        }
        if input.price.is_some_and(|p| p <= Decimal::ZERO) {
            return Err(CatalogServiceError::InvalidPrice);
        }
        let condition = input
            .condition
            .as_deref()
            .map(|raw| parse_condition(Some(raw)))
            .transpose()?;
        let currency = input
            .currency
            .as_deref()
            .map(str::parse::<Currency>)
            .transpose()?;

        let mut record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogServiceError::PriceNotFound)?;
        if let Some(condition) = condition {
            record.condition = condition;
        }
        if let Some(price) = input.price {
            record.price = price;
        }
        if let Some(currency) = currency {
            record.currency = currency;
        }
        if input.source.is_some() {
            record.source = non_blank(input.source);
        }
        if let Some(recorded_at) = input.recorded_at {
            record.recorded_at = recorded_at;
        }
        self.repo.update(&record).await?;
        Ok(record)
    }
}

// ── DeletePrice ─────────────────────────────────────────────────────────────

pub struct DeletePriceUseCase<P: PriceRepository> {
    pub repo: P,
}

impl<P: PriceRepository> DeletePriceUseCase<P> {
    pub async fn execute(&self, id: Uuid) -> Result<(), CatalogServiceError> {
        if !self.repo.delete(id).await? {
            return Err(CatalogServiceError::PriceNotFound);
        }
        Ok(())
    }
}
