//! Wire types of the catalog API.
//!
//! Money is carried as [`Decimal`] and travels as a JSON string. Optional request
//! fields are omitted when `None`, so a partial update only touches what is set.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cardvault_domain::card::{Condition, Currency, Game};

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub name: String,
    pub game: Game,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present on `get_card`, and on `list_cards` with `include_prices`.
    #[serde(default)]
    pub prices: Option<Vec<Price>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Price {
    pub id: Uuid,
    pub card_id: Uuid,
    pub condition: Condition,
    pub price: Decimal,
    pub currency: Currency,
    pub source: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPoint {
    pub price: Decimal,
    pub currency: Currency,
    pub source: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gainer {
    pub card_id: Uuid,
    pub name: String,
    pub game: Game,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub image_url: Option<String>,
    pub condition: Condition,
    pub current_price: Decimal,
    pub previous_price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub currency: Currency,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionEntry {
    pub id: Uuid,
    pub card_id: Uuid,
    pub condition: Condition,
    pub quantity: i32,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionStats {
    pub total_cards: u64,
    pub total_quantity: i64,
    pub total_value: Decimal,
    pub currency: Currency,
    /// `"No cards"` when nothing owned has a price.
    pub rarest_card: String,
    pub top_gainer: Option<Gainer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Requests ─────────────────────────────────────────────────────────────────

/// Body for creating or partially updating a card. An empty string clears an
/// optional field on update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPrice {
    pub card_id: Uuid,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl NewPrice {
    pub fn new(card_id: Uuid, price: Decimal) -> Self {
        Self {
            card_id,
            price,
            condition: None,
            currency: None,
            source: None,
            recorded_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceCorrection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCollectionEntry {
    pub card_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewCollectionEntry {
    pub fn new(card_id: Uuid) -> Self {
        Self {
            card_id,
            condition: None,
            quantity: None,
            purchase_price: None,
            purchase_date: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

// ── Query strings ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CardQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// `name-asc`, `name-desc`, `created-at-asc` or `created-at-desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_prices: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CollectionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TopGainersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
}
