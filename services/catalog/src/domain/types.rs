use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use cardvault_domain::card::{Condition, Currency, Game};
use cardvault_domain::pagination::{PageRequest, Sort};

/// A catalog card.
#[derive(Debug, Clone, PartialEq)]
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
}

impl Card {
    /// Display label used by collection summaries: `name (set_name)`, or just `name`.
    pub fn label(&self) -> String {
        match self.set_name.as_deref() {
            Some(set) if !set.is_empty() => format!("{} ({})", self.name, set),
            _ => self.name.clone(),
        }
    }
}

/// One price observation for a (card, condition) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub id: Uuid,
    pub card_id: Uuid,
    pub condition: Condition,
    pub price: Decimal,
    pub currency: Currency,
    pub source: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// A user's holding of one card in one condition.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_id: Uuid,
    pub condition: Condition,
    pub quantity: i32,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A collection entry joined with the card it references.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedCard {
    pub entry: CollectionEntry,
    pub card: Card,
}

/// Public profile of an identity-provider user.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort options for card list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSortBy {
    Name(Sort),
    CreatedAt(Sort),
}

impl Default for CardSortBy {
    fn default() -> Self {
        Self::Name(Sort::Asc)
    }
}

impl CardSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "name-asc" => Some(Self::Name(Sort::Asc)),
            "name-desc" => Some(Self::Name(Sort::Desc)),
            "created-at-desc" => Some(Self::CreatedAt(Sort::Desc)),
            "created-at-asc" => Some(Self::CreatedAt(Sort::Asc)),
            _ => None,
        }
    }
}

/// Filters for the card list.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub game: Option<Game>,
    /// Case-insensitive substring of the card name.
    pub search: Option<String>,
    pub sort_by: CardSortBy,
    pub page: PageRequest,
}

/// Filters for a user's collection list.
#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    pub game: Option<Game>,
    pub condition: Option<Condition>,
    pub page: PageRequest,
}

/// Validate a username: 3-30 chars of ASCII alphanumerics, hyphen or underscore.
/// Reserved: "me".
pub fn validate_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }
    if username.eq_ignore_ascii_case("me") {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
