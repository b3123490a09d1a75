use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use cardvault_core::error::error_body;
use cardvault_domain::card::{UnknownVariant, VariantKind};

/// Catalog service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("card not found")]
    CardNotFound,
    #[error("price record not found")]
    PriceNotFound,
    #[error("collection entry not found")]
    CollectionEntryNotFound,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("card already exists")]
    CardAlreadyExists,
    #[error("collection already holds this card in that condition")]
    DuplicateCollectionEntry,
    #[error("username already taken")]
    UsernameTaken,
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("missing data")]
    MissingData,
    #[error("invalid game: {0}")]
    InvalidGame(String),
    #[error("invalid condition: {0}")]
    InvalidCondition(String),
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("price must be greater than zero")]
    InvalidPrice,
    #[error("purchase price must not be negative")]
    InvalidPurchasePrice,
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    #[error("days must be between 1 and 365")]
    InvalidDays,
    #[error("limit must be between 1 and 50")]
    InvalidLimit,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid sort: {0}")]
    InvalidSort(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("invalid body: {0}")]
    InvalidBody(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CatalogServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::PriceNotFound => "PRICE_NOT_FOUND",
            Self::CollectionEntryNotFound => "COLLECTION_ENTRY_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::CardAlreadyExists => "CARD_ALREADY_EXISTS",
            Self::DuplicateCollectionEntry => "DUPLICATE_COLLECTION_ENTRY",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidGame(_) => "INVALID_GAME",
            Self::InvalidCondition(_) => "INVALID_CONDITION",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::InvalidId(_) => "INVALID_ID",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidPurchasePrice => "INVALID_PURCHASE_PRICE",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InvalidDays => "INVALID_DAYS",
            Self::InvalidLimit => "INVALID_LIMIT",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidSort(_) => "INVALID_SORT",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<UnknownVariant> for CatalogServiceError {
    fn from(err: UnknownVariant) -> Self {
        match err.kind {
            VariantKind::Game => Self::InvalidGame(err.value),
            VariantKind::Condition => Self::InvalidCondition(err.value),
            VariantKind::Currency => Self::InvalidCurrency(err.value),
        }
    }
}

impl From<JsonRejection> for CatalogServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for CatalogServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::CardNotFound
            | Self::PriceNotFound
            | Self::CollectionEntryNotFound
            | Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::CardAlreadyExists | Self::DuplicateCollectionEntry | Self::UsernameTaken => {
                StatusCode::CONFLICT
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        (status, error_body(self.kind(), &self.to_string())).into_response()
    }
}
