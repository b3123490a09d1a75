use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cardvault_auth_types::identity::Identity;
use cardvault_domain::card::{Condition, Currency};
use cardvault_domain::pagination::PageRequest;

use crate::domain::types::OwnedCard;
use crate::error::CatalogServiceError;
use crate::handlers::card::CardResponse;
use crate::handlers::price::GainerResponse;
use crate::handlers::{JsonBody, parse_id, parse_query};
use crate::state::AppState;
use crate::usecase::collection::{
    AddToCollectionInput, AddToCollectionUseCase, CollectionStats, GetCollectionEntryUseCase,
    GetCollectionStatsUseCase, ListCollectionInput, ListCollectionUseCase,
    RemoveFromCollectionUseCase, UpdateCollectionEntryInput, UpdateCollectionEntryUseCase,
};

/// Rarest-card label when no owned entry has a price.
const NO_CARDS: &str = "No cards";

// ── Response types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CollectionEntryResponse {
    pub id: Uuid,
    pub card_id: Uuid,
    pub condition: Condition,
    pub quantity: i32,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
    pub card: CardResponse,
}

impl From<OwnedCard> for CollectionEntryResponse {
    fn from(OwnedCard { entry, card }: OwnedCard) -> Self {
        Self {
            id: entry.id,
            card_id: entry.card_id,
            condition: entry.condition,
            quantity: entry.quantity,
            purchase_price: entry.purchase_price,
            purchase_date: entry.purchase_date,
            notes: entry.notes,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            card: card.into(),
        }
    }
}

#[derive(Serialize)]
pub struct CollectionStatsResponse {
    pub total_cards: usize,
    pub total_quantity: i64,
    pub total_value: Decimal,
    pub currency: Currency,
    pub rarest_card: String,
    pub top_gainer: Option<GainerResponse>,
}

impl CollectionStatsResponse {
    fn new(stats: CollectionStats, currency: Currency) -> Self {
        let summary = stats.summary;
        Self {
            total_cards: summary.total_cards,
            total_quantity: summary.total_quantity,
            total_value: summary.total_value,
            currency,
            rarest_card: summary
                .rarest_card
                .map_or_else(|| NO_CARDS.to_owned(), |rarest| rarest.label),
            top_gainer: stats.top_gainer.map(GainerResponse::from),
        }
    }
}

// ── Query params ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CollectionQuery {
    pub game: Option<String>,
    pub condition: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

// ── GET /collections ────────────────────────────────────────────────────────

pub async fn list_collection(
    identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<CollectionEntryResponse>>, CatalogServiceError> {
    let query: CollectionQuery = parse_query(raw_query.as_deref())?;
    let usecase = ListCollectionUseCase {
        repo: state.collection_repo(),
    };
    let owned = usecase
        .execute(
            identity.user_id,
            ListCollectionInput {
                game: query.game,
                condition: query.condition,
                page: PageRequest::from_parts(query.limit, query.offset),
            },
        )
        .await?;
    Ok(Json(owned.into_iter().map(Into::into).collect()))
}

// ── GET /collections/stats ──────────────────────────────────────────────────

pub async fn get_collection_stats(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<CollectionStatsResponse>, CatalogServiceError> {
    let usecase = GetCollectionStatsUseCase {
        collection: state.collection_repo(),
        prices: state.price_repo(),
        currency: state.price_currency,
    };
    let stats = usecase.execute(identity.user_id, Utc::now()).await?;
    Ok(Json(CollectionStatsResponse::new(
        stats,
        state.price_currency,
    )))
}

// ── GET /collections/{id} ───────────────────────────────────────────────────

pub async fn get_collection_entry(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CollectionEntryResponse>, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = GetCollectionEntryUseCase {
        repo: state.collection_repo(),
    };
    Ok(Json(usecase.execute(identity.user_id, id).await?.into()))
}

// ── POST /collections ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddToCollectionRequest {
    pub card_id: Option<Uuid>,
    pub condition: Option<String>,
    pub quantity: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub async fn add_to_collection(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AddToCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionEntryResponse>), CatalogServiceError> {
    let usecase = AddToCollectionUseCase {
        cards: state.card_repo(),
        collection: state.collection_repo(),
    };
    let owned = usecase
        .execute(
            identity.user_id,
            AddToCollectionInput {
                card_id: body
                    .card_id
                    .ok_or(CatalogServiceError::MissingField("card_id"))?,
                condition: body.condition,
                quantity: body.quantity,
                purchase_price: body.purchase_price,
                purchase_date: body.purchase_date,
                notes: body.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(owned.into())))
}

// ── PUT /collections/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCollectionEntryRequest {
    pub condition: Option<String>,
    pub quantity: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub async fn update_collection_entry(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateCollectionEntryRequest>,
) -> Result<Json<CollectionEntryResponse>, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = UpdateCollectionEntryUseCase {
        repo: state.collection_repo(),
    };
    let owned = usecase
        .execute(
            identity.user_id,
            id,
            UpdateCollectionEntryInput {
                condition: body.condition,
                quantity: body.quantity,
                purchase_price: body.purchase_price,
                purchase_date: body.purchase_date,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(owned.into()))
}

// ── DELETE /collections/{id} ────────────────────────────────────────────────

pub async fn remove_from_collection(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = RemoveFromCollectionUseCase {
        repo: state.collection_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
