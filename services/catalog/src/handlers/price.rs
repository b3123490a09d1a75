use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cardvault_auth_types::identity::AdminIdentity;
use cardvault_domain::card::{Condition, Currency, Game};

use crate::domain::types::PriceRecord;
use crate::error::CatalogServiceError;
use crate::handlers::{JsonBody, parse_id, parse_query};
use crate::state::AppState;
use crate::usecase::price::{
    CreatePriceInput, CreatePriceUseCase, DeletePriceUseCase, GetCurrentPricesUseCase,
    GetPriceHistoryUseCase, GetPriceUseCase, GetTopGainersUseCase, RankedGainer,
    UpdatePriceInput, UpdatePriceUseCase,
};

// ── Response types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PriceResponse {
    pub id: Uuid,
    pub card_id: Uuid,
    pub condition: Condition,
    pub price: Decimal,
    pub currency: Currency,
    pub source: Option<String>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub recorded_at: DateTime<Utc>,
}

impl From<PriceRecord> for PriceResponse {
    fn from(record: PriceRecord) -> Self {
        Self {
            id: record.id,
            card_id: record.card_id,
            condition: record.condition,
            price: record.price,
            currency: record.currency,
            source: record.source,
            recorded_at: record.recorded_at,
        }
    }
}

#[derive(Serialize)]
pub struct HistoryPointResponse {
    pub price: Decimal,
    pub currency: Currency,
    pub source: Option<String>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub recorded_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct GainerResponse {
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
    /// When the current observation was recorded.
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub recorded_at: DateTime<Utc>,
}

impl From<RankedGainer> for GainerResponse {
    fn from(RankedGainer { card, change }: RankedGainer) -> Self {
        Self {
            card_id: card.id,
            name: card.name,
            game: card.game,
            set_name: card.set_name,
            rarity: card.rarity,
            image_url: card.image_url,
            condition: change.condition,
            current_price: change.current_price,
            previous_price: change.previous_price,
            change: change.change,
            change_percent: change.change_percent,
            currency: change.currency,
            recorded_at: change.recorded_at,
        }
    }
}

// ── Query params ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct HistoryQuery {
    pub condition: Option<String>,
    pub days: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct TopGainersQuery {
    pub limit: Option<i64>,
    pub game: Option<String>,
}

// ── GET /prices/cards/{card_id} ─────────────────────────────────────────────

pub async fn get_current_prices(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<Vec<PriceResponse>>, CatalogServiceError> {
    let card_id = parse_id(&card_id)?;
    let usecase = GetCurrentPricesUseCase {
        repo: state.price_repo(),
        currency: state.price_currency,
    };
    let prices = usecase.execute(card_id).await?;
    Ok(Json(prices.into_iter().map(PriceResponse::from).collect()))
}

// ── GET /prices/cards/{card_id}/history ─────────────────────────────────────

pub async fn get_price_history(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<HistoryPointResponse>>, CatalogServiceError> {
    let card_id = parse_id(&card_id)?;
    let query: HistoryQuery = parse_query(raw_query.as_deref())?;
    let usecase = GetPriceHistoryUseCase {
        repo: state.price_repo(),
    };
    let history = usecase
        .execute(card_id, query.condition.as_deref(), query.days, Utc::now())
        .await?;
    let items = history
        .into_iter()
        .map(|record| HistoryPointResponse {
            price: record.price,
            currency: record.currency,
            source: record.source,
            recorded_at: record.recorded_at,
        })
        .collect();
    Ok(Json(items))
}

// ── GET /prices/top-gainers ─────────────────────────────────────────────────

pub async fn get_top_gainers(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<GainerResponse>>, CatalogServiceError> {
    let query: TopGainersQuery = parse_query(raw_query.as_deref())?;
    let usecase = GetTopGainersUseCase {
        cards: state.card_repo(),
        prices: state.price_repo(),
        currency: state.price_currency,
    };
    let gainers = usecase
        .execute(query.limit, query.game.as_deref(), Utc::now())
        .await?;
    Ok(Json(gainers.into_iter().map(GainerResponse::from).collect()))
}

// ── GET /prices/{id} ────────────────────────────────────────────────────────

pub async fn get_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PriceResponse>, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = GetPriceUseCase {
        repo: state.price_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /prices ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePriceRequest {
    pub card_id: Option<Uuid>,
    pub condition: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

pub async fn create_price(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePriceRequest>,
) -> Result<(StatusCode, Json<PriceResponse>), CatalogServiceError> {
    let usecase = CreatePriceUseCase {
        cards: state.card_repo(),
        prices: state.price_repo(),
    };
    let record = usecase
        .execute(CreatePriceInput {
            card_id: body
                .card_id
                .ok_or(CatalogServiceError::MissingField("card_id"))?,
            condition: body.condition,
            price: body.price.ok_or(CatalogServiceError::MissingField("price"))?,
            currency: body.currency,
            source: body.source,
            recorded_at: body.recorded_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

// ── PUT /prices/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdatePriceRequest {
    pub condition: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

pub async fn update_price(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdatePriceRequest>,
) -> Result<Json<PriceResponse>, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = UpdatePriceUseCase {
        repo: state.price_repo(),
    };
    let record = usecase
        .execute(
            id,
            UpdatePriceInput {
                condition: body.condition,
                price: body.price,
                currency: body.currency,
                source: body.source,
                recorded_at: body.recorded_at,
            },
        )
        .await?;
    tracing::info!(admin = %admin.user_id, price_id = %id, "price corrected");
    Ok(Json(record.into()))
}

// ── DELETE /prices/{id} ─────────────────────────────────────────────────────

pub async fn delete_price(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = DeletePriceUseCase {
        repo: state.price_repo(),
    };
    usecase.execute(id).await?;
    tracing::info!(admin = %admin.user_id, price_id = %id, "price deleted");
    Ok(StatusCode::NO_CONTENT)
}
