use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cardvault_auth_types::identity::AdminIdentity;
use cardvault_domain::card::Game;
use cardvault_domain::pagination::PageRequest;

use crate::domain::types::Card;
use crate::error::CatalogServiceError;
use crate::handlers::price::PriceResponse;
use crate::handlers::{JsonBody, parse_id, parse_query};
use crate::state::AppState;
use crate::usecase::card::{
    CardWithPrices, CreateCardInput, CreateCardUseCase, DeleteCardUseCase, GetCardUseCase,
    ListCardsInput, ListCardsUseCase, UpdateCardInput, UpdateCardUseCase,
};

// ── Response types ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub name: String,
    pub game: Game,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
    /// Current price per condition; present only when prices were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<PriceResponse>>,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            name: card.name,
            game: card.game,
            set_name: card.set_name,
            rarity: card.rarity,
            card_number: card.card_number,
            image_url: card.image_url,
            description: card.description,
            created_at: card.created_at,
            updated_at: card.updated_at,
            prices: None,
        }
    }
}

impl CardResponse {
    fn with_prices(CardWithPrices { card, prices }: CardWithPrices) -> Self {
        Self {
            prices: Some(prices.into_iter().map(PriceResponse::from).collect()),
            ..card.into()
        }
    }
}

// ── Query params ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CardListQuery {
    pub game: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub include_prices: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

// ── GET /cards ──────────────────────────────────────────────────────────────

pub async fn list_cards(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<CardResponse>>, CatalogServiceError> {
    let query: CardListQuery = parse_query(raw_query.as_deref())?;
    let include_prices = query.include_prices.unwrap_or(false);

    let usecase = ListCardsUseCase {
        cards: state.card_repo(),
        prices: state.price_repo(),
        currency: state.price_currency,
    };
    let cards = usecase
        .execute(ListCardsInput {
            game: query.game,
            search: query.search,
            sort_by: query.sort_by,
            include_prices,
            page: PageRequest::from_parts(query.limit, query.offset),
        })
        .await?;
    let items = cards
        .into_iter()
        .map(|item| {
            if include_prices {
                CardResponse::with_prices(item)
            } else {
                item.card.into()
            }
        })
        .collect();
    Ok(Json(items))
}

// ── GET /cards/{id} ─────────────────────────────────────────────────────────

pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardResponse>, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = GetCardUseCase {
        cards: state.card_repo(),
        prices: state.price_repo(),
        currency: state.price_currency,
    };
    let card = usecase.execute(id).await?;
    Ok(Json(CardResponse::with_prices(card)))
}

// ── POST /cards ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CardRequest {
    pub name: Option<String>,
    pub game: Option<String>,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

pub async fn create_card(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), CatalogServiceError> {
    let usecase = CreateCardUseCase {
        repo: state.card_repo(),
    };
    let card = usecase
        .execute(CreateCardInput {
            name: body.name,
            game: body.game,
            set_name: body.set_name,
            rarity: body.rarity,
            card_number: body.card_number,
            image_url: body.image_url,
            description: body.description,
        })
        .await?;
    tracing::info!(admin = %admin.user_id, card_id = %card.id, "card created");
    Ok((StatusCode::CREATED, Json(card.into())))
}

// ── PUT /cards/{id} ─────────────────────────────────────────────────────────

pub async fn update_card(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<CardRequest>,
) -> Result<Json<CardResponse>, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = UpdateCardUseCase {
        repo: state.card_repo(),
    };
    let card = usecase
        .execute(
            id,
            UpdateCardInput {
                name: body.name,
                game: body.game,
                set_name: body.set_name,
                rarity: body.rarity,
                card_number: body.card_number,
                image_url: body.image_url,
                description: body.description,
            },
        )
        .await?;
    tracing::info!(admin = %admin.user_id, card_id = %id, "card updated");
    Ok(Json(card.into()))
}

// ── DELETE /cards/{id} ──────────────────────────────────────────────────────

pub async fn delete_card(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = DeleteCardUseCase {
        repo: state.card_repo(),
    };
    usecase.execute(id).await?;
    tracing::info!(admin = %admin.user_id, card_id = %id, "card deleted");
    Ok(StatusCode::NO_CONTENT)
}
