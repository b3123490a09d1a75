use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use cardvault_catalog::error::CatalogServiceError;
use cardvault_catalog::usecase::card::{CreateCardInput, CreateCardUseCase};
use cardvault_catalog::usecase::price::{
    CreatePriceInput, CreatePriceUseCase, GetCurrentPricesUseCase, GetPriceHistoryUseCase,
    GetTopGainersUseCase, UpdatePriceInput, UpdatePriceUseCase,
};
use cardvault_domain::card::{Condition, Currency};

use crate::helpers::{MemoryRepo, dollars};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 20, 9, 30, 0).unwrap()
}

async fn new_card(repo: &MemoryRepo, name: &str, game: &str) -> Uuid {
    CreateCardUseCase { repo: repo.clone() }
        .execute(CreateCardInput {
            name: Some(name.into()),
            game: Some(game.into()),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

async fn record(repo: &MemoryRepo, card_id: Uuid, cents: i64, days_ago: i64) {
    CreatePriceUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
    }
    .execute(CreatePriceInput {
        card_id,
        condition: None,
        price: dollars(cents),
        currency: None,
        source: Some("tcgplayer".into()),
        recorded_at: Some(now() - Duration::days(days_ago)),
    })
    .await
    .unwrap();
}

// ── Recording ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_record_price_with_defaults() {
    let repo = MemoryRepo::new();
    let card_id = new_card(&repo, "Ancestral Recall", "mtg").await;

    let created = CreatePriceUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
    }
    .execute(CreatePriceInput {
        card_id,
        condition: None,
        price: dollars(1_250_000),
        currency: None,
        source: Some("  ".into()),
        recorded_at: None,
    })
    .await
    .unwrap();

    assert_eq!(created.condition, Condition::NearMint);
    assert_eq!(created.currency, Currency::Usd);
    assert!(created.source.is_none());
    assert_eq!(repo.price_count(), 1);
}

#[tokio::test]
async fn should_not_write_invalid_price() {
    let repo = MemoryRepo::new();
    let card_id = new_card(&repo, "Time Walk", "mtg").await;

    let result = CreatePriceUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
    }
    .execute(CreatePriceInput {
        card_id,
        condition: Some("mint".into()),
        price: Decimal::ZERO,
        currency: None,
        source: None,
        recorded_at: None,
    })
    .await;
    assert!(matches!(result, Err(CatalogServiceError::InvalidPrice)));
    assert_eq!(repo.price_count(), 0);
}

#[tokio::test]
async fn should_move_current_price_after_correction() {
    let repo = MemoryRepo::new();
    let card_id = new_card(&repo, "Mox Pearl", "mtg").await;
    record(&repo, card_id, 1000, 2).await;
    record(&repo, card_id, 1200, 1).await;

    let current = GetCurrentPricesUseCase {
        repo: repo.clone(),
        currency: Currency::Usd,
    };
    let latest = current.execute(card_id).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].price, dollars(1200));

    UpdatePriceUseCase { repo: repo.clone() }
        .execute(
            latest[0].id,
            UpdatePriceInput {
                price: Some(dollars(1150)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let latest = current.execute(card_id).await.unwrap();
    assert_eq!(latest[0].price, dollars(1150));
}

// ── History ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_history_within_window_oldest_first() {
    let repo = MemoryRepo::new();
    let card_id = new_card(&repo, "Sol Ring", "mtg").await;
    record(&repo, card_id, 300, 40).await;
    record(&repo, card_id, 320, 20).await;
    record(&repo, card_id, 310, 5).await;

    let usecase = GetPriceHistoryUseCase { repo: repo.clone() };
    let history = usecase
        .execute(card_id, Some("near_mint"), None, now())
        .await
        .unwrap();
    let prices: Vec<Decimal> = history.iter().map(|r| r.price).collect();
    assert_eq!(prices, vec![dollars(320), dollars(310)]);

    let wider = usecase
        .execute(card_id, None, Some(60), now())
        .await
        .unwrap();
    assert_eq!(wider.len(), 3);

    let other_condition = usecase
        .execute(card_id, Some("damaged"), Some(60), now())
        .await
        .unwrap();
    assert!(other_condition.is_empty());
}

// ── Top gainers ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_rank_gainers_by_percent_and_filter_by_game() {
    let repo = MemoryRepo::new();
    let pikachu = new_card(&repo, "Pikachu", "pokemon").await;
    let charizard = new_card(&repo, "Charizard", "pokemon").await;
    let kuriboh = new_card(&repo, "Kuriboh", "yugioh").await;

    // +10%
    record(&repo, pikachu, 1000, 10).await;
    record(&repo, pikachu, 1100, 2).await;
    // +50%
    record(&repo, charizard, 20000, 12).await;
    record(&repo, charizard, 30000, 1).await;
    // +100%, other game
    record(&repo, kuriboh, 50, 9).await;
    record(&repo, kuriboh, 100, 3).await;

    let usecase = GetTopGainersUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
        currency: Currency::Usd,
    };

    let all = usecase.execute(None, None, now()).await.unwrap();
    let names: Vec<&str> = all.iter().map(|g| g.card.name.as_str()).collect();
    assert_eq!(names, vec!["Kuriboh", "Charizard", "Pikachu"]);
    assert_eq!(all[1].change.change, dollars(10000));
    assert_eq!(all[1].change.change_percent, Decimal::new(5000, 2));

    let pokemon = usecase
        .execute(Some(1), Some("pokemon"), now())
        .await
        .unwrap();
    assert_eq!(pokemon.len(), 1);
    assert_eq!(pokemon[0].card.name, "Charizard");
}

#[tokio::test]
async fn should_skip_cards_without_both_windows() {
    let repo = MemoryRepo::new();
    let fresh = new_card(&repo, "Fresh Print", "mtg").await;
    record(&repo, fresh, 500, 1).await;
    record(&repo, fresh, 700, 0).await;

    let usecase = GetTopGainersUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
        currency: Currency::Usd,
    };
    assert!(usecase.execute(None, None, now()).await.unwrap().is_empty());
}
