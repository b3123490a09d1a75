use chrono::{Duration, Utc};

use cardvault_catalog::error::CatalogServiceError;
use cardvault_catalog::usecase::card::{
    CreateCardInput, CreateCardUseCase, DeleteCardUseCase, GetCardUseCase, ListCardsInput,
    ListCardsUseCase, UpdateCardInput, UpdateCardUseCase,
};
use cardvault_domain::card::{Condition, Currency};
use cardvault_domain::pagination::PageRequest;

use crate::helpers::{MemoryRepo, dollars, price_at};

fn card_input(name: &str, game: &str, set_name: &str) -> CreateCardInput {
    CreateCardInput {
        name: Some(name.into()),
        game: Some(game.into()),
        set_name: Some(set_name.into()),
        ..Default::default()
    }
}

// ── Create / identity ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_second_card_with_same_identity() {
    let repo = MemoryRepo::new();
    let usecase = CreateCardUseCase { repo: repo.clone() };

    usecase
        .execute(card_input("Dark Magician", "yugioh", "LOB"))
        .await
        .unwrap();
    let result = usecase
        .execute(card_input("Dark Magician", "yugioh", "LOB"))
        .await;
    assert!(matches!(result, Err(CatalogServiceError::CardAlreadyExists)));

    // A different printing is a different card.
    usecase
        .execute(card_input("Dark Magician", "yugioh", "SDY"))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_reject_update_that_collides_with_another_card() {
    let repo = MemoryRepo::new();
    let create = CreateCardUseCase { repo: repo.clone() };
    create
        .execute(card_input("Black Lotus", "mtg", "Alpha"))
        .await
        .unwrap();
    let beta = create
        .execute(card_input("Black Lotus", "mtg", "Beta"))
        .await
        .unwrap();

    let update = UpdateCardUseCase { repo: repo.clone() };
    let result = update
        .execute(
            beta.id,
            UpdateCardInput {
                set_name: Some("Alpha".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(CatalogServiceError::CardAlreadyExists)));
}

// ── List / get ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_cards_with_current_prices_per_condition() {
    let repo = MemoryRepo::new();
    let create = CreateCardUseCase { repo: repo.clone() };
    let pikachu = create
        .execute(card_input("Pikachu", "pokemon", "Base"))
        .await
        .unwrap();
    create
        .execute(card_input("Charizard", "pokemon", "Base"))
        .await
        .unwrap();
    create
        .execute(card_input("Blue-Eyes White Dragon", "yugioh", "LOB"))
        .await
        .unwrap();

    let now = Utc::now();
    repo.insert_price(price_at(pikachu.id, Condition::NearMint, 500, now - Duration::days(3)));
    repo.insert_price(price_at(pikachu.id, Condition::NearMint, 650, now - Duration::days(1)));
    repo.insert_price(price_at(pikachu.id, Condition::HeavyPlay, 200, now - Duration::days(2)));

    let usecase = ListCardsUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
        currency: Currency::Usd,
    };
    let cards = usecase
        .execute(ListCardsInput {
            game: Some("pokemon".into()),
            search: None,
            sort_by: Some("name-asc".into()),
            include_prices: true,
            page: PageRequest::default(),
        })
        .await
        .unwrap();

    let names: Vec<&str> = cards.iter().map(|c| c.card.name.as_str()).collect();
    assert_eq!(names, vec!["Charizard", "Pikachu"]);
    assert!(cards[0].prices.is_empty());

    let prices = &cards[1].prices;
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0].condition, Condition::NearMint);
    assert_eq!(prices[0].price, dollars(650));
    assert_eq!(prices[1].condition, Condition::HeavyPlay);
}

#[tokio::test]
async fn should_search_names_case_insensitively() {
    let repo = MemoryRepo::new();
    let create = CreateCardUseCase { repo: repo.clone() };
    create
        .execute(card_input("Lightning Bolt", "mtg", "Alpha"))
        .await
        .unwrap();
    create
        .execute(card_input("Counterspell", "mtg", "Alpha"))
        .await
        .unwrap();

    let usecase = ListCardsUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
        currency: Currency::Usd,
    };
    let cards = usecase
        .execute(ListCardsInput {
            game: None,
            search: Some("BOLT".into()),
            sort_by: None,
            include_prices: false,
            page: PageRequest::default(),
        })
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].card.name, "Lightning Bolt");
}

#[tokio::test]
async fn should_reject_unknown_game_filter() {
    let repo = MemoryRepo::new();
    let usecase = ListCardsUseCase {
        cards: repo.clone(),
        prices: repo,
        currency: Currency::Usd,
    };
    let result = usecase
        .execute(ListCardsInput {
            game: Some("chess".into()),
            search: None,
            sort_by: None,
            include_prices: false,
            page: PageRequest::default(),
        })
        .await;
    assert!(matches!(result, Err(CatalogServiceError::InvalidGame(_))));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_cascade_delete_to_prices() {
    let repo = MemoryRepo::new();
    let card = CreateCardUseCase { repo: repo.clone() }
        .execute(card_input("Mew", "pokemon", "Promo"))
        .await
        .unwrap();
    repo.insert_price(price_at(card.id, Condition::Mint, 9900, Utc::now()));
    assert_eq!(repo.price_count(), 1);

    DeleteCardUseCase { repo: repo.clone() }
        .execute(card.id)
        .await
        .unwrap();
    assert_eq!(repo.price_count(), 0);

    let get = GetCardUseCase {
        cards: repo.clone(),
        prices: repo.clone(),
        currency: Currency::Usd,
    };
    assert!(matches!(
        get.execute(card.id).await,
        Err(CatalogServiceError::CardNotFound)
    ));

    let again = DeleteCardUseCase { repo }.execute(card.id).await;
    assert!(matches!(again, Err(CatalogServiceError::CardNotFound)));
}
