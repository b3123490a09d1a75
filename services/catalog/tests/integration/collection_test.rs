use chrono::{Duration, Utc};
use uuid::Uuid;

use cardvault_catalog::error::CatalogServiceError;
use cardvault_catalog::usecase::card::{CreateCardInput, CreateCardUseCase, DeleteCardUseCase};
use cardvault_catalog::usecase::collection::{
    AddToCollectionInput, AddToCollectionUseCase, GetCollectionEntryUseCase,
    GetCollectionStatsUseCase, ListCollectionInput, ListCollectionUseCase,
    RemoveFromCollectionUseCase, UpdateCollectionEntryInput, UpdateCollectionEntryUseCase,
};
use cardvault_domain::card::{Condition, Currency};

use crate::helpers::{MemoryRepo, dollars, price_at};

async fn new_card(repo: &MemoryRepo, name: &str, set_name: &str) -> Uuid {
    CreateCardUseCase { repo: repo.clone() }
        .execute(CreateCardInput {
            name: Some(name.into()),
            game: Some("mtg".into()),
            set_name: Some(set_name.into()),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

fn add_input(card_id: Uuid, quantity: i32) -> AddToCollectionInput {
    AddToCollectionInput {
        card_id,
        condition: None,
        quantity: Some(quantity),
        purchase_price: None,
        purchase_date: None,
        notes: None,
    }
}

fn adder(repo: &MemoryRepo) -> AddToCollectionUseCase<MemoryRepo, MemoryRepo> {
    AddToCollectionUseCase {
        cards: repo.clone(),
        collection: repo.clone(),
    }
}

fn stats(repo: &MemoryRepo) -> GetCollectionStatsUseCase<MemoryRepo, MemoryRepo> {
    GetCollectionStatsUseCase {
        collection: repo.clone(),
        prices: repo.clone(),
        currency: Currency::Usd,
    }
}

// ── Add ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_merge_repeat_adds_into_one_entry() {
    let repo = MemoryRepo::new();
    let user = Uuid::now_v7();
    let card_id = new_card(&repo, "Llanowar Elves", "Alpha").await;

    let first = adder(&repo).execute(user, add_input(card_id, 2)).await.unwrap();
    let second = adder(&repo).execute(user, add_input(card_id, 3)).await.unwrap();

    assert_eq!(first.entry.id, second.entry.id);
    assert_eq!(second.entry.quantity, 5);
    assert_eq!(second.entry.condition, Condition::NearMint);
    assert_eq!(repo.entry_count(), 1);
}

#[tokio::test]
async fn should_reject_unknown_card_without_writing() {
    let repo = MemoryRepo::new();
    let result = adder(&repo)
        .execute(Uuid::now_v7(), add_input(Uuid::now_v7(), 1))
        .await;
    assert!(matches!(result, Err(CatalogServiceError::CardNotFound)));
    assert_eq!(repo.entry_count(), 0);
}

// ── Ownership ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_entries_of_other_users() {
    let repo = MemoryRepo::new();
    let alice = Uuid::now_v7();
    let bob = Uuid::now_v7();
    let card_id = new_card(&repo, "Shivan Dragon", "Alpha").await;
    let owned = adder(&repo).execute(alice, add_input(card_id, 1)).await.unwrap();

    let get = GetCollectionEntryUseCase { repo: repo.clone() };
    assert!(matches!(
        get.execute(bob, owned.entry.id).await,
        Err(CatalogServiceError::CollectionEntryNotFound)
    ));

    let remove = RemoveFromCollectionUseCase { repo: repo.clone() };
    assert!(matches!(
        remove.execute(bob, owned.entry.id).await,
        Err(CatalogServiceError::CollectionEntryNotFound)
    ));
    assert_eq!(repo.entry_count(), 1);

    let list = ListCollectionUseCase { repo: repo.clone() };
    let bobs = list
        .execute(bob, ListCollectionInput::default())
        .await
        .unwrap();
    assert!(bobs.is_empty());

    remove.execute(alice, owned.entry.id).await.unwrap();
    assert_eq!(repo.entry_count(), 0);
}

#[tokio::test]
async fn should_refuse_condition_move_onto_existing_entry() {
    let repo = MemoryRepo::new();
    let user = Uuid::now_v7();
    let card_id = new_card(&repo, "Serra Angel", "Alpha").await;
    let near_mint = adder(&repo).execute(user, add_input(card_id, 1)).await.unwrap();
    adder(&repo)
        .execute(
            user,
            AddToCollectionInput {
                condition: Some("damaged".into()),
                ..add_input(card_id, 1)
            },
        )
        .await
        .unwrap();

    let update = UpdateCollectionEntryUseCase { repo: repo.clone() };
    let result = update
        .execute(
            user,
            near_mint.entry.id,
            UpdateCollectionEntryInput {
                condition: Some("damaged".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(CatalogServiceError::DuplicateCollectionEntry)
    ));
}

#[tokio::test]
async fn should_drop_entries_when_card_is_deleted() {
    let repo = MemoryRepo::new();
    let user = Uuid::now_v7();
    let card_id = new_card(&repo, "Juzam Djinn", "Arabian Nights").await;
    adder(&repo).execute(user, add_input(card_id, 1)).await.unwrap();

    DeleteCardUseCase { repo: repo.clone() }
        .execute(card_id)
        .await
        .unwrap();
    assert_eq!(repo.entry_count(), 0);
}

// ── Stats ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_value_collection_and_name_rarest_card() {
    let repo = MemoryRepo::new();
    let user = Uuid::now_v7();
    let card_a = new_card(&repo, "Card A", "Alpha").await;
    let card_b = new_card(&repo, "Card B", "Beta").await;
    let unpriced = new_card(&repo, "Card C", "Gamma").await;

    let now = Utc::now();
    repo.insert_price(price_at(card_a, Condition::NearMint, 800, now - Duration::days(3)));
    repo.insert_price(price_at(card_a, Condition::NearMint, 1000, now - Duration::days(1)));
    repo.insert_price(price_at(card_b, Condition::NearMint, 5000, now - Duration::days(1)));

    adder(&repo).execute(user, add_input(card_a, 2)).await.unwrap();
    adder(&repo).execute(user, add_input(card_b, 1)).await.unwrap();
    adder(&repo).execute(user, add_input(unpriced, 4)).await.unwrap();

    let result = stats(&repo).execute(user, now).await.unwrap();
    assert_eq!(result.summary.total_cards, 3);
    assert_eq!(result.summary.total_quantity, 7);
    assert_eq!(result.summary.total_value, dollars(7000));
    let rarest = result.summary.rarest_card.unwrap();
    assert_eq!(rarest.label, "Card B (Beta)");
    assert_eq!(rarest.price, dollars(5000));
    // Every record sits in the current window, so nothing has a previous price.
    assert!(result.top_gainer.is_none());
}

#[tokio::test]
async fn should_pick_top_gainer_among_owned_cards_only() {
    let repo = MemoryRepo::new();
    let user = Uuid::now_v7();
    let owned = new_card(&repo, "Owned", "Set").await;
    let not_owned = new_card(&repo, "Not Owned", "Set").await;

    let now = Utc::now();
    repo.insert_price(price_at(owned, Condition::NearMint, 1000, now - Duration::days(10)));
    repo.insert_price(price_at(owned, Condition::NearMint, 1200, now - Duration::days(2)));
    repo.insert_price(price_at(not_owned, Condition::NearMint, 100, now - Duration::days(10)));
    repo.insert_price(price_at(not_owned, Condition::NearMint, 900, now - Duration::days(2)));
    // Same card, condition the user does not hold.
    repo.insert_price(price_at(owned, Condition::Mint, 100, now - Duration::days(10)));
    repo.insert_price(price_at(owned, Condition::Mint, 500, now - Duration::days(2)));

    adder(&repo).execute(user, add_input(owned, 1)).await.unwrap();

    let result = stats(&repo).execute(user, now).await.unwrap();
    let top = result.top_gainer.unwrap();
    assert_eq!(top.card.id, owned);
    assert_eq!(top.change.condition, Condition::NearMint);
    assert_eq!(top.change.change_percent, dollars(2000));
}

#[tokio::test]
async fn should_report_empty_collection() {
    let repo = MemoryRepo::new();
    let result = stats(&repo).execute(Uuid::now_v7(), Utc::now()).await.unwrap();
    assert_eq!(result.summary.total_cards, 0);
    assert_eq!(result.summary.total_value, dollars(0));
    assert!(result.summary.rarest_card.is_none());
    assert!(result.top_gainer.is_none());
}
