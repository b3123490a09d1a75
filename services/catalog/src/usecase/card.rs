use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use cardvault_domain::card::{Currency, Game};
use cardvault_domain::pagination::PageRequest;

use crate::domain::pricing::latest_by_condition;
use crate::domain::repository::{CardRepository, PriceRepository};
use crate::domain::types::{Card, CardFilter, CardSortBy, PriceRecord};
use crate::error::CatalogServiceError;
use crate::usecase::non_blank;

/// A card with the current price of each condition it has been priced in,
/// ordered best condition first.
#[derive(Debug, Clone)]
pub struct CardWithPrices {
    pub card: Card,
    pub prices: Vec<PriceRecord>,
}

fn current_prices(records: &[PriceRecord]) -> Vec<PriceRecord> {
    latest_by_condition(records)
        .into_values()
        .cloned()
        .collect()
}

// ── ListCards ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ListCardsInput {
    pub game: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub include_prices: bool,
    pub page: PageRequest,
}

pub struct ListCardsUseCase<C: CardRepository, P: PriceRepository> {
    pub cards: C,
    pub prices: P,
    pub currency: Currency,
}

impl<C: CardRepository, P: PriceRepository> ListCardsUseCase<C, P> {
    pub async fn execute(
        &self,
        input: ListCardsInput,
    ) -> Result<Vec<CardWithPrices>, CatalogServiceError> {
        let game = input.game.as_deref().map(str::parse::<Game>).transpose()?;
        let sort_by = match input.sort_by.as_deref() {
            Some(raw) => CardSortBy::from_kebab_case(raw)
                .ok_or_else(|| CatalogServiceError::InvalidSort(raw.to_owned()))?,
            None => CardSortBy::default(),
        };
        let filter = CardFilter {
            game,
            search: non_blank(input.search),
            sort_by,
            page: input.page.clamped(),
        };

        let cards = self.cards.list(&filter).await?;
        if !input.include_prices || cards.is_empty() {
            return Ok(cards
                .into_iter()
                .map(|card| CardWithPrices {
                    card,
                    prices: vec![],
                })
                .collect());
        }

        let ids: Vec<Uuid> = cards.iter().map(|c| c.id).collect();
        let mut by_card: HashMap<Uuid, Vec<PriceRecord>> = HashMap::new();
        for record in self.prices.list_for_cards(&ids, self.currency).await? {
            by_card.entry(record.card_id).or_default().push(record);
        }
        Ok(cards
            .into_iter()
            .map(|card| {
                let prices = by_card
                    .get(&card.id)
                    .map(|records| current_prices(records))
                    .unwrap_or_default();
                CardWithPrices { card, prices }
            })
            .collect())
    }
}

// ── GetCard ─────────────────────────────────────────────────────────────────

pub struct GetCardUseCase<C: CardRepository, P: PriceRepository> {
    pub cards: C,
    pub prices: P,
    pub currency: Currency,
}

impl<C: CardRepository, P: PriceRepository> GetCardUseCase<C, P> {
    pub async fn execute(&self, id: Uuid) -> Result<CardWithPrices, CatalogServiceError> {
        let card = self
            .cards
            .find_by_id(id)
            .await?
            .ok_or(CatalogServiceError::CardNotFound)?;
        let records = self.prices.list_for_cards(&[id], self.currency).await?;
        Ok(CardWithPrices {
            card,
            prices: current_prices(&records),
        })
    }
}

// ── CreateCard ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CreateCardInput {
    pub name: Option<String>,
    pub game: Option<String>,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

pub struct CreateCardUseCase<C: CardRepository> {
    pub repo: C,
}

impl<C: CardRepository> CreateCardUseCase<C> {
    pub async fn execute(&self, input: CreateCardInput) -> Result<Card, CatalogServiceError> {
        let name = non_blank(input.name).ok_or(CatalogServiceError::MissingField("name"))?;
        let game: Game = input
            .game
            .as_deref()
            .ok_or(CatalogServiceError::MissingField("game"))?
            .parse()?;

        let now = Utc::now();
        let card = Card {
            id: Uuid::now_v7(),
            name,
            game,
            set_name: non_blank(input.set_name),
            rarity: non_blank(input.rarity),
            card_number: non_blank(input.card_number),
            image_url: non_blank(input.image_url),
            description: non_blank(input.description),
            created_at: now,
            updated_at: now,
        };
        if self.repo.find_by_identity(&card).await?.is_some() {
            return Err(CatalogServiceError::CardAlreadyExists);
        }
        self.repo.create(&card).await?;
        Ok(card)
    }
}

// ── UpdateCard ──────────────────────────────────────────────────────────────

/// Partial update. `Some("")` clears an optional field.
#[derive(Default)]
pub struct UpdateCardInput {
    pub name: Option<String>,
    pub game: Option<String>,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub card_number: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl UpdateCardInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.game.is_none()
            && self.set_name.is_none()
            && self.rarity.is_none()
            && self.card_number.is_none()
            && self.image_url.is_none()
            && self.description.is_none()
    }
}

pub struct UpdateCardUseCase<C: CardRepository> {
    pub repo: C,
}

impl<C: CardRepository> UpdateCardUseCase<C> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateCardInput,
    ) -> Result<Card, CatalogServiceError> {
        if input.is_empty() {
            return Err(CatalogServiceError::MissingData);
        }
        let name = match input.name {
            Some(name) => {
                Some(non_blank(Some(name)).ok_or(CatalogServiceError::MissingField("name"))?)
            }
            None => None,
        };
        let game = input.game.as_deref().map(str::parse::<Game>).transpose()?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogServiceError::CardNotFound)?;

        let mut card = existing.clone();
        if let Some(name) = name {
            card.name = name;
        }
        if let Some(game) = game {
            card.game = game;
        }
        if input.set_name.is_some() {
            card.set_name = non_blank(input.set_name);
        }
        if input.rarity.is_some() {
            card.rarity = non_blank(input.rarity);
        }
        if input.card_number.is_some() {
            card.card_number = non_blank(input.card_number);
        }
        if input.image_url.is_some() {
            card.image_url = non_blank(input.image_url);
        }
        if input.description.is_some() {
            card.description = non_blank(input.description);
        }
        card.updated_at = Utc::now();

        let identity_changed = card.name != existing.name
            || card.game != existing.game
            || card.set_name != existing.set_name
            || card.card_number != existing.card_number;
        if identity_changed {
            if let Some(other) = self.repo.find_by_identity(&card).await? {
                if other.id != card.id {
                    return Err(CatalogServiceError::CardAlreadyExists);
                }
            }
        }

        self.repo.update(&card).await?;
        Ok(card)
    }
}

// ── DeleteCard ──────────────────────────────────────────────────────────────

pub struct DeleteCardUseCase<C: CardRepository> {
    pub repo: C,
}

impl<C: CardRepository> DeleteCardUseCase<C> {
    pub async fn execute(&self, id: Uuid) -> Result<(), CatalogServiceError> {
        if !self.repo.delete(id).await? {
            return Err(CatalogServiceError::CardNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    use cardvault_domain::card::Condition;

    use crate::testing::{MemoryRepo, card, price_at};

    #[tokio::test]
    async fn should_require_name_on_create() {
        let usecase = CreateCardUseCase {
            repo: MemoryRepo::new(),
        };
        let result = usecase
            .execute(CreateCardInput {
                name: Some("   ".into()),
                game: Some("mtg".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(CatalogServiceError::MissingField("name"))));
        assert!(usecase.repo.writes().is_empty());
    }

    #[tokio::test]
    async fn should_reject_unknown_game_on_create() {
        let usecase = CreateCardUseCase {
            repo: MemoryRepo::new(),
        };
        let result = usecase
            .execute(CreateCardInput {
                name: Some("Pikachu".into()),
                game: Some("digimon".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(CatalogServiceError::InvalidGame(v)) if v == "digimon"));
    }

    #[tokio::test]
    async fn should_create_card_with_trimmed_fields() {
        let usecase = CreateCardUseCase {
            repo: MemoryRepo::new(),
        };
        let card = usecase
            .execute(CreateCardInput {
                name: Some(" Black Lotus ".into()),
                game: Some("mtg".into()),
                set_name: Some("Alpha".into()),
                rarity: Some("".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(card.name, "Black Lotus");
        assert_eq!(card.game, Game::Mtg);
        assert_eq!(card.set_name.as_deref(), Some("Alpha"));
        assert_eq!(card.rarity, None);
        assert_eq!(usecase.repo.writes(), vec!["card.create"]);
    }

    #[tokio::test]
    async fn should_reject_duplicate_card() {
        let existing = card("Black Lotus", Game::Mtg);
        let usecase = CreateCardUseCase {
            repo: MemoryRepo::new().with_cards(vec![existing]),
        };
        let result = usecase
            .execute(CreateCardInput {
                name: Some("Black Lotus".into()),
                game: Some("mtg".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(CatalogServiceError::CardAlreadyExists)));
    }

    #[tokio::test]
    async fn should_return_card_not_found_when_updating_missing_card() {
        let usecase = UpdateCardUseCase {
            repo: MemoryRepo::new(),
        };
        let result = usecase
            .execute(
                Uuid::now_v7(),
                UpdateCardInput {
                    rarity: Some("Rare".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogServiceError::CardNotFound)));
    }

    #[tokio::test]
    async fn should_return_missing_data_for_empty_update() {
        let usecase = UpdateCardUseCase {
            repo: MemoryRepo::new(),
        };
        let result = usecase
            .execute(Uuid::now_v7(), UpdateCardInput::default())
            .await;
        assert!(matches!(result, Err(CatalogServiceError::MissingData)));
    }

    #[tokio::test]
    async fn should_merge_partial_update() {
        let mut existing = card("Charizard", Game::Pokemon);
        existing.set_name = Some("Base Set".into());
        let id = existing.id;
        let usecase = UpdateCardUseCase {
            repo: MemoryRepo::new().with_cards(vec![existing]),
        };
        let updated = usecase
            .execute(
                id,
                UpdateCardInput {
                    rarity: Some("Holo Rare".into()),
                    set_name: Some("".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Charizard");
        assert_eq!(updated.rarity.as_deref(), Some("Holo Rare"));
        assert_eq!(updated.set_name, None);
        assert_eq!(usecase.repo.writes(), vec!["card.update"]);
    }

    #[tokio::test]
    async fn should_reject_rename_onto_existing_identity() {
        let taken = card("Blue-Eyes White Dragon", Game::Yugioh);
        let renamed = card("Dark Magician", Game::Yugioh);
        let id = renamed.id;
        let usecase = UpdateCardUseCase {
            repo: MemoryRepo::new().with_cards(vec![taken, renamed]),
        };
        let result = usecase
            .execute(
                id,
                UpdateCardInput {
                    name: Some("Blue-Eyes White Dragon".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogServiceError::CardAlreadyExists)));
    }

    #[tokio::test]
    async fn should_return_card_not_found_when_deleting_missing_card() {
        let usecase = DeleteCardUseCase {
            repo: MemoryRepo::new(),
        };
        let result = usecase.execute(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CatalogServiceError::CardNotFound)));
    }

    #[tokio::test]
    async fn should_return_identical_card_on_repeated_get() {
        let stored = card("Mew", Game::Pokemon);
        let id = stored.id;
        let usecase = GetCardUseCase {
            cards: MemoryRepo::new().with_cards(vec![stored]),
            prices: MemoryRepo::new(),
            currency: Currency::Usd,
        };
        let first = usecase.execute(id).await.unwrap();
        let second = usecase.execute(id).await.unwrap();
        assert_eq!(first.card, second.card);
    }

    #[tokio::test]
    async fn should_attach_current_prices_per_condition() {
        let stored = card("Mew", Game::Pokemon);
        let id = stored.id;
        let now = Utc::now();
        let mut euro = price_at(id, Condition::Mint, 9999, now);
        euro.currency = Currency::Eur;
        let usecase = GetCardUseCase {
            cards: MemoryRepo::new().with_cards(vec![stored]),
            prices: MemoryRepo::new().with_prices(vec![
                price_at(id, Condition::Mint, 1000, now - Duration::days(3)),
                price_at(id, Condition::Mint, 1200, now - Duration::days(1)),
                price_at(id, Condition::Damaged, 300, now - Duration::days(2)),
                euro,
            ]),
            currency: Currency::Usd,
        };
        let result = usecase.execute(id).await.unwrap();
        let summary: Vec<(Condition, Decimal)> =
            result.prices.iter().map(|p| (p.condition, p.price)).collect();
        assert_eq!(
            summary,
            vec![
                (Condition::Mint, Decimal::new(1200, 2)),
                (Condition::Damaged, Decimal::new(300, 2)),
            ]
        );
    }

    #[tokio::test]
    async fn should_reject_unknown_sort() {
        let usecase = ListCardsUseCase {
            cards: MemoryRepo::new(),
            prices: MemoryRepo::new(),
            currency: Currency::Usd,
        };
        let result = usecase
            .execute(ListCardsInput {
                sort_by: Some("price-desc".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(CatalogServiceError::InvalidSort(_))));
    }

    #[tokio::test]
    async fn should_list_cards_without_prices_unless_requested() {
        let stored = card("Pikachu", Game::Pokemon);
        let id = stored.id;
        let usecase = ListCardsUseCase {
            cards: MemoryRepo::new().with_cards(vec![stored, card("Island", Game::Mtg)]),
            prices: MemoryRepo::new().with_prices(vec![price_at(
                id,
                Condition::Mint,
                500,
                Utc::now(),
            )]),
            currency: Currency::Usd,
        };

        let plain = usecase
            .execute(ListCardsInput {
                game: Some("pokemon".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(plain.len(), 1);
        assert!(plain[0].prices.is_empty());

        let priced = usecase
            .execute(ListCardsInput {
                game: Some("pokemon".into()),
                include_prices: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(priced[0].prices.len(), 1);
    }
}
