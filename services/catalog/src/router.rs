use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};

use cardvault_core::error::{method_not_allowed, not_found};
use cardvault_core::health::healthz;
use cardvault_core::middleware::with_common_layers;

use crate::handlers::{
    card::{create_card, delete_card, get_card, list_cards, update_card},
    collection::{
        add_to_collection, get_collection_entry, get_collection_stats, list_collection,
        remove_from_collection, update_collection_entry,
    },
    price::{
        create_price, delete_price, get_current_prices, get_price, get_price_history,
        get_top_gainers, update_price,
    },
    profile::{get_my_profile, get_profile, update_my_profile},
    readyz,
};
use crate::state::AppState;

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Catalog
        .route("/cards", get(list_cards).post(create_card))
        .route(
            "/cards/{id}",
            get(get_card).put(update_card).delete(delete_card),
        )
        // Collections
        .route("/collections", get(list_collection).post(add_to_collection))
        .route("/collections/stats", get(get_collection_stats))
        .route(
            "/collections/{id}",
            get(get_collection_entry)
                .put(update_collection_entry)
                .delete(remove_from_collection),
        )
        // Prices
        .route("/prices", post(create_price))
        .route("/prices/top-gainers", get(get_top_gainers))
        .route("/prices/cards/{card_id}", get(get_current_prices))
        .route("/prices/cards/{card_id}/history", get(get_price_history))
        .route(
            "/prices/{id}",
            get(get_price).put(update_price).delete(delete_price),
        )
        // Profiles
        .route("/profiles/@me", get(get_my_profile).put(update_my_profile))
        .route("/profiles/{id}", get(get_profile))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state);
    with_common_layers(router, request_timeout)
}
