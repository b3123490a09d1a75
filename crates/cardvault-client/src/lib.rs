//! Typed HTTP client for the CardVault catalog service.
//!
//! ```no_run
//! # async fn run() -> Result<(), cardvault_client::ClientError> {
//! use cardvault_client::{CardVaultClient, models::TopGainersQuery};
//!
//! let client = CardVaultClient::new("http://localhost:3120").with_token("<jwt>");
//! let gainers = client.top_gainers(&TopGainersQuery::default()).await?;
//! # let _ = gainers;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

pub use crate::error::ClientError;
use crate::error::api_error;
use crate::models::{
    Card, CardInput, CardQuery, CollectionEntry, CollectionEntryUpdate, CollectionQuery,
    CollectionStats, Gainer, HistoryPoint, HistoryQuery, NewCollectionEntry, NewPrice, Price,
    PriceCorrection, Profile, ProfileUpdate, TopGainersQuery,
};

/// One client per base URL. Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct CardVaultClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl CardVaultClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    // ── Cards ────────────────────────────────────────────────────────────────

    pub async fn list_cards(&self, query: &CardQuery) -> Result<Vec<Card>, ClientError> {
        self.fetch(self.request(Method::GET, &with_query("/cards", query)?))
            .await
    }

    pub async fn get_card(&self, id: Uuid) -> Result<Card, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/cards/{id}")))
            .await
    }

    pub async fn create_card(&self, card: &CardInput) -> Result<Card, ClientError> {
        self.fetch(self.request(Method::POST, "/cards").json(card))
            .await
    }

    pub async fn update_card(&self, id: Uuid, changes: &CardInput) -> Result<Card, ClientError> {
        self.fetch(self.request(Method::PUT, &format!("/cards/{id}")).json(changes))
            .await
    }

    pub async fn delete_card(&self, id: Uuid) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/cards/{id}")))
            .await
    }

    // ── Collections ──────────────────────────────────────────────────────────

    pub async fn list_collection(
        &self,
        query: &CollectionQuery,
    ) -> Result<Vec<CollectionEntry>, ClientError> {
        self.fetch(self.request(Method::GET, &with_query("/collections", query)?))
            .await
    }

    pub async fn collection_stats(&self) -> Result<CollectionStats, ClientError> {
        self.fetch(self.request(Method::GET, "/collections/stats"))
            .await
    }

    pub async fn get_collection_entry(&self, id: Uuid) -> Result<CollectionEntry, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/collections/{id}")))
            .await
    }

    /// Adding a card already held in the same condition increases its quantity.
    pub async fn add_to_collection(
        &self,
        entry: &NewCollectionEntry,
    ) -> Result<CollectionEntry, ClientError> {
        self.fetch(self.request(Method::POST, "/collections").json(entry))
            .await
    }

    pub async fn update_collection_entry(
        &self,
        id: Uuid,
        changes: &CollectionEntryUpdate,
    ) -> Result<CollectionEntry, ClientError> {
        self.fetch(
            self.request(Method::PUT, &format!("/collections/{id}"))
                .json(changes),
        )
        .await
    }

    pub async fn remove_from_collection(&self, id: Uuid) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/collections/{id}")))
            .await
    }

    // ── Prices ───────────────────────────────────────────────────────────────

    pub async fn current_prices(&self, card_id: Uuid) -> Result<Vec<Price>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/prices/cards/{card_id}")))
            .await
    }

    pub async fn price_history(
        &self,
        card_id: Uuid,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryPoint>, ClientError> {
        let path = with_query(&format!("/prices/cards/{card_id}/history"), query)?;
        self.fetch(self.request(Method::GET, &path)).await
    }

    pub async fn top_gainers(&self, query: &TopGainersQuery) -> Result<Vec<Gainer>, ClientError> {
        self.fetch(self.request(Method::GET, &with_query("/prices/top-gainers", query)?))
            .await
    }

    pub async fn get_price(&self, id: Uuid) -> Result<Price, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/prices/{id}")))
            .await
    }

    pub async fn record_price(&self, price: &NewPrice) -> Result<Price, ClientError> {
        self.fetch(self.request(Method::POST, "/prices").json(price))
            .await
    }

    pub async fn correct_price(
        &self,
        id: Uuid,
        changes: &PriceCorrection,
    ) -> Result<Price, ClientError> {
        self.fetch(self.request(Method::PUT, &format!("/prices/{id}")).json(changes))
            .await
    }

    pub async fn delete_price(&self, id: Uuid) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/prices/{id}")))
            .await
    }

    // ── Profiles ─────────────────────────────────────────────────────────────

    pub async fn my_profile(&self) -> Result<Profile, ClientError> {
        self.fetch(self.request(Method::GET, "/profiles/@me")).await
    }

    pub async fn update_my_profile(&self, changes: &ProfileUpdate) -> Result<Profile, ClientError> {
        self.fetch(self.request(Method::PUT, "/profiles/@me").json(changes))
            .await
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Profile, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/profiles/{id}")))
            .await
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = checked(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn execute(&self, req: RequestBuilder) -> Result<(), ClientError> {
        checked(req.send().await?).await?;
        Ok(())
    }
}

async fn checked(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().path().to_owned();
    let body = resp.text().await?;
    tracing::debug!(%status, %url, "catalog request failed");
    Err(api_error(status, &body))
}

fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, ClientError> {
    let encoded = serde_qs::to_string(query)?;
    if encoded.is_empty() {
        Ok(path.to_owned())
    } else {
        Ok(format!("{path}?{encoded}"))
    }
}
