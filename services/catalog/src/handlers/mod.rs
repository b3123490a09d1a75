pub mod card;
pub mod collection;
pub mod price;
pub mod profile;

use axum::extract::{FromRequest, State};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use cardvault_core::health::readiness;

use crate::error::CatalogServiceError;
use crate::state::AppState;

/// `GET /readyz`: ready once the database answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(&state.db).await
}

/// JSON request body. Malformed or mistyped bodies are rejected as `INVALID_BODY`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(CatalogServiceError))]
pub struct JsonBody<T>(pub T);

/// Parse a path segment as a UUID.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, CatalogServiceError> {
    raw.parse()
        .map_err(|_| CatalogServiceError::InvalidId(raw.to_owned()))
}

/// Parse a raw query string; an absent query yields the defaults.
pub(crate) fn parse_query<T>(raw_query: Option<&str>) -> Result<T, CatalogServiceError>
where
    T: DeserializeOwned + Default,
{
    Ok(raw_query
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| CatalogServiceError::InvalidQuery(e.to_string()))?
        .unwrap_or_default())
}
