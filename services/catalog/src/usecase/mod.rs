pub mod card;
pub mod collection;
pub mod price;
pub mod profile;

use cardvault_domain::card::Condition;

use crate::error::CatalogServiceError;

/// Condition assumed when a request leaves it out.
pub const DEFAULT_CONDITION: Condition = Condition::NearMint;

/// Trim optional free text; blank becomes `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_condition(value: Option<&str>) -> Result<Condition, CatalogServiceError> {
    match value {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(DEFAULT_CONDITION),
    }
}
