//! Caller identity types.

use serde::{Deserialize, Serialize};

/// Permission level carried in the `role` claim of an access token.
///
/// Wire format: the identity provider's role string (`authenticated`,
/// `service_role`). Unknown roles are treated as the lowest level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    Authenticated,
    /// Administrative caller allowed to mutate the card catalog and price ledger.
    #[serde(rename = "service_role")]
    Admin,
}

impl CallerRole {
    /// Map a role claim to a caller role. Missing or unknown roles fall back to
    /// [`CallerRole::Authenticated`].
    pub fn from_claim(role: Option<&str>) -> Self {
        match role {
            Some("service_role") => Self::Admin,
            _ => Self::Authenticated,
        }
    }

    pub fn as_claim(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Admin => "service_role",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}
