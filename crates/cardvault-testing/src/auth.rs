//! Mock identity-provider helpers for integration tests.
//!
//! Services verify `Authorization: Bearer <jwt>` against a shared secret. In tests,
//! `MockAuth` signs tokens with that secret directly so no real provider is needed.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderValue;
use uuid::Uuid;

use cardvault_auth_types::token::issue_access_token;
use cardvault_domain::user::CallerRole;

/// Secret used by every test that does not care about the value.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity signed into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: CallerRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: CallerRole) -> Self {
        Self { user_id, role }
    }

    /// Ordinary signed-in user with a fresh id.
    pub fn user() -> Self {
        Self::new(Uuid::now_v7(), CallerRole::Authenticated)
    }

    /// Admin caller with a fresh id.
    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), CallerRole::Admin)
    }

    /// A token valid for one hour, signed with `secret`.
    pub fn token(&self, secret: &str) -> String {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            + 3600;
        issue_access_token(self.user_id, self.role, exp, secret)
            .unwrap_or_else(|e| panic!("failed to sign test token: {e}"))
    }

    /// `Authorization` header value for [`TEST_JWT_SECRET`].
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token(TEST_JWT_SECRET)))
            .unwrap_or_else(|e| panic!("invalid header value: {e}"))
    }
}
