//! Bearer-token identity extractors.

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use cardvault_domain::user::CallerRole;

use crate::token::{AuthError, validate_access_token};

/// HMAC secret shared with the identity provider. Put it in the router state and
/// expose it via [`FromRef`] so the extractors can reach it.
#[derive(Clone)]
pub struct JwtSecret(pub Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Why a request could not be attributed to a caller.
#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] AuthError),
    #[error("forbidden")]
    Forbidden,
}

impl AuthRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken | Self::InvalidToken(_) => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingToken | Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        };
        let body = serde_json::json!({
            "kind": self.kind(),
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Authenticated caller resolved from `Authorization: Bearer <jwt>`.
///
/// Rejects with 401 if the header is absent or the token does not validate.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: CallerRole,
}

fn resolve(parts: &Parts, secret: &JwtSecret) -> Result<Identity, AuthRejection> {
    let bearer = parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AuthRejection::MissingToken)?;
    let info = validate_access_token(bearer.token(), &secret.0).inspect_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
    })?;
    Ok(Identity {
        user_id: info.user_id,
        role: info.role,
    })
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    // Resolve synchronously and hand back a 'static future so the returned
    // future does not borrow `parts` or `state`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = resolve(parts, &secret);
        async move { result }
    }
}

/// Caller holding the admin role. 401 without a valid token, 403 for other roles.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = resolve(parts, &secret).and_then(|identity| {
            if identity.role.is_admin() {
                Ok(AdminIdentity(identity))
            } else {
                Err(AuthRejection::Forbidden)
            }
        });
        async move { result }
    }
}
