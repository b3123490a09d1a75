use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cardvault_auth_types::identity::Identity;

use crate::domain::types::Profile;
use crate::error::CatalogServiceError;
use crate::handlers::{JsonBody, parse_id};
use crate::state::AppState;
use crate::usecase::profile::{
    GetMyProfileUseCase, GetProfileUseCase, UpdateMyProfileUseCase, UpdateProfileInput,
};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "cardvault_core::time::serialize_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

// ── GET /profiles/@me ───────────────────────────────────────────────────────

pub async fn get_my_profile(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, CatalogServiceError> {
    let usecase = GetMyProfileUseCase {
        repo: state.profile_repo(),
    };
    Ok(Json(usecase.execute(identity.user_id).await?.into()))
}

// ── PUT /profiles/@me ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn update_my_profile(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, CatalogServiceError> {
    let usecase = UpdateMyProfileUseCase {
        repo: state.profile_repo(),
    };
    let profile = usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                username: body.username,
                display_name: body.display_name,
                avatar_url: body.avatar_url,
            },
        )
        .await?;
    Ok(Json(profile.into()))
}

// ── GET /profiles/{id} ──────────────────────────────────────────────────────

pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, CatalogServiceError> {
    let id = parse_id(&id)?;
    let usecase = GetProfileUseCase {
        repo: state.profile_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}
