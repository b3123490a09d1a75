use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::{Profile, validate_username};
use crate::error::CatalogServiceError;
use crate::usecase::non_blank;

async fn find_or_create<R: ProfileRepository>(
    repo: &R,
    user_id: Uuid,
) -> Result<Profile, CatalogServiceError> {
    if let Some(profile) = repo.find_by_id(user_id).await? {
        return Ok(profile);
    }
    let now = Utc::now();
    let profile = Profile {
        id: user_id,
        username: None,
        display_name: None,
        avatar_url: None,
        created_at: now,
        updated_at: now,
    };
    repo.create(&profile).await?;
    tracing::info!(user_id = %user_id, "profile created");
    // Re-read: a concurrent first request may have inserted it.
    Ok(repo.find_by_id(user_id).await?.unwrap_or(profile))
}

// ── GetMyProfile ────────────────────────────────────────────────────────────

pub struct GetMyProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> GetMyProfileUseCase<R> {
    /// The caller's profile, created empty on first access.
    pub async fn execute(&self, user_id: Uuid) -> Result<Profile, CatalogServiceError> {
        find_or_create(&self.repo, user_id).await
    }
}

// ── GetProfile ──────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Profile, CatalogServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogServiceError::ProfileNotFound)
    }
}

// ── UpdateMyProfile ─────────────────────────────────────────────────────────

/// `Some("")` clears `display_name` or `avatar_url`. The username can be set but not cleared.
#[derive(Default)]
pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct UpdateMyProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> UpdateMyProfileUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<Profile, CatalogServiceError> {
        if input.username.is_none() && input.display_name.is_none() && input.avatar_url.is_none()
        {
            return Err(CatalogServiceError::MissingData);
        }
        if let Some(ref username) = input.username {
            if !validate_username(username) {
                return Err(CatalogServiceError::InvalidUsername);
            }
        }

        let mut profile = find_or_create(&self.repo, user_id).await?;
        if let Some(username) = input.username {
            if let Some(holder) = self.repo.find_by_username(&username).await? {
                if holder.id != user_id {
                    return Err(CatalogServiceError::UsernameTaken);
                }
            }
            profile.username = Some(username);
        }
        if input.display_name.is_some() {
            profile.display_name = non_blank(input.display_name);
        }
        if input.avatar_url.is_some() {
            profile.avatar_url = non_blank(input.avatar_url);
        }
        profile.updated_at = Utc::now();

        self.repo.update(&profile).await?;
        Ok(profile)
    }
}
