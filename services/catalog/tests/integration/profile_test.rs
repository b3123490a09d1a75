use uuid::Uuid;

use cardvault_catalog::error::CatalogServiceError;
use cardvault_catalog::usecase::profile::{
    GetMyProfileUseCase, GetProfileUseCase, UpdateMyProfileUseCase, UpdateProfileInput,
};

use crate::helpers::MemoryRepo;

#[tokio::test]
async fn should_expose_profile_publicly_after_first_access() {
    let repo = MemoryRepo::new();
    let user = Uuid::now_v7();

    let public = GetProfileUseCase { repo: repo.clone() };
    assert!(matches!(
        public.execute(user).await,
        Err(CatalogServiceError::ProfileNotFound)
    ));

    let mine = GetMyProfileUseCase { repo: repo.clone() }
        .execute(user)
        .await
        .unwrap();
    assert!(mine.username.is_none());

    let seen = public.execute(user).await.unwrap();
    assert_eq!(seen.id, user);
}

#[tokio::test]
async fn should_set_and_clear_optional_fields() {
    let repo = MemoryRepo::new();
    let user = Uuid::now_v7();
    let update = UpdateMyProfileUseCase { repo: repo.clone() };

    let set = update
        .execute(
            user,
            UpdateProfileInput {
                username: Some("deck_builder".into()),
                display_name: Some("Deck Builder".into()),
                avatar_url: Some("https://cdn.example/a.png".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(set.username.as_deref(), Some("deck_builder"));

    let cleared = update
        .execute(
            user,
            UpdateProfileInput {
                display_name: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.display_name.is_none());
    assert_eq!(cleared.username.as_deref(), Some("deck_builder"));
    assert_eq!(cleared.avatar_url.as_deref(), Some("https://cdn.example/a.png"));
}

#[tokio::test]
async fn should_reject_username_held_by_someone_else() {
    let repo = MemoryRepo::new();
    let update = UpdateMyProfileUseCase { repo: repo.clone() };
    let claim = |name: &str| UpdateProfileInput {
        username: Some(name.into()),
        ..Default::default()
    };

    update.execute(Uuid::now_v7(), claim("vintage")).await.unwrap();
    let result = update.execute(Uuid::now_v7(), claim("vintage")).await;
    assert!(matches!(result, Err(CatalogServiceError::UsernameTaken)));

    let result = update.execute(Uuid::now_v7(), claim("no spaces")).await;
    assert!(matches!(result, Err(CatalogServiceError::InvalidUsername)));
}
