use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use cardvault_auth_types::identity::JwtSecret;
use cardvault_domain::card::Currency;

use crate::infra::db::{
    DbCardRepository, DbCollectionRepository, DbPriceRepository, DbProfileRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: JwtSecret,
    /// Currency that current prices, valuations and gainers are computed in.
    pub price_currency: Currency,
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}

impl AppState {
    pub fn card_repo(&self) -> DbCardRepository {
        DbCardRepository {
            db: self.db.clone(),
        }
    }

    pub fn price_repo(&self) -> DbPriceRepository {
        DbPriceRepository {
            db: self.db.clone(),
        }
    }

    pub fn collection_repo(&self) -> DbCollectionRepository {
        DbCollectionRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }
}
