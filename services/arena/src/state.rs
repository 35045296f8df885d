use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::infra::cache::RedisOtpStore;
use crate::infra::db::{
    DbGrantRepository, DbInvitationRepository, DbProfessionalRepository, DbTournamentRepository,
    DbUserRepository, DbVenueRepository,
};
use crate::usecase::token::TokenIssuer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub jwt_secret: String,
    pub otp_secret: String,
    pub access_token_ttl_secs: u64,
    pub otp_ttl_secs: u64,
    pub otp_max_attempts: u32,
    pub payment_link_base: String,
}

impl AppState {
    pub fn token_issuer(&self) -> TokenIssuer {
        TokenIssuer {
            secret: self.jwt_secret.clone(),
            ttl_secs: self.access_token_ttl_secs,
        }
    }

    pub fn otp_store(&self) -> RedisOtpStore {
        RedisOtpStore {
            pool: self.redis.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn grant_repo(&self) -> DbGrantRepository {
        DbGrantRepository {
            db: self.db.clone(),
        }
    }

    pub fn invitation_repo(&self) -> DbInvitationRepository {
        DbInvitationRepository {
            db: self.db.clone(),
        }
    }

    pub fn venue_repo(&self) -> DbVenueRepository {
        DbVenueRepository {
            db: self.db.clone(),
        }
    }

    pub fn professional_repo(&self) -> DbProfessionalRepository {
        DbProfessionalRepository {
            db: self.db.clone(),
        }
    }

    pub fn tournament_repo(&self) -> DbTournamentRepository {
        DbTournamentRepository {
            db: self.db.clone(),
        }
    }
}
