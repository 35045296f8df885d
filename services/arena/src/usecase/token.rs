use std::time::{SystemTime, UNIX_EPOCH};

use courtside_auth_types::token::{issue_access_token, validate_access_token};

use crate::error::ArenaError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Mints and verifies bearer tokens. Stateless: no refresh, no revocation list.
#[derive(Clone)]
pub struct TokenIssuer {
    pub secret: String,
    pub ttl_secs: u64,
}

impl TokenIssuer {
    /// Returns the token and its absolute expiry (unix seconds).
    pub fn mint(&self, subject: &str) -> Result<(String, u64), ArenaError> {
        let now = now_secs();
        let token = issue_access_token(subject, &self.secret, now, self.ttl_secs)
            .map_err(|e| ArenaError::Internal(e.into()))?;
        Ok((token, now + self.ttl_secs))
    }

    /// Subject of a valid, unexpired token. Every failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<String, ArenaError> {
        validate_access_token(token, &self.secret)
            .map(|info| info.subject)
            .map_err(|_| ArenaError::InvalidToken)
    }
}
