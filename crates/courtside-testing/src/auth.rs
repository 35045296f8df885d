//! Mock auth helpers for integration tests.
//!
//! Mints real bearer tokens with a test secret so requests pass through the
//! same verification path as production traffic.

use axum::http::HeaderValue;
use courtside_auth_types::token::issue_access_token;

/// Secret shared by test routers and `MockAuth`.
pub const TEST_JWT_SECRET: &str = "courtside-test-jwt-secret";

/// Identity injected into test requests.
pub struct MockAuth {
    pub phone: String,
    pub secret: String,
}

impl MockAuth {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            secret: TEST_JWT_SECRET.to_owned(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// A token valid for one hour.
    pub fn token(&self) -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        issue_access_token(&self.phone, &self.secret, now, 3600).unwrap()
    }

    /// `Authorization: Bearer <token>` header value.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap()
    }
}
