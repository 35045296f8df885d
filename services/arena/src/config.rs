use serde::Deserialize;

use courtside_auth_types::token::ACCESS_TOKEN_TTL_SECS;
use courtside_core::config::Config;

/// Arena service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (OTP challenges).
    pub redis_url: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Pepper mixed into every OTP hash.
    pub otp_secret: String,
    /// TCP port to listen on. Env var: `ARENA_PORT`.
    #[serde(default = "default_port")]
    pub arena_port: u16,
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_secs: u64,
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_secs: u64,
    /// Failed verifications tolerated per challenge before 429.
    #[serde(default = "default_otp_max_attempts")]
    pub otp_max_attempts: u32,
    /// Base URL for opaque split-payment links.
    #[serde(default = "default_payment_link_base")]
    pub payment_link_base: String,
}

fn default_port() -> u16 {
    3120
}

fn default_access_token_ttl() -> u64 {
    ACCESS_TOKEN_TTL_SECS
}

fn default_otp_ttl() -> u64 {
    300
}

fn default_otp_max_attempts() -> u32 {
    5
}

fn default_payment_link_base() -> String {
    "https://pay.courtside.app".to_owned()
}

impl Config for ArenaConfig {}
