//! Signed bearer tokens.
//!
//! A token carries the phone number it was issued for (`sub`) and an
//! absolute expiry. Anyone holding it acts as that phone's user until `exp`.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "issuer", test))]
use serde::Serialize;

/// Default token lifetime: 7 days.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 604_800;

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Phone number the token was issued for.
    pub subject: String,
    pub expires_at: u64,
}

/// Every verification failure collapses into this one error so callers
/// cannot distinguish a forged token from an expired one.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid or expired token")]
pub struct InvalidToken;

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | phone number (`+91XXXXXXXXXX`) |
/// | `exp` | `exp` | expiry, seconds since UNIX epoch |
///
/// [`Serialize`] requires the **`issuer`** cargo feature.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "issuer", test), derive(Serialize))]
pub struct AccessClaims {
    pub sub: String,
    pub exp: u64,
}

fn validation() -> Validation {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    // Expiry is absolute: a token is dead the second `exp` passes.
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Verify a bearer token's signature and expiry.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, InvalidToken> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        InvalidToken
    })?;

    if data.claims.sub.is_empty() {
        return Err(InvalidToken);
    }
    Ok(TokenInfo {
        subject: data.claims.sub,
        expires_at: data.claims.exp,
    })
}

/// Mint an HS256 token for `subject` that expires `ttl_secs` after `now_secs`.
#[cfg(any(feature = "issuer", test))]
pub fn issue_access_token(
    subject: &str,
    secret: &str,
    now_secs: u64,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = AccessClaims {
        sub: subject.to_owned(),
        exp: now_secs + ttl_secs,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
}
