//! `Authorization: Bearer` header parsing.

use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::HeaderMap;

/// Non-empty bearer token from `headers`, if the scheme is `Bearer`.
///
/// Only checks presence and scheme; signature and expiry are verified by
/// the service that owns the secret.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_owned())
        .filter(|t| !t.is_empty())
}
