use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::domain::types::User;
use crate::error::ArenaError;
use crate::handlers::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::otp::{SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

// ── POST /auth/send-otp ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
}

#[derive(Serialize)]
pub struct SendOtpResponse {
    pub phone: String,
    pub otp: String,
    pub expires_in_minutes: u64,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, ArenaError> {
    let usecase = SendOtpUseCase {
        store: state.otp_store(),
        otp_secret: state.otp_secret.clone(),
        ttl_secs: state.otp_ttl_secs,
    };
    let out = usecase.execute(&body.phone).await?;
    Ok(Json(SendOtpResponse {
        phone: out.phone,
        otp: out.otp,
        expires_in_minutes: out.expires_in_minutes,
    }))
}

// ── POST /auth/verify-otp ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: u64,
    pub user: User,
    pub is_new_user: bool,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, ArenaError> {
    let usecase = VerifyOtpUseCase {
        store: state.otp_store(),
        users: state.user_repo(),
        tokens: state.token_issuer(),
        otp_secret: state.otp_secret.clone(),
        max_attempts: state.otp_max_attempts,
    };
    let out = usecase
        .execute(VerifyOtpInput {
            phone: body.phone,
            otp: body.otp,
        })
        .await?;
    Ok(Json(VerifyOtpResponse {
        access_token: out.access_token,
        token_type: "bearer",
        expires_at: out.expires_at,
        user: out.user,
        is_new_user: out.is_new_user,
    }))
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

// ── POST /auth/logout ────────────────────────────────────────────────────────

/// Tokens carry no server-side state; the client discards its copy and the
/// token stays valid until it expires.
pub async fn logout(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    tracing::info!(user_id = %user.id, "logout");
    StatusCode::NO_CONTENT
}
