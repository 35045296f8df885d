use chrono::Utc;
use rand::RngExt;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use courtside_domain::phone::Phone;

use crate::domain::repository::{OtpStore, UserRepository};
use crate::domain::types::{OTP_LEN, OtpAttempt, OtpChallenge, User};
use crate::error::ArenaError;
use crate::usecase::token::TokenIssuer;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// `hex(SHA-256(secret : salt : phone : code))`.
fn hash_code(secret: &str, salt: &str, phone: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [secret, salt, phone, code] {
        hasher.update(part.as_bytes());
        hasher.update(b":");
    }
    hex::encode(hasher.finalize())
}

fn hashes_match(stored: &str, candidate: &str) -> bool {
    stored.as_bytes().ct_eq(candidate.as_bytes()).into()
}

pub fn validate_code_format(code: &str) -> Result<(), ArenaError> {
    if code.len() == OTP_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ArenaError::validation(format!("OTP must be {OTP_LEN} digits")))
    }
}

/// Check `code` against the live challenge for `phone`.
///
/// - no challenge, or expired (dropped, not counted): `Ok(false)`
/// - `max_attempts` attempts already recorded: `Err(OtpRateLimited)`
/// - otherwise the attempt is counted before comparing
/// - match: the challenge is consumed, `Ok(true)`; a concurrent winner makes this `Ok(false)`
/// - mismatch: `Ok(false)`
pub async fn verify_code<S: OtpStore>(
    store: &S,
    secret: &str,
    max_attempts: u32,
    phone: &str,
    code: &str,
) -> Result<bool, ArenaError> {
    let challenge = match store
        .reserve_attempt(phone, max_attempts, Utc::now().timestamp())
        .await?
    {
        OtpAttempt::Reserved(challenge) => challenge,
        OtpAttempt::Missing | OtpAttempt::Expired => return Ok(false),
        OtpAttempt::RateLimited => {
            tracing::warn!(phone, "otp verification rate limited");
            return Err(ArenaError::OtpRateLimited);
        }
    };

    let candidate = hash_code(secret, &challenge.salt, phone, code);
    if hashes_match(&challenge.code_hash, &candidate) {
        return store.consume(phone, &challenge.code_hash).await;
    }

    tracing::info!(phone, attempts = challenge.failed_attempts, "otp mismatch");
    Ok(false)
}

// ── SendOtp ──────────────────────────────────────────────────────────────────

pub struct SendOtpOutput {
    pub phone: String,
    /// Returned in-band; an SMS gateway would deliver it instead.
    pub otp: String,
    pub expires_in_minutes: u64,
}

pub struct SendOtpUseCase<S: OtpStore> {
    pub store: S,
    pub otp_secret: String,
    pub ttl_secs: u64,
}

impl<S: OtpStore> SendOtpUseCase<S> {
    pub async fn execute(&self, phone: &str) -> Result<SendOtpOutput, ArenaError> {
        let phone = Phone::parse(phone).map_err(|e| ArenaError::validation(e.to_string()))?;

        let code = generate_code();
        let salt = generate_salt();
        let now = Utc::now().timestamp();
        let challenge = OtpChallenge {
            code_hash: hash_code(&self.otp_secret, &salt, phone.as_str(), &code),
            salt,
            created_at: now,
            expires_at: now + self.ttl_secs as i64,
            failed_attempts: 0,
        };

        self.store
            .put(phone.as_str(), &challenge, self.ttl_secs)
            .await?;
        tracing::info!(phone = phone.as_str(), "otp issued");

        Ok(SendOtpOutput {
            phone: phone.into_inner(),
            otp: code,
            expires_in_minutes: self.ttl_secs.div_ceil(60),
        })
    }
}

// ── VerifyOtp (login / signup) ───────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub phone: String,
    pub otp: String,
}

#[derive(Debug)]
pub struct VerifyOtpOutput {
    pub access_token: String,
    pub expires_at: u64,
    pub user: User,
    pub is_new_user: bool,
}

pub struct VerifyOtpUseCase<S: OtpStore, U: UserRepository> {
    pub store: S,
    pub users: U,
    pub tokens: TokenIssuer,
    pub otp_secret: String,
    pub max_attempts: u32,
}

impl<S: OtpStore, U: UserRepository> VerifyOtpUseCase<S, U> {
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<VerifyOtpOutput, ArenaError> {
        let phone =
            Phone::parse(&input.phone).map_err(|e| ArenaError::validation(e.to_string()))?;
        validate_code_format(&input.otp)?;

        let verified = verify_code(
            &self.store,
            &self.otp_secret,
            self.max_attempts,
            phone.as_str(),
            &input.otp,
        )
        .await?;
        if !verified {
            return Err(ArenaError::InvalidOtp);
        }

        let (user, is_new_user) = self.users.upsert_verified(phone.as_str(), Utc::now()).await?;
        let (access_token, expires_at) = self.tokens.mint(&user.phone)?;
        tracing::info!(user_id = %user.id, is_new_user, "otp verified");

        Ok(VerifyOtpOutput {
            access_token,
            expires_at,
            user,
            is_new_user,
        })
    }
}
