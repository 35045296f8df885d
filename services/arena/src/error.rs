use axum::response::{IntoResponse, Response};

use courtside_core::error::{ErrorClass, error_response};

/// Arena service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid or expired OTP")]
    InvalidOtp,
    #[error("too many failed attempts, request a new OTP later")]
    OtpRateLimited,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("not authenticated")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("user not found")]
    UserNotFound,
    #[error("manager not found")]
    GrantNotFound,
    #[error("invitation not found")]
    InvitationNotFound,
    #[error("venue not found")]
    VenueNotFound,
    #[error("booking not found")]
    BookingNotFound,
    #[error("professional not found")]
    ProfessionalNotFound,
    #[error("tournament not found")]
    TournamentNotFound,
    #[error("team not found")]
    TeamNotFound,
    #[error("this slot is already booked")]
    SlotTaken,
    #[error("this umpire is already booked for this tournament")]
    AlreadyBooked,
    #[error("tournament is full")]
    TournamentFull,
    #[error("team already registered for this tournament")]
    AlreadyRegistered,
    #[error("registration deadline has passed")]
    RegistrationClosed,
    #[error("professional is not available")]
    ProfessionalUnavailable,
    #[error("this user is already in your team")]
    AlreadyManager,
    #[error("invitation already sent to this user")]
    InvitationPending,
    #[error("invitation is no longer pending")]
    InvitationNotPending,
    #[error("invitation has expired")]
    InvitationExpired,
    #[error("phone number already registered, add the existing user instead")]
    PhoneAlreadyRegistered,
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("booking is cancelled")]
    BookingCancelled,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ArenaError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpRateLimited => "OTP_RATE_LIMITED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::GrantNotFound => "MANAGER_NOT_FOUND",
            Self::InvitationNotFound => "INVITATION_NOT_FOUND",
            Self::VenueNotFound => "VENUE_NOT_FOUND",
            Self::BookingNotFound => "BOOKING_NOT_FOUND",
            Self::ProfessionalNotFound => "PROFESSIONAL_NOT_FOUND",
            Self::TournamentNotFound => "TOURNAMENT_NOT_FOUND",
            Self::TeamNotFound => "TEAM_NOT_FOUND",
            Self::SlotTaken => "SLOT_TAKEN",
            Self::AlreadyBooked => "ALREADY_BOOKED",
            Self::TournamentFull => "TOURNAMENT_FULL",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::RegistrationClosed => "REGISTRATION_CLOSED",
            Self::ProfessionalUnavailable => "PROFESSIONAL_UNAVAILABLE",
            Self::AlreadyManager => "ALREADY_MANAGER",
            Self::InvitationPending => "INVITATION_PENDING",
            Self::InvitationNotPending => "INVITATION_NOT_PENDING",
            Self::InvitationExpired => "INVITATION_EXPIRED",
            Self::PhoneAlreadyRegistered => "PHONE_ALREADY_REGISTERED",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::BookingCancelled => "BOOKING_CANCELLED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_)
            | Self::InvalidOtp
            | Self::RegistrationClosed
            | Self::ProfessionalUnavailable => ErrorClass::Validation,
            Self::InvalidToken | Self::Unauthenticated => ErrorClass::Unauthenticated,
            Self::Forbidden(_) => ErrorClass::Forbidden,
            Self::UserNotFound
            | Self::GrantNotFound
            | Self::InvitationNotFound
            | Self::VenueNotFound
            | Self::BookingNotFound
            | Self::ProfessionalNotFound
            | Self::TournamentNotFound
            | Self::TeamNotFound => ErrorClass::NotFound,
            Self::SlotTaken
            | Self::AlreadyBooked
            | Self::TournamentFull
            | Self::AlreadyRegistered
            | Self::AlreadyManager
            | Self::InvitationPending
            | Self::InvitationNotPending
            | Self::InvitationExpired
            | Self::PhoneAlreadyRegistered
            | Self::EmailAlreadyRegistered
            | Self::BookingCancelled => ErrorClass::Conflict,
            Self::OtpRateLimited => ErrorClass::RateLimited,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl IntoResponse for ArenaError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Keep the anyhow chain for the log line; the body is redacted.
            Self::Internal(e) => format!("{e:#}"),
            other => other.to_string(),
        };
        error_response(self.class(), self.kind(), message)
    }
}
