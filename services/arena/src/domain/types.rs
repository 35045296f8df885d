use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtside_core::serde::{hhmm, to_rfc3339_ms, to_rfc3339_ms_opt};
use courtside_domain::capability::CapabilitySet;
use courtside_domain::user::UserRole;

// ── Constants ────────────────────────────────────────────────────────────────

/// OTP length in digits.
pub const OTP_LEN: usize = 6;

/// Invitations stay actionable for 7 days.
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Evening band `[18:00, 22:00)` where `peak_hour_price` applies.
pub const PEAK_START_HOUR: u32 = 18;
pub const PEAK_END_HOUR: u32 = 22;

pub const DEFAULT_CURRENCY: &str = "INR";

/// Initial payment status for bookings and registrations.
pub const PAYMENT_PENDING: &str = "pending";

// ── Identity ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_verified: bool,
    pub is_active: bool,
    pub onboarding_completed: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_organizer(&self) -> bool {
        self.role.is_some_and(UserRole::is_organizer)
    }
}

/// Stored OTP challenge. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub salt: String,
    pub code_hash: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub failed_attempts: u32,
}

impl OtpChallenge {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Outcome of reserving one verification attempt against a stored challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpAttempt {
    Missing,
    /// The challenge had expired and was dropped.
    Expired,
    RateLimited,
    /// The attempt was counted; `failed_attempts` includes it.
    Reserved(OtpChallenge),
}

// ── Delegation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ManagerGrant {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub manager_user_id: Option<Uuid>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role_description: Option<String>,
    #[serde(rename = "permissions")]
    pub capabilities: CapabilitySet,
    pub is_active: bool,
    pub is_verified: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
    /// Pending invitation swept after `expires_at` passed.
    Expired,
}

impl InvitationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Invitation {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "permissions")]
    pub capabilities: CapabilitySet,
    pub role_description: Option<String>,
    pub status: InvitationStatus,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub responded_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// What a user may do, and on whose behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectivePermissions {
    #[serde(rename = "is_organizer")]
    pub is_owner: bool,
    #[serde(rename = "is_manager")]
    pub is_delegate: bool,
    #[serde(rename = "organizer_id")]
    pub principal_id: Option<Uuid>,
    #[serde(rename = "permissions")]
    pub capabilities: CapabilitySet,
}

impl EffectivePermissions {
    pub fn none() -> Self {
        Self {
            is_owner: false,
            is_delegate: false,
            principal_id: None,
            capabilities: CapabilitySet::empty(),
        }
    }
}

// ── Venues ───────────────────────────────────────────────────────────────────

/// Amounts are integer paise throughout.
#[derive(Debug, Clone, Serialize)]
pub struct Venue {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub city: String,
    #[serde(with = "hhmm")]
    pub opening_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub closing_time: NaiveTime,
    pub price_per_hour_paise: i64,
    pub peak_hour_price_paise: Option<i64>,
    pub weekend_price_paise: Option<i64>,
    pub total_bookings: i64,
    pub is_active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Live bookings hold their slot.
    pub fn holds_slot(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub booking_number: String,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    pub sport_type: String,
    pub booking_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration_hours: i32,
    pub player_count: Option<i32>,
    pub team_name: Option<String>,
    pub contact_person: String,
    pub contact_number: String,
    pub special_requests: Option<String>,
    pub price_per_hour_paise: i64,
    pub total_amount_paise: i64,
    pub status: BookingStatus,
    pub payment_status: String,
    pub split_payment: Option<SplitPlan>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// One hourly slot as listed for a venue and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub price_paise: i64,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    pub name: Option<String>,
    pub phone: String,
    pub amount_paise: i64,
    pub payment_link: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub booking_id: Uuid,
    pub booking_number: String,
    pub total_amount_paise: i64,
    /// Equal share before any explicit per-participant amounts are applied.
    pub amount_per_person_paise: i64,
    /// What is left for the booker after every participant's share.
    pub booker_share_paise: i64,
    pub participants: Vec<SplitShare>,
    pub payment_link: String,
}

// ── Professionals ────────────────────────────────────────────────────────────

/// Wire format keeps the capitalized names (`"Umpire"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfessionalRole {
    Umpire,
    Player,
    Coach,
    Trainer,
}

impl ProfessionalRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Umpire => "Umpire",
            Self::Player => "Player",
            Self::Coach => "Coach",
            Self::Trainer => "Trainer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Umpire" => Some(Self::Umpire),
            "Player" => Some(Self::Player),
            "Coach" => Some(Self::Coach),
            "Trainer" => Some(Self::Trainer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfessionalAvailability {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub sport_type: String,
    pub per_match_fee_paise: i64,
    pub currency: String,
    pub can_play: bool,
    pub can_coach: bool,
    pub can_umpire: bool,
    pub is_active: bool,
    pub total_bookings: i64,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionalBookingStatus {
    Pending,
    Confirmed,
    Accepted,
    Cancelled,
}

impl ProfessionalBookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Accepted => "accepted",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "accepted" => Some(Self::Accepted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Statuses the umpire guard counts as holding the professional.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Confirmed | Self::Accepted)
    }
}

/// Which side of a professional booking a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingParty {
    Professional,
    Booker,
}

impl BookingParty {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "professional" => Some(Self::Professional),
            "booker" => Some(Self::Booker),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfessionalBooking {
    pub id: Uuid,
    pub booking_number: String,
    pub availability_id: Uuid,
    pub professional_id: Uuid,
    pub booked_by: Uuid,
    pub tournament_id: Option<Uuid>,
    pub role: ProfessionalRole,
    pub match_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub per_match_fee_paise: i64,
    pub currency: String,
    pub status: ProfessionalBookingStatus,
    pub payment_status: String,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl ProfessionalBooking {
    /// Whether this booking occupies the umpire slot for its tournament.
    pub fn holds_umpire_slot(&self) -> bool {
        self.role == ProfessionalRole::Umpire
            && self.tournament_id.is_some()
            && self.status.is_live()
    }
}

// ── Tournaments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sport_type: String,
    pub city: String,
    pub organizer_id: Uuid,
    pub created_by: Uuid,
    pub created_by_manager: bool,
    pub max_teams: i32,
    pub current_teams: i32,
    pub entry_fee_paise: i64,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub start_date: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub registration_deadline: DateTime<Utc>,
    pub status: String,
    pub is_active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub sport_type: String,
    pub city: String,
    pub captain_id: Uuid,
    pub is_active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: Uuid,
    pub registration_number: String,
    pub tournament_id: Uuid,
    pub team_id: Uuid,
    pub registered_by: Uuid,
    pub captain_name: String,
    pub captain_contact: String,
    pub entry_fee_paise: i64,
    pub payment_status: String,
    pub status: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}
