#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use courtside_domain::pagination::PageRequest;

use crate::domain::types::{
    Booking, BookingParty, Invitation, ManagerGrant, OtpAttempt, OtpChallenge,
    ProfessionalAvailability, ProfessionalBooking, ProfessionalBookingStatus, Registration,
    SplitPlan, Team, Tournament, User, Venue,
};
use crate::error::ArenaError;

/// Keyed store for OTP challenges, one per phone, expiring on its own.
pub trait OtpStore: Send + Sync {
    /// Replace any challenge for `phone` (attempt counter included).
    async fn put(
        &self,
        phone: &str,
        challenge: &OtpChallenge,
        ttl_secs: u64,
    ) -> Result<(), ArenaError>;

    /// In one atomic step: drop an expired challenge, refuse once
    /// `max_attempts` are recorded, otherwise count this attempt and hand
    /// back the challenge to compare against.
    async fn reserve_attempt(
        &self,
        phone: &str,
        max_attempts: u32,
        now: i64,
    ) -> Result<OtpAttempt, ArenaError>;

    /// Delete the challenge only if it still carries `code_hash`.
    /// Returns `true` if this call consumed it.
    async fn consume(&self, phone: &str, code_hash: &str) -> Result<bool, ArenaError>;
}

pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ArenaError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ArenaError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ArenaError>;

    /// Insert a minimal user for `phone`, or mark the existing one verified.
    /// Single statement keyed on the phone unique index. Returns the row and
    /// whether it was created by this call.
    async fn upsert_verified(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<(User, bool), ArenaError>;
}

pub trait GrantRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<ManagerGrant>, ArenaError>;

    async fn find_active(
        &self,
        organizer_id: Uuid,
        manager_user_id: Uuid,
    ) -> Result<Option<ManagerGrant>, ArenaError>;

    /// Most recently created active grant held by `manager_user_id`, across organizers.
    async fn latest_active_for_manager(
        &self,
        manager_user_id: Uuid,
    ) -> Result<Option<ManagerGrant>, ArenaError>;

    async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
        include_inactive: bool,
        page: PageRequest,
    ) -> Result<Vec<ManagerGrant>, ArenaError>;

    /// Fails with `AlreadyManager` when an active grant exists for the pair.
    async fn create(&self, grant: &ManagerGrant) -> Result<(), ArenaError>;

    /// Insert the synthesized user and its grant in one transaction.
    /// Fails with `PhoneAlreadyRegistered` / `EmailAlreadyRegistered` on collisions.
    async fn create_with_user(
        &self,
        user: &User,
        grant: &ManagerGrant,
    ) -> Result<(), ArenaError>;

    /// Persist role description and capabilities.
    async fn update(&self, grant: &ManagerGrant) -> Result<(), ArenaError>;

    /// Soft-deactivate. Returns `false` if the grant was already inactive.
    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError>;
}

pub trait InvitationRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Invitation>, ArenaError>;

    /// Sweep the pair's stale pending invitations to `expired`, then insert,
    /// in one transaction. Fails with `InvitationPending` if a live one remains.
    async fn create(
        &self,
        invitation: &Invitation,
        now: DateTime<Utc>,
    ) -> Result<(), ArenaError>;

    /// Flip `pending` and unexpired to `accepted` and insert `grant`, atomically.
    /// Returns `false` (nothing written) if the invitation was no longer pending
    /// or had expired.
    async fn accept(
        &self,
        id: Uuid,
        grant: &ManagerGrant,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError>;

    /// Flip `pending` to `rejected`. Returns `false` if it was not pending.
    async fn reject(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError>;

    /// Invitations addressed to `user_id`, newest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Invitation>, ArenaError>;
}

pub trait VenueRepository: Send + Sync {
    async fn create_venue(&self, venue: &Venue) -> Result<(), ArenaError>;

    async fn find_venue(&self, id: Uuid) -> Result<Option<Venue>, ArenaError>;

    /// Start times of live bookings on `date`.
    async fn booked_start_times(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, ArenaError>;

    /// Insert the booking and bump the venue's booking counter in one
    /// transaction. Fails with `SlotTaken` if a live booking holds the slot.
    async fn create_booking(&self, booking: &Booking) -> Result<(), ArenaError>;

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ArenaError>;

    /// Conditional cancel. Returns `false` if the booking was already cancelled.
    async fn cancel_booking(
        &self,
        id: Uuid,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError>;

    async fn save_split(&self, id: Uuid, plan: &SplitPlan) -> Result<(), ArenaError>;

    /// The user's bookings, newest first.
    async fn list_bookings_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Booking>, ArenaError>;
}

pub trait ProfessionalRepository: Send + Sync {
    async fn create_availability(
        &self,
        availability: &ProfessionalAvailability,
    ) -> Result<(), ArenaError>;

    async fn find_availability(
        &self,
        id: Uuid,
    ) -> Result<Option<ProfessionalAvailability>, ArenaError>;

    /// Insert the booking and bump the availability's counter in one
    /// transaction. Fails with `AlreadyBooked` if the umpire guard trips.
    async fn create_booking(&self, booking: &ProfessionalBooking) -> Result<(), ArenaError>;

    async fn find_booking(&self, id: Uuid) -> Result<Option<ProfessionalBooking>, ArenaError>;

    /// Live booking of `availability_id` in `role` for `tournament_id`, if any.
    async fn find_live_booking(
        &self,
        tournament_id: Uuid,
        availability_id: Uuid,
        role: &str,
    ) -> Result<Option<ProfessionalBooking>, ArenaError>;

    /// Returns `false` if the booking was already cancelled.
    async fn cancel_booking(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError>;

    /// Move a non-cancelled booking to `status` (never `Cancelled`; see
    /// `cancel_booking`). Returns `false` if it was cancelled meanwhile.
    /// Going live while another live umpire booking holds the slot fails
    /// with `AlreadyBooked`.
    async fn update_booking_status(
        &self,
        id: Uuid,
        status: ProfessionalBookingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError>;

    /// Bookings where `user_id` is the given party, by match date then creation.
    async fn list_bookings(
        &self,
        user_id: Uuid,
        party: BookingParty,
        page: PageRequest,
    ) -> Result<Vec<ProfessionalBooking>, ArenaError>;
}

pub trait TournamentRepository: Send + Sync {
    async fn create(&self, tournament: &Tournament) -> Result<(), ArenaError>;

    async fn find(&self, id: Uuid) -> Result<Option<Tournament>, ArenaError>;

    /// Persist editable fields (name, description, status, max_teams, deadline).
    /// Returns `false`, writing nothing, if more teams than `max_teams` are
    /// registered by the time the write lands.
    async fn update(&self, tournament: &Tournament) -> Result<bool, ArenaError>;

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), ArenaError>;

    async fn create_team(&self, team: &Team) -> Result<(), ArenaError>;

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, ArenaError>;

    /// Claim a slot and insert the registration as one unit: the conditional
    /// `current_teams` increment fails with `TournamentFull`, a duplicate
    /// `(tournament, team)` with `AlreadyRegistered`; either rolls back both.
    async fn register(&self, registration: &Registration) -> Result<(), ArenaError>;

    /// Registrations for `tournament_id`, oldest first.
    async fn list_registrations(
        &self,
        tournament_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Registration>, ArenaError>;
}
