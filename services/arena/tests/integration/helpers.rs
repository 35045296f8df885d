use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use courtside_arena::domain::repository::{
    GrantRepository, InvitationRepository, OtpStore, ProfessionalRepository,
    TournamentRepository, UserRepository, VenueRepository,
};
use courtside_arena::domain::types::{
    Booking, BookingParty, BookingStatus, Invitation, InvitationStatus, ManagerGrant, OtpAttempt,
    OtpChallenge, ProfessionalAvailability, ProfessionalBooking, ProfessionalBookingStatus,
    Registration, SplitPlan, Team, Tournament, User, Venue,
};
use courtside_arena::error::ArenaError;
use courtside_arena::usecase::token::TokenIssuer;
use courtside_domain::pagination::PageRequest;
use courtside_domain::user::UserRole;
use courtside_testing::auth::TEST_JWT_SECRET;

pub const OTP_SECRET: &str = "courtside-test-otp-secret";

fn page<T: Clone>(rows: Vec<T>, page: PageRequest) -> Vec<T> {
    rows.into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

static NEXT_PHONE: AtomicU64 = AtomicU64::new(9_000_000_000);

/// A fresh, unused `+91` phone number.
pub fn next_phone() -> String {
    format!("+91{}", NEXT_PHONE.fetch_add(1, Ordering::Relaxed))
}

pub fn test_user(role: Option<UserRole>) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        phone: next_phone(),
        name: Some("Test User".to_owned()),
        email: None,
        role,
        is_verified: true,
        is_active: true,
        onboarding_completed: role.is_some(),
        latitude: None,
        longitude: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn organizer() -> User {
    test_user(Some(UserRole::Organizer))
}

pub fn player() -> User {
    test_user(Some(UserRole::Player))
}

pub fn token_issuer() -> TokenIssuer {
    TokenIssuer {
        secret: TEST_JWT_SECRET.to_owned(),
        ttl_secs: 3600,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

pub fn venue(owner: &User) -> Venue {
    Venue {
        id: Uuid::now_v7(),
        owner_id: owner.id,
        name: "Green Turf".to_owned(),
        city: "Pune".to_owned(),
        opening_time: hour(6),
        closing_time: hour(23),
        price_per_hour_paise: 100_000,
        peak_hour_price_paise: Some(150_000),
        weekend_price_paise: Some(200_000),
        total_bookings: 0,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn tournament(organizer: &User, max_teams: i32) -> Tournament {
    let now = Utc::now();
    Tournament {
        id: Uuid::now_v7(),
        name: "Monsoon Cup".to_owned(),
        description: None,
        sport_type: "football".to_owned(),
        city: "Pune".to_owned(),
        organizer_id: organizer.id,
        created_by: organizer.id,
        created_by_manager: false,
        max_teams,
        current_teams: 0,
        entry_fee_paise: 50_000,
        start_date: now + Duration::days(30),
        registration_deadline: now + Duration::days(20),
        status: "upcoming".to_owned(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn team(captain: &User) -> Team {
    Team {
        id: Uuid::now_v7(),
        name: format!("Team {}", &captain.phone[9..]),
        sport_type: "football".to_owned(),
        city: "Pune".to_owned(),
        captain_id: captain.id,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn availability(professional: &User) -> ProfessionalAvailability {
    let now = Utc::now();
    ProfessionalAvailability {
        id: Uuid::now_v7(),
        professional_id: professional.id,
        sport_type: "cricket".to_owned(),
        per_match_fee_paise: 250_000,
        currency: "INR".to_owned(),
        can_play: false,
        can_coach: false,
        can_umpire: true,
        is_active: true,
        total_bookings: 0,
        created_at: now,
        updated_at: now,
    }
}

// ── MockOtpStore ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOtpStore {
    pub challenges: Arc<Mutex<HashMap<String, OtpChallenge>>>,
}

impl MockOtpStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn challenge(&self, phone: &str) -> Option<OtpChallenge> {
        self.challenges.lock().unwrap().get(phone).cloned()
    }

    /// Move the stored challenge's expiry into the past.
    pub fn expire(&self, phone: &str) {
        if let Some(c) = self.challenges.lock().unwrap().get_mut(phone) {
            c.expires_at = Utc::now().timestamp() - 1;
        }
    }
}

impl OtpStore for MockOtpStore {
    async fn put(
        &self,
        phone: &str,
        challenge: &OtpChallenge,
        _ttl_secs: u64,
    ) -> Result<(), ArenaError> {
        self.challenges
            .lock()
            .unwrap()
            .insert(phone.to_owned(), challenge.clone());
        Ok(())
    }

    async fn reserve_attempt(
        &self,
        phone: &str,
        max_attempts: u32,
        now: i64,
    ) -> Result<OtpAttempt, ArenaError> {
        let mut map = self.challenges.lock().unwrap();
        let Some(c) = map.get_mut(phone) else {
            return Ok(OtpAttempt::Missing);
        };
        if c.is_expired(now) {
            map.remove(phone);
            return Ok(OtpAttempt::Expired);
        }
        if c.failed_attempts >= max_attempts {
            return Ok(OtpAttempt::RateLimited);
        }
        c.failed_attempts += 1;
        Ok(OtpAttempt::Reserved(c.clone()))
    }

    async fn consume(&self, phone: &str, code_hash: &str) -> Result<bool, ArenaError> {
        let mut map = self.challenges.lock().unwrap();
        if map.get(phone).is_some_and(|c| c.code_hash == code_hash) {
            map.remove(phone);
            return Ok(true);
        }
        Ok(false)
    }
}

// ── MockDb ───────────────────────────────────────────────────────────────────

/// In-memory tables shared by every mock repository handed out from one
/// `MockDb`, so use cases see each other's writes. Each mutation runs under a
/// single lock, mirroring the database's unique indexes and conditional
/// updates.
#[derive(Clone, Default)]
pub struct MockDb {
    pub users: Arc<Mutex<Vec<User>>>,
    pub grants: Arc<Mutex<Vec<ManagerGrant>>>,
    pub invitations: Arc<Mutex<Vec<Invitation>>>,
    pub venues: Arc<Mutex<Vec<Venue>>>,
    pub bookings: Arc<Mutex<Vec<Booking>>>,
    pub availabilities: Arc<Mutex<Vec<ProfessionalAvailability>>>,
    pub professional_bookings: Arc<Mutex<Vec<ProfessionalBooking>>>,
    pub tournaments: Arc<Mutex<Vec<Tournament>>>,
    pub teams: Arc<Mutex<Vec<Team>>>,
    pub registrations: Arc<Mutex<Vec<Registration>>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: &[User]) -> Self {
        let db = Self::default();
        db.users.lock().unwrap().extend(users.iter().cloned());
        db
    }

    pub fn add_user(&self, user: &User) {
        self.users.lock().unwrap().push(user.clone());
    }

    pub fn add_venue(&self, venue: &Venue) {
        self.venues.lock().unwrap().push(venue.clone());
    }

    pub fn add_tournament(&self, tournament: &Tournament) {
        self.tournaments.lock().unwrap().push(tournament.clone());
    }

    pub fn add_team(&self, team: &Team) {
        self.teams.lock().unwrap().push(team.clone());
    }

    pub fn add_availability(&self, availability: &ProfessionalAvailability) {
        self.availabilities
            .lock()
            .unwrap()
            .push(availability.clone());
    }

    pub fn tournament(&self, id: Uuid) -> Tournament {
        self.tournaments
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .unwrap()
    }

    pub fn venue(&self, id: Uuid) -> Venue {
        self.venues
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .unwrap()
    }

    pub fn users_repo(&self) -> MockUserRepo {
        MockUserRepo { db: self.clone() }
    }

    pub fn grants_repo(&self) -> MockGrantRepo {
        MockGrantRepo { db: self.clone() }
    }

    pub fn invitations_repo(&self) -> MockInvitationRepo {
        MockInvitationRepo { db: self.clone() }
    }

    pub fn venues_repo(&self) -> MockVenueRepo {
        MockVenueRepo { db: self.clone() }
    }

    pub fn professionals_repo(&self) -> MockProfessionalRepo {
        MockProfessionalRepo { db: self.clone() }
    }

    pub fn tournaments_repo(&self) -> MockTournamentRepo {
        MockTournamentRepo { db: self.clone() }
    }
}

fn active_pair(grant: &ManagerGrant, organizer_id: Uuid, manager_user_id: Uuid) -> bool {
    grant.is_active
        && grant.organizer_id == organizer_id
        && grant.manager_user_id == Some(manager_user_id)
}

/// Push `grant` unless the pair already holds an active grant.
fn insert_grant(grants: &mut Vec<ManagerGrant>, grant: &ManagerGrant) -> Result<(), ArenaError> {
    if let Some(manager) = grant.manager_user_id
        && grants
            .iter()
            .any(|g| active_pair(g, grant.organizer_id, manager))
    {
        return Err(ArenaError::AlreadyManager);
    }
    grants.push(grant.clone());
    Ok(())
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub db: MockDb,
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ArenaError> {
        Ok(self.db.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ArenaError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ArenaError> {
        Ok(self
            .db
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn upsert_verified(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<(User, bool), ArenaError> {
        let mut users = self.db.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.phone == phone) {
            user.is_verified = true;
            user.updated_at = now;
            return Ok((user.clone(), false));
        }
        let user = User {
            id: Uuid::now_v7(),
            phone: phone.to_owned(),
            name: None,
            email: None,
            role: None,
            is_verified: true,
            is_active: true,
            onboarding_completed: false,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok((user, true))
    }
}

// ── MockGrantRepo ────────────────────────────────────────────────────────────

pub struct MockGrantRepo {
    pub db: MockDb,
}

impl GrantRepository for MockGrantRepo {
    async fn find(&self, id: Uuid) -> Result<Option<ManagerGrant>, ArenaError> {
        Ok(self.db.grants.lock().unwrap().iter().find(|g| g.id == id).cloned())
    }

    async fn find_active(
        &self,
        organizer_id: Uuid,
        manager_user_id: Uuid,
    ) -> Result<Option<ManagerGrant>, ArenaError> {
        Ok(self
            .db
            .grants
            .lock()
            .unwrap()
            .iter()
            .find(|g| active_pair(g, organizer_id, manager_user_id))
            .cloned())
    }

    async fn latest_active_for_manager(
        &self,
        manager_user_id: Uuid,
    ) -> Result<Option<ManagerGrant>, ArenaError> {
        Ok(self
            .db
            .grants
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.is_active && g.manager_user_id == Some(manager_user_id))
            .max_by_key(|g| g.created_at)
            .cloned())
    }

    async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
        include_inactive: bool,
        page_req: PageRequest,
    ) -> Result<Vec<ManagerGrant>, ArenaError> {
        let mut rows: Vec<_> = self
            .db
            .grants
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.organizer_id == organizer_id && (include_inactive || g.is_active))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, page_req))
    }

    async fn create(&self, grant: &ManagerGrant) -> Result<(), ArenaError> {
        insert_grant(&mut self.db.grants.lock().unwrap(), grant)
    }

    async fn create_with_user(
        &self,
        user: &User,
        grant: &ManagerGrant,
    ) -> Result<(), ArenaError> {
        let mut users = self.db.users.lock().unwrap();
        if users.iter().any(|u| u.phone == user.phone) {
            return Err(ArenaError::PhoneAlreadyRegistered);
        }
        if user.email.is_some() && users.iter().any(|u| u.email == user.email) {
            return Err(ArenaError::EmailAlreadyRegistered);
        }
        insert_grant(&mut self.db.grants.lock().unwrap(), grant)?;
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, grant: &ManagerGrant) -> Result<(), ArenaError> {
        let mut grants = self.db.grants.lock().unwrap();
        if let Some(g) = grants.iter_mut().find(|g| g.id == grant.id) {
            g.role_description = grant.role_description.clone();
            g.capabilities = grant.capabilities.clone();
            g.updated_at = grant.updated_at;
        }
        Ok(())
    }

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError> {
        let mut grants = self.db.grants.lock().unwrap();
        match grants.iter_mut().find(|g| g.id == id && g.is_active) {
            Some(g) => {
                g.is_active = false;
                g.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockInvitationRepo ───────────────────────────────────────────────────────

pub struct MockInvitationRepo {
    pub db: MockDb,
}

impl MockInvitationRepo {
    fn with_invitation<T>(&self, id: Uuid, f: impl FnOnce(&mut Invitation) -> T) -> Option<T> {
        self.db
            .invitations
            .lock()
            .unwrap()
            .iter_mut()
            .find(|i| i.id == id)
            .map(f)
    }
}

impl InvitationRepository for MockInvitationRepo {
    async fn find(&self, id: Uuid) -> Result<Option<Invitation>, ArenaError> {
        Ok(self.with_invitation(id, |i| i.clone()))
    }

    async fn create(&self, invitation: &Invitation, now: DateTime<Utc>) -> Result<(), ArenaError> {
        let mut invitations = self.db.invitations.lock().unwrap();
        let same_pair = |i: &Invitation| {
            i.organizer_id == invitation.organizer_id
                && i.user_id == invitation.user_id
                && i.status == InvitationStatus::Pending
        };
        for stale in invitations
            .iter_mut()
            .filter(|i| same_pair(i) && i.expires_at <= now)
        {
            stale.status = InvitationStatus::Expired;
        }
        if invitations.iter().any(same_pair) {
            return Err(ArenaError::InvitationPending);
        }
        invitations.push(invitation.clone());
        Ok(())
    }

    async fn accept(
        &self,
        id: Uuid,
        grant: &ManagerGrant,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError> {
        let mut invitations = self.db.invitations.lock().unwrap();
        let Some(invitation) = invitations
            .iter_mut()
            .find(|i| i.id == id && i.status == InvitationStatus::Pending && i.expires_at > now)
        else {
            return Ok(false);
        };
        insert_grant(&mut self.db.grants.lock().unwrap(), grant)?;
        invitation.status = InvitationStatus::Accepted;
        invitation.responded_at = Some(now);
        Ok(true)
    }

    async fn reject(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError> {
        Ok(self
            .with_invitation(id, |i| {
                if i.status != InvitationStatus::Pending {
                    return false;
                }
                i.status = InvitationStatus::Rejected;
                i.responded_at = Some(now);
                true
            })
            .unwrap_or(false))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page_req: PageRequest,
    ) -> Result<Vec<Invitation>, ArenaError> {
        let mut rows: Vec<_> = self
            .db
            .invitations
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, page_req))
    }
}

// ── MockVenueRepo ────────────────────────────────────────────────────────────

pub struct MockVenueRepo {
    pub db: MockDb,
}

impl VenueRepository for MockVenueRepo {
    async fn create_venue(&self, venue: &Venue) -> Result<(), ArenaError> {
        self.db.add_venue(venue);
        Ok(())
    }

    async fn find_venue(&self, id: Uuid) -> Result<Option<Venue>, ArenaError> {
        Ok(self.db.venues.lock().unwrap().iter().find(|v| v.id == id).cloned())
    }

    async fn booked_start_times(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, ArenaError> {
        Ok(self
            .db
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.venue_id == venue_id && b.booking_date == date && b.status.holds_slot())
            .map(|b| b.start_time)
            .collect())
    }

    async fn create_booking(&self, booking: &Booking) -> Result<(), ArenaError> {
        let mut bookings = self.db.bookings.lock().unwrap();
        if bookings.iter().any(|b| {
            b.venue_id == booking.venue_id
                && b.booking_date == booking.booking_date
                && b.start_time == booking.start_time
                && b.status.holds_slot()
        }) {
            return Err(ArenaError::SlotTaken);
        }
        bookings.push(booking.clone());
        if let Some(v) = self
            .db
            .venues
            .lock()
            .unwrap()
            .iter_mut()
            .find(|v| v.id == booking.venue_id)
        {
            v.total_bookings += 1;
        }
        Ok(())
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ArenaError> {
        Ok(self
            .db
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn cancel_booking(
        &self,
        id: Uuid,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError> {
        let mut bookings = self.db.bookings.lock().unwrap();
        match bookings
            .iter_mut()
            .find(|b| b.id == id && b.status != BookingStatus::Cancelled)
        {
            Some(b) => {
                b.status = BookingStatus::Cancelled;
                b.cancelled_at = Some(now);
                b.cancellation_reason = reason.map(str::to_owned);
                b.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn save_split(&self, id: Uuid, plan: &SplitPlan) -> Result<(), ArenaError> {
        if let Some(b) = self
            .db
            .bookings
            .lock()
            .unwrap()
            .iter_mut()
            .find(|b| b.id == id)
        {
            b.split_payment = Some(plan.clone());
        }
        Ok(())
    }

    async fn list_bookings_by_user(
        &self,
        user_id: Uuid,
        page_req: PageRequest,
    ) -> Result<Vec<Booking>, ArenaError> {
        let mut rows: Vec<_> = self
            .db
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, page_req))
    }
}

// ── MockProfessionalRepo ─────────────────────────────────────────────────────

pub struct MockProfessionalRepo {
    pub db: MockDb,
}

impl ProfessionalRepository for MockProfessionalRepo {
    async fn create_availability(
        &self,
        availability: &ProfessionalAvailability,
    ) -> Result<(), ArenaError> {
        self.db.add_availability(availability);
        Ok(())
    }

    async fn find_availability(
        &self,
        id: Uuid,
    ) -> Result<Option<ProfessionalAvailability>, ArenaError> {
        Ok(self
            .db
            .availabilities
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn create_booking(&self, booking: &ProfessionalBooking) -> Result<(), ArenaError> {
        let mut bookings = self.db.professional_bookings.lock().unwrap();
        if booking.holds_umpire_slot()
            && bookings.iter().any(|b| {
                b.holds_umpire_slot()
                    && b.tournament_id == booking.tournament_id
                    && b.availability_id == booking.availability_id
            })
        {
            return Err(ArenaError::AlreadyBooked);
        }
        bookings.push(booking.clone());
        if let Some(a) = self
            .db
            .availabilities
            .lock()
            .unwrap()
            .iter_mut()
            .find(|a| a.id == booking.availability_id)
        {
            a.total_bookings += 1;
        }
        Ok(())
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<ProfessionalBooking>, ArenaError> {
        Ok(self
            .db
            .professional_bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn find_live_booking(
        &self,
        tournament_id: Uuid,
        availability_id: Uuid,
        role: &str,
    ) -> Result<Option<ProfessionalBooking>, ArenaError> {
        Ok(self
            .db
            .professional_bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| {
                b.tournament_id == Some(tournament_id)
                    && b.availability_id == availability_id
                    && b.role.as_str() == role
                    && b.status.is_live()
            })
            .cloned())
    }

    async fn cancel_booking(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError> {
        let mut bookings = self.db.professional_bookings.lock().unwrap();
        match bookings
            .iter_mut()
            .find(|b| b.id == id && b.status != ProfessionalBookingStatus::Cancelled)
        {
            Some(b) => {
                b.status = ProfessionalBookingStatus::Cancelled;
                b.cancelled_at = Some(now);
                b.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: ProfessionalBookingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError> {
        let mut bookings = self.db.professional_bookings.lock().unwrap();
        let Some(index) = bookings
            .iter()
            .position(|b| b.id == id && b.status != ProfessionalBookingStatus::Cancelled)
        else {
            return Ok(false);
        };
        let mut updated = bookings[index].clone();
        updated.status = status;
        if updated.holds_umpire_slot()
            && bookings.iter().any(|b| {
                b.id != id
                    && b.holds_umpire_slot()
                    && b.tournament_id == updated.tournament_id
                    && b.availability_id == updated.availability_id
            })
        {
            return Err(ArenaError::AlreadyBooked);
        }
        updated.updated_at = now;
        bookings[index] = updated;
        Ok(true)
    }

    async fn list_bookings(
        &self,
        user_id: Uuid,
        party: BookingParty,
        page_req: PageRequest,
    ) -> Result<Vec<ProfessionalBooking>, ArenaError> {
        let mut rows: Vec<ProfessionalBooking> = self
            .db
            .professional_bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| match party {
                BookingParty::Professional => b.professional_id == user_id,
                BookingParty::Booker => b.booked_by == user_id,
            })
            .cloned()
            .collect();
        // Undated bookings last, as Postgres sorts NULLs in ascending order.
        rows.sort_by_key(|b| (b.match_date.is_none(), b.match_date, b.created_at));
        Ok(page(rows, page_req))
    }
}

// ── MockTournamentRepo ───────────────────────────────────────────────────────

pub struct MockTournamentRepo {
    pub db: MockDb,
}

impl TournamentRepository for MockTournamentRepo {
    async fn create(&self, tournament: &Tournament) -> Result<(), ArenaError> {
        self.db.add_tournament(tournament);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Tournament>, ArenaError> {
        Ok(self
            .db
            .tournaments
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn update(&self, tournament: &Tournament) -> Result<bool, ArenaError> {
        let mut tournaments = self.db.tournaments.lock().unwrap();
        let Some(t) = tournaments
            .iter_mut()
            .find(|t| t.id == tournament.id && t.current_teams <= tournament.max_teams)
        else {
            return Ok(false);
        };
        t.name = tournament.name.clone();
        t.description = tournament.description.clone();
        t.status = tournament.status.clone();
        t.max_teams = tournament.max_teams;
        t.registration_deadline = tournament.registration_deadline;
        t.updated_at = tournament.updated_at;
        Ok(true)
    }

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), ArenaError> {
        let mut tournaments = self.db.tournaments.lock().unwrap();
        if let Some(t) = tournaments.iter_mut().find(|t| t.id == id) {
            t.is_active = false;
            t.updated_at = now;
        }
        Ok(())
    }

    async fn create_team(&self, team: &Team) -> Result<(), ArenaError> {
        self.db.add_team(team);
        Ok(())
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, ArenaError> {
        Ok(self.db.teams.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn register(&self, registration: &Registration) -> Result<(), ArenaError> {
        let mut tournaments = self.db.tournaments.lock().unwrap();
        let mut registrations = self.db.registrations.lock().unwrap();
        let tournament = tournaments
            .iter_mut()
            .find(|t| t.id == registration.tournament_id)
            .ok_or(ArenaError::TournamentNotFound)?;
        if tournament.current_teams >= tournament.max_teams {
            return Err(ArenaError::TournamentFull);
        }
        if registrations.iter().any(|r| {
            r.tournament_id == registration.tournament_id && r.team_id == registration.team_id
        }) {
            return Err(ArenaError::AlreadyRegistered);
        }
        tournament.current_teams += 1;
        registrations.push(registration.clone());
        Ok(())
    }

    async fn list_registrations(
        &self,
        tournament_id: Uuid,
        page_req: PageRequest,
    ) -> Result<Vec<Registration>, ArenaError> {
        let mut rows: Vec<_> = self
            .db
            .registrations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.tournament_id == tournament_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(page(rows, page_req))
    }
}

// ── Yielding ─────────────────────────────────────────────────────────────────

/// Wraps a store and hands control back to the scheduler before every call,
/// so requests driven together by `join_all` interleave between their reads
/// and writes instead of running one after another.
#[derive(Clone)]
pub struct Yielding<R>(pub R);

impl<S: OtpStore> OtpStore for Yielding<S> {
    async fn put(
        &self,
        phone: &str,
        challenge: &OtpChallenge,
        ttl_secs: u64,
    ) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.put(phone, challenge, ttl_secs).await
    }

    async fn reserve_attempt(
        &self,
        phone: &str,
        max_attempts: u32,
        now: i64,
    ) -> Result<OtpAttempt, ArenaError> {
        tokio::task::yield_now().await;
        self.0.reserve_attempt(phone, max_attempts, now).await
    }

    async fn consume(&self, phone: &str, code_hash: &str) -> Result<bool, ArenaError> {
        tokio::task::yield_now().await;
        self.0.consume(phone, code_hash).await
    }
}

impl<V: VenueRepository> VenueRepository for Yielding<V> {
    async fn create_venue(&self, venue: &Venue) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.create_venue(venue).await
    }

    async fn find_venue(&self, id: Uuid) -> Result<Option<Venue>, ArenaError> {
        tokio::task::yield_now().await;
        self.0.find_venue(id).await
    }

    async fn booked_start_times(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, ArenaError> {
        tokio::task::yield_now().await;
        self.0.booked_start_times(venue_id, date).await
    }

    async fn create_booking(&self, booking: &Booking) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.create_booking(booking).await
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ArenaError> {
        tokio::task::yield_now().await;
        self.0.find_booking(id).await
    }

    async fn cancel_booking(
        &self,
        id: Uuid,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError> {
        tokio::task::yield_now().await;
        self.0.cancel_booking(id, reason, now).await
    }

    async fn save_split(&self, id: Uuid, plan: &SplitPlan) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.save_split(id, plan).await
    }

    async fn list_bookings_by_user(
        &self,
        user_id: Uuid,
        page_req: PageRequest,
    ) -> Result<Vec<Booking>, ArenaError> {
        tokio::task::yield_now().await;
        self.0.list_bookings_by_user(user_id, page_req).await
    }
}

impl<T: TournamentRepository> TournamentRepository for Yielding<T> {
    async fn create(&self, tournament: &Tournament) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.create(tournament).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<Tournament>, ArenaError> {
        tokio::task::yield_now().await;
        self.0.find(id).await
    }

    async fn update(&self, tournament: &Tournament) -> Result<bool, ArenaError> {
        tokio::task::yield_now().await;
        self.0.update(tournament).await
    }

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.deactivate(id, now).await
    }

    async fn create_team(&self, team: &Team) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.create_team(team).await
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, ArenaError> {
        tokio::task::yield_now().await;
        self.0.find_team(id).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), ArenaError> {
        tokio::task::yield_now().await;
        self.0.register(registration).await
    }

    async fn list_registrations(
        &self,
        tournament_id: Uuid,
        page_req: PageRequest,
    ) -> Result<Vec<Registration>, ArenaError> {
        tokio::task::yield_now().await;
        self.0.list_registrations(tournament_id, page_req).await
    }
}
