use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use courtside_domain::pagination::PageRequest;

use crate::domain::repository::ProfessionalRepository;
use crate::domain::types::{
    BookingParty, DEFAULT_CURRENCY, PAYMENT_PENDING, ProfessionalAvailability,
    ProfessionalBooking, ProfessionalBookingStatus, ProfessionalRole, User,
};
use crate::error::ArenaError;

/// The professional and the booker are the only parties to a booking.
fn load_as_party(
    booking: Option<ProfessionalBooking>,
    caller: &User,
) -> Result<ProfessionalBooking, ArenaError> {
    let booking = booking.ok_or(ArenaError::BookingNotFound)?;
    if booking.professional_id != caller.id && booking.booked_by != caller.id {
        return Err(ArenaError::Forbidden("not authorized"));
    }
    Ok(booking)
}

/// `PROF-` and eight upper-case hex digits.
fn booking_number() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("PROF-{}", hex[..8].to_uppercase())
}

// ── CreateAvailability ───────────────────────────────────────────────────────

pub struct CreateAvailabilityInput {
    pub sport_type: String,
    pub per_match_fee_paise: i64,
    pub currency: Option<String>,
    pub can_play: bool,
    pub can_coach: bool,
    pub can_umpire: bool,
}

pub struct CreateAvailabilityUseCase<P: ProfessionalRepository> {
    pub professionals: P,
}

impl<P: ProfessionalRepository> CreateAvailabilityUseCase<P> {
    pub async fn execute(
        &self,
        caller: &User,
        input: CreateAvailabilityInput,
    ) -> Result<ProfessionalAvailability, ArenaError> {
        if !caller.role.is_some_and(|r| r.can_offer_services()) {
            return Err(ArenaError::Forbidden(
                "only professionals and players can create availability",
            ));
        }
        if input.sport_type.trim().is_empty() {
            return Err(ArenaError::validation("sport_type is required"));
        }
        if input.per_match_fee_paise < 0 {
            return Err(ArenaError::validation("per_match_fee cannot be negative"));
        }

        let now = Utc::now();
        let availability = ProfessionalAvailability {
            id: Uuid::now_v7(),
            professional_id: caller.id,
            sport_type: input.sport_type.trim().to_owned(),
            per_match_fee_paise: input.per_match_fee_paise,
            currency: input
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            can_play: input.can_play,
            can_coach: input.can_coach,
            can_umpire: input.can_umpire,
            is_active: true,
            total_bookings: 0,
            created_at: now,
            updated_at: now,
        };
        self.professionals.create_availability(&availability).await?;
        tracing::info!(
            availability_id = %availability.id,
            professional_id = %caller.id,
            "availability created"
        );
        Ok(availability)
    }
}

// ── BookProfessional ─────────────────────────────────────────────────────────

pub struct BookProfessionalInput {
    pub availability_id: Uuid,
    pub tournament_id: Option<Uuid>,
    pub role: ProfessionalRole,
    pub match_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub struct BookProfessionalUseCase<P: ProfessionalRepository> {
    pub professionals: P,
}

impl<P: ProfessionalRepository> BookProfessionalUseCase<P> {
    pub async fn execute(
        &self,
        booker: &User,
        input: BookProfessionalInput,
    ) -> Result<ProfessionalBooking, ArenaError> {
        let availability = self
            .professionals
            .find_availability(input.availability_id)
            .await?
            .ok_or(ArenaError::ProfessionalNotFound)?;
        if !availability.is_active {
            return Err(ArenaError::ProfessionalUnavailable);
        }

        // Only umpires are exclusive per tournament. The store index backs this up.
        if input.role == ProfessionalRole::Umpire
            && let Some(tournament_id) = input.tournament_id
            && let Some(existing) = self
                .professionals
                .find_live_booking(tournament_id, availability.id, input.role.as_str())
                .await?
        {
            tracing::info!(
                tournament_id = %tournament_id,
                availability_id = %availability.id,
                booking_number = %existing.booking_number,
                "umpire already booked"
            );
            return Err(ArenaError::AlreadyBooked);
        }

        let now = Utc::now();
        let booking = ProfessionalBooking {
            id: Uuid::now_v7(),
            booking_number: booking_number(),
            availability_id: availability.id,
            professional_id: availability.professional_id,
            booked_by: booker.id,
            tournament_id: input.tournament_id,
            role: input.role,
            match_date: input.match_date,
            notes: input.notes,
            per_match_fee_paise: availability.per_match_fee_paise,
            currency: availability.currency,
            status: ProfessionalBookingStatus::Confirmed,
            payment_status: PAYMENT_PENDING.to_owned(),
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        };
        self.professionals.create_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            availability_id = %booking.availability_id,
            booked_by = %booker.id,
            role = booking.role.as_str(),
            "professional booked"
        );
        Ok(booking)
    }
}

// ── CheckDuplicate ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DuplicateCheck {
    pub is_booked: bool,
    pub booking_number: Option<String>,
    pub message: Option<String>,
}

pub struct CheckDuplicateUseCase<P: ProfessionalRepository> {
    pub professionals: P,
}

impl<P: ProfessionalRepository> CheckDuplicateUseCase<P> {
    pub async fn execute(
        &self,
        tournament_id: Uuid,
        availability_id: Uuid,
        role: ProfessionalRole,
    ) -> Result<DuplicateCheck, ArenaError> {
        let existing = self
            .professionals
            .find_live_booking(tournament_id, availability_id, role.as_str())
            .await?;
        Ok(match existing {
            Some(booking) => DuplicateCheck {
                is_booked: true,
                booking_number: Some(booking.booking_number),
                message: Some(format!(
                    "This {} is already booked for this tournament",
                    role.as_str().to_lowercase()
                )),
            },
            None => DuplicateCheck {
                is_booked: false,
                booking_number: None,
                message: None,
            },
        })
    }
}

// ── CancelProfessionalBooking ────────────────────────────────────────────────

pub struct CancelProfessionalBookingUseCase<P: ProfessionalRepository> {
    pub professionals: P,
}

impl<P: ProfessionalRepository> CancelProfessionalBookingUseCase<P> {
    pub async fn execute(&self, caller: &User, booking_id: Uuid) -> Result<(), ArenaError> {
        let booking = load_as_party(self.professionals.find_booking(booking_id).await?, caller)?;
        if booking.status == ProfessionalBookingStatus::Cancelled
            || !self.professionals.cancel_booking(booking_id, Utc::now()).await?
        {
            return Err(ArenaError::BookingCancelled);
        }
        tracing::info!(
            booking_id = %booking_id,
            user_id = %caller.id,
            "professional booking cancelled"
        );
        Ok(())
    }
}

// ── UpdateProfessionalBookingStatus ──────────────────────────────────────────

pub struct UpdateProfessionalBookingStatusUseCase<P: ProfessionalRepository> {
    pub professionals: P,
}

impl<P: ProfessionalRepository> UpdateProfessionalBookingStatusUseCase<P> {
    pub async fn execute(
        &self,
        caller: &User,
        booking_id: Uuid,
        status: ProfessionalBookingStatus,
    ) -> Result<ProfessionalBooking, ArenaError> {
        let mut booking =
            load_as_party(self.professionals.find_booking(booking_id).await?, caller)?;
        if booking.status == ProfessionalBookingStatus::Cancelled {
            return Err(ArenaError::BookingCancelled);
        }

        let now = Utc::now();
        let applied = if status == ProfessionalBookingStatus::Cancelled {
            self.professionals.cancel_booking(booking_id, now).await?
        } else {
            self.professionals
                .update_booking_status(booking_id, status, now)
                .await?
        };
        if !applied {
            return Err(ArenaError::BookingCancelled);
        }

        tracing::info!(
            booking_id = %booking_id,
            user_id = %caller.id,
            from = booking.status.as_str(),
            to = status.as_str(),
            "professional booking status changed"
        );
        booking.status = status;
        booking.updated_at = now;
        if status == ProfessionalBookingStatus::Cancelled {
            booking.cancelled_at = Some(now);
        }
        Ok(booking)
    }
}

// ── ListProfessionalBookings ─────────────────────────────────────────────────

pub struct ListProfessionalBookingsUseCase<P: ProfessionalRepository> {
    pub professionals: P,
}

impl<P: ProfessionalRepository> ListProfessionalBookingsUseCase<P> {
    pub async fn execute(
        &self,
        caller: &User,
        party: BookingParty,
        page: PageRequest,
    ) -> Result<Vec<ProfessionalBooking>, ArenaError> {
        self.professionals
            .list_bookings(caller.id, party, page)
            .await
    }
}
