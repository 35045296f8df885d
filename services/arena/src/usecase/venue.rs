use chrono::{NaiveDate, NaiveTime, Utc};
use rand::RngExt;
use uuid::Uuid;

use courtside_domain::pagination::PageRequest;

use crate::domain::repository::VenueRepository;
use crate::domain::types::{
    Booking, BookingStatus, PAYMENT_PENDING, Slot, SplitPlan, SplitShare, User, Venue,
};
use crate::error::ArenaError;
use crate::usecase::pricing;

fn booking_number(date: NaiveDate) -> String {
    let suffix: u32 = rand::rng().random_range(1000..10000);
    format!("BK-{}-{suffix}", date.format("%Y%m%d"))
}

fn non_blank(value: &str, field: &str) -> Result<(), ArenaError> {
    if value.trim().is_empty() {
        Err(ArenaError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

// ── CreateVenue ──────────────────────────────────────────────────────────────

pub struct CreateVenueInput {
    pub name: String,
    pub city: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub price_per_hour_paise: i64,
    pub peak_hour_price_paise: Option<i64>,
    pub weekend_price_paise: Option<i64>,
}

pub struct CreateVenueUseCase<V: VenueRepository> {
    pub venues: V,
}

impl<V: VenueRepository> CreateVenueUseCase<V> {
    pub async fn execute(
        &self,
        owner: &User,
        input: CreateVenueInput,
    ) -> Result<Venue, ArenaError> {
        non_blank(&input.name, "name")?;
        non_blank(&input.city, "city")?;
        if input.closing_time <= input.opening_time {
            return Err(ArenaError::validation(
                "closing_time must be after opening_time",
            ));
        }
        let prices = [
            Some(input.price_per_hour_paise),
            input.peak_hour_price_paise,
            input.weekend_price_paise,
        ];
        if prices.into_iter().flatten().any(|p| p <= 0) {
            return Err(ArenaError::validation("prices must be positive"));
        }

        let venue = Venue {
            id: Uuid::now_v7(),
            owner_id: owner.id,
            name: input.name.trim().to_owned(),
            city: input.city.trim().to_owned(),
            opening_time: input.opening_time,
            closing_time: input.closing_time,
            price_per_hour_paise: input.price_per_hour_paise,
            peak_hour_price_paise: input.peak_hour_price_paise,
            weekend_price_paise: input.weekend_price_paise,
            total_bookings: 0,
            is_active: true,
            created_at: Utc::now(),
        };
        self.venues.create_venue(&venue).await?;
        tracing::info!(venue_id = %venue.id, owner_id = %owner.id, "venue created");
        Ok(venue)
    }
}

// ── ListSlots ────────────────────────────────────────────────────────────────

pub struct ListSlotsUseCase<V: VenueRepository> {
    pub venues: V,
}

impl<V: VenueRepository> ListSlotsUseCase<V> {
    pub async fn execute(&self, venue_id: Uuid, date: NaiveDate) -> Result<Vec<Slot>, ArenaError> {
        let venue = self
            .venues
            .find_venue(venue_id)
            .await?
            .filter(|v| v.is_active)
            .ok_or(ArenaError::VenueNotFound)?;
        let booked = self.venues.booked_start_times(venue_id, date).await?;
        Ok(pricing::list_slots(&venue, date, &booked))
    }
}

// ── ReserveVenueSlot ─────────────────────────────────────────────────────────

pub struct ReserveSlotInput {
    pub venue_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub sport_type: String,
    pub player_count: Option<i32>,
    pub team_name: Option<String>,
    pub contact_person: String,
    pub contact_number: String,
    pub special_requests: Option<String>,
}

pub struct ReserveVenueSlotUseCase<V: VenueRepository> {
    pub venues: V,
}

impl<V: VenueRepository> ReserveVenueSlotUseCase<V> {
    pub async fn execute(
        &self,
        booker: &User,
        input: ReserveSlotInput,
    ) -> Result<Booking, ArenaError> {
        non_blank(&input.sport_type, "sport_type")?;
        non_blank(&input.contact_person, "contact_person")?;
        non_blank(&input.contact_number, "contact_number")?;
        if input.player_count.is_some_and(|n| n <= 0) {
            return Err(ArenaError::validation("player_count must be positive"));
        }

        let venue = self
            .venues
            .find_venue(input.venue_id)
            .await?
            .filter(|v| v.is_active)
            .ok_or(ArenaError::VenueNotFound)?;

        let quote = pricing::quote(&venue, input.booking_date, input.start_time, input.end_time)?;

        // Fast path only; the store's live-slot index is what decides a race.
        let booked = self
            .venues
            .booked_start_times(venue.id, input.booking_date)
            .await?;
        if booked.contains(&input.start_time) {
            return Err(ArenaError::SlotTaken);
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::now_v7(),
            booking_number: booking_number(input.booking_date),
            venue_id: venue.id,
            user_id: booker.id,
            sport_type: input.sport_type,
            booking_date: input.booking_date,
            start_time: input.start_time,
            end_time: input.end_time,
            duration_hours: quote.duration_hours,
            player_count: input.player_count,
            team_name: input.team_name,
            contact_person: input.contact_person,
            contact_number: input.contact_number,
            special_requests: input.special_requests,
            price_per_hour_paise: quote.rate_paise,
            total_amount_paise: quote.total_paise,
            status: BookingStatus::Confirmed,
            payment_status: PAYMENT_PENDING.to_owned(),
            split_payment: None,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.venues.create_booking(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            venue_id = %venue.id,
            user_id = %booker.id,
            date = %booking.booking_date,
            start = %booking.start_time,
            total_paise = booking.total_amount_paise,
            "venue slot reserved"
        );
        Ok(booking)
    }
}

// ── CancelBooking ────────────────────────────────────────────────────────────

pub struct CancelBookingUseCase<V: VenueRepository> {
    pub venues: V,
}

impl<V: VenueRepository> CancelBookingUseCase<V> {
    pub async fn execute(
        &self,
        caller: &User,
        booking_id: Uuid,
        reason: Option<String>,
    ) -> Result<Booking, ArenaError> {
        let mut booking = self
            .venues
            .find_booking(booking_id)
            .await?
            .ok_or(ArenaError::BookingNotFound)?;
        if booking.user_id != caller.id {
            return Err(ArenaError::Forbidden("not authorized"));
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(ArenaError::BookingCancelled);
        }

        let now = Utc::now();
        if !self
            .venues
            .cancel_booking(booking_id, reason.as_deref(), now)
            .await?
        {
            return Err(ArenaError::BookingCancelled);
        }

        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(now);
        booking.cancellation_reason = reason;
        booking.updated_at = now;
        tracing::info!(booking_id = %booking_id, user_id = %caller.id, "booking cancelled");
        Ok(booking)
    }
}

// ── SplitPayment ─────────────────────────────────────────────────────────────

pub struct SplitParticipant {
    pub name: Option<String>,
    pub phone: String,
    /// Explicit share; `None` takes the equal share.
    pub amount_paise: Option<i64>,
}

/// Divide `booking`'s total between the booker and `participants`.
///
/// The equal share is `total / (participants + 1)`; explicit amounts override
/// it per participant and the booker covers whatever remains, rounding
/// included.
pub fn split_plan(
    booking: &Booking,
    participants: Vec<SplitParticipant>,
    link_base: &str,
) -> Result<SplitPlan, ArenaError> {
    if participants.is_empty() {
        return Err(ArenaError::validation("at least one participant is required"));
    }
    let link_base = link_base.trim_end_matches('/');
    let total = booking.total_amount_paise;
    let per_person = total / (participants.len() as i64 + 1);

    let mut shares = Vec::with_capacity(participants.len());
    for p in participants {
        let phone = p.phone.trim().to_owned();
        if phone.is_empty() {
            return Err(ArenaError::validation("participant phone is required"));
        }
        let amount_paise = p.amount_paise.unwrap_or(per_person);
        if !(0..=total).contains(&amount_paise) {
            return Err(ArenaError::validation(
                "participant amount must be between zero and the booking total",
            ));
        }
        shares.push(SplitShare {
            payment_link: format!("{link_base}/pay/{}/{phone}", booking.booking_number),
            name: p.name,
            phone,
            amount_paise,
            status: PAYMENT_PENDING.to_owned(),
        });
    }

    let booker_share_paise = shares
        .iter()
        .try_fold(0i64, |acc, s| acc.checked_add(s.amount_paise))
        .and_then(|committed| total.checked_sub(committed))
        .filter(|rest| *rest >= 0)
        .ok_or_else(|| ArenaError::validation("participant amounts exceed the booking total"))?;

    Ok(SplitPlan {
        booking_id: booking.id,
        booking_number: booking.booking_number.clone(),
        total_amount_paise: total,
        amount_per_person_paise: per_person,
        booker_share_paise,
        participants: shares,
        payment_link: format!("{link_base}/pay/{}", booking.booking_number),
    })
}

pub struct SplitPaymentUseCase<V: VenueRepository> {
    pub venues: V,
    pub payment_link_base: String,
}

impl<V: VenueRepository> SplitPaymentUseCase<V> {
    pub async fn execute(
        &self,
        caller: &User,
        booking_id: Uuid,
        participants: Vec<SplitParticipant>,
    ) -> Result<SplitPlan, ArenaError> {
        let booking = self
            .venues
            .find_booking(booking_id)
            .await?
            .ok_or(ArenaError::BookingNotFound)?;
        if booking.user_id != caller.id {
            return Err(ArenaError::Forbidden("only the booker can split a booking"));
        }
        if booking.status == BookingStatus::Cancelled {
            return Err(ArenaError::BookingCancelled);
        }

        let plan = split_plan(&booking, participants, &self.payment_link_base)?;
        self.venues.save_split(booking_id, &plan).await?;
        tracing::info!(
            booking_id = %booking_id,
            participants = plan.participants.len(),
            "split payment created"
        );
        Ok(plan)
    }
}

// ── ListMyBookings ───────────────────────────────────────────────────────────

pub struct ListMyBookingsUseCase<V: VenueRepository> {
    pub venues: V,
}

impl<V: VenueRepository> ListMyBookingsUseCase<V> {
    pub async fn execute(
        &self,
        caller: &User,
        page: PageRequest,
    ) -> Result<Vec<Booking>, ArenaError> {
        self.venues
            .list_bookings_by_user(caller.id, page.clamped())
            .await
    }
}
