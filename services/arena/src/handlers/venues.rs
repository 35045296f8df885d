use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtside_core::serde::hhmm;
use courtside_domain::pagination::PageRequest;

use crate::domain::types::{Booking, Slot, SplitPlan};
use crate::error::ArenaError;
use crate::handlers::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::venue::{
    CancelBookingUseCase, CreateVenueInput, CreateVenueUseCase, ListMyBookingsUseCase,
    ListSlotsUseCase, ReserveSlotInput, ReserveVenueSlotUseCase, SplitParticipant,
    SplitPaymentUseCase,
};

// ── POST /venues ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub city: String,
    #[serde(with = "hhmm")]
    pub opening_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub closing_time: NaiveTime,
    pub price_per_hour_paise: i64,
    pub peak_hour_price_paise: Option<i64>,
    pub weekend_price_paise: Option<i64>,
}

pub async fn create_venue(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Json(body): Json<CreateVenueRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = CreateVenueUseCase {
        venues: state.venue_repo(),
    };
    let venue = usecase
        .execute(
            &owner,
            CreateVenueInput {
                name: body.name,
                city: body.city,
                opening_time: body.opening_time,
                closing_time: body.closing_time,
                price_per_hour_paise: body.price_per_hour_paise,
                peak_hour_price_paise: body.peak_hour_price_paise,
                weekend_price_paise: body.weekend_price_paise,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

// ── GET /venues/{id}/slots ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

pub async fn list_slots(
    State(state): State<AppState>,
    Path(venue_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, ArenaError> {
    let usecase = ListSlotsUseCase {
        venues: state.venue_repo(),
    };
    let slots = usecase.execute(venue_id, query.date).await?;
    Ok(Json(SlotsResponse {
        venue_id,
        date: query.date,
        slots,
    }))
}

// ── POST /venues/bookings ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReserveSlotRequest {
    pub venue_id: Uuid,
    pub booking_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub sport_type: String,
    pub player_count: Option<i32>,
    pub team_name: Option<String>,
    pub contact_person: String,
    pub contact_number: String,
    pub special_requests: Option<String>,
}

pub async fn reserve_slot(
    State(state): State<AppState>,
    CurrentUser(booker): CurrentUser,
    Json(body): Json<ReserveSlotRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = ReserveVenueSlotUseCase {
        venues: state.venue_repo(),
    };
    let booking = usecase
        .execute(
            &booker,
            ReserveSlotInput {
                venue_id: body.venue_id,
                booking_date: body.booking_date,
                start_time: body.start_time,
                end_time: body.end_time,
                sport_type: body.sport_type,
                player_count: body.player_count,
                team_name: body.team_name,
                contact_person: body.contact_person,
                contact_number: body.contact_number,
                special_requests: body.special_requests,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// ── GET /venues/bookings/mine ────────────────────────────────────────────────

pub async fn my_bookings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<Booking>>, ArenaError> {
    let usecase = ListMyBookingsUseCase {
        venues: state.venue_repo(),
    };
    Ok(Json(usecase.execute(&user, page).await?))
}

// ── POST /venues/bookings/{id}/cancel ────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<CancelBookingRequest>>,
) -> Result<Json<Booking>, ArenaError> {
    let Json(body) = body.unwrap_or_default();
    let usecase = CancelBookingUseCase {
        venues: state.venue_repo(),
    };
    Ok(Json(usecase.execute(&user, id, body.reason).await?))
}

// ── POST /venues/bookings/{id}/split-pay ─────────────────────────────────────

#[derive(Deserialize)]
pub struct SplitParticipantRequest {
    pub name: Option<String>,
    pub phone: String,
    pub amount_paise: Option<i64>,
}

#[derive(Deserialize)]
pub struct SplitPayRequest {
    pub participants: Vec<SplitParticipantRequest>,
}

pub async fn split_pay(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SplitPayRequest>,
) -> Result<Json<SplitPlan>, ArenaError> {
    let usecase = SplitPaymentUseCase {
        venues: state.venue_repo(),
        payment_link_base: state.payment_link_base.clone(),
    };
    let participants = body
        .participants
        .into_iter()
        .map(|p| SplitParticipant {
            name: p.name,
            phone: p.phone,
            amount_paise: p.amount_paise,
        })
        .collect();
    Ok(Json(usecase.execute(&user, id, participants).await?))
}
