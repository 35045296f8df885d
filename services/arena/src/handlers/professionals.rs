use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtside_domain::pagination::PageRequest;

use crate::domain::types::{
    BookingParty, ProfessionalBooking, ProfessionalBookingStatus, ProfessionalRole,
};
use crate::error::ArenaError;
use crate::handlers::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::professional::{
    BookProfessionalInput, BookProfessionalUseCase, CancelProfessionalBookingUseCase,
    CheckDuplicateUseCase, CreateAvailabilityInput, CreateAvailabilityUseCase,
    ListProfessionalBookingsUseCase, UpdateProfessionalBookingStatusUseCase,
};

fn parse_role(raw: &str) -> Result<ProfessionalRole, ArenaError> {
    ProfessionalRole::parse(raw)
        .ok_or_else(|| ArenaError::validation(format!("unknown professional role: {raw}")))
}

// ── POST /professionals/availability ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAvailabilityRequest {
    pub sport_type: String,
    pub per_match_fee_paise: i64,
    pub currency: Option<String>,
    #[serde(default)]
    pub can_play: bool,
    #[serde(default)]
    pub can_coach: bool,
    #[serde(default)]
    pub can_umpire: bool,
}

pub async fn create_availability(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateAvailabilityRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = CreateAvailabilityUseCase {
        professionals: state.professional_repo(),
    };
    let availability = usecase
        .execute(
            &user,
            CreateAvailabilityInput {
                sport_type: body.sport_type,
                per_match_fee_paise: body.per_match_fee_paise,
                currency: body.currency,
                can_play: body.can_play,
                can_coach: body.can_coach,
                can_umpire: body.can_umpire,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(availability)))
}

// ── POST /professionals/bookings ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BookProfessionalRequest {
    pub availability_id: Uuid,
    pub tournament_id: Option<Uuid>,
    pub role: String,
    pub match_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub async fn book_professional(
    State(state): State<AppState>,
    CurrentUser(booker): CurrentUser,
    Json(body): Json<BookProfessionalRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let role = parse_role(&body.role)?;
    let usecase = BookProfessionalUseCase {
        professionals: state.professional_repo(),
    };
    let booking = usecase
        .execute(
            &booker,
            BookProfessionalInput {
                availability_id: body.availability_id,
                tournament_id: body.tournament_id,
                role,
                match_date: body.match_date,
                notes: body.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// ── GET /professionals/bookings/check-duplicate/{tournament_id}/{availability_id}

#[derive(Deserialize)]
pub struct CheckDuplicateQuery {
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct CheckDuplicateResponse {
    pub is_booked: bool,
    pub booking_number: Option<String>,
    pub message: Option<String>,
}

pub async fn check_duplicate(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path((tournament_id, availability_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<CheckDuplicateQuery>,
) -> Result<Json<CheckDuplicateResponse>, ArenaError> {
    let role = match query.role.as_deref() {
        Some(raw) => parse_role(raw)?,
        None => ProfessionalRole::Umpire,
    };
    let usecase = CheckDuplicateUseCase {
        professionals: state.professional_repo(),
    };
    let check = usecase.execute(tournament_id, availability_id, role).await?;
    Ok(Json(CheckDuplicateResponse {
        is_booked: check.is_booked,
        booking_number: check.booking_number,
        message: check.message,
    }))
}

// ── POST /professionals/bookings/{id}/cancel ─────────────────────────────────

pub async fn cancel_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ArenaError> {
    let usecase = CancelProfessionalBookingUseCase {
        professionals: state.professional_repo(),
    };
    usecase.execute(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /professionals/bookings ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    /// `professional` or `booker` (default).
    pub role: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

pub async fn list_bookings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<ProfessionalBooking>>, ArenaError> {
    let party = match query.role.as_deref() {
        Some(raw) => BookingParty::parse(raw)
            .ok_or_else(|| ArenaError::validation(format!("unknown booking party: {raw}")))?,
        None => BookingParty::Booker,
    };
    let page = PageRequest {
        skip: query.skip,
        limit: query.limit.unwrap_or(PageRequest::default().limit),
    }
    .clamped();
    let usecase = ListProfessionalBookingsUseCase {
        professionals: state.professional_repo(),
    };
    Ok(Json(usecase.execute(&user, party, page).await?))
}

// ── PUT /professionals/bookings/{id} ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ProfessionalBooking>, ArenaError> {
    let status = ProfessionalBookingStatus::parse(&body.status).ok_or_else(|| {
        ArenaError::validation(format!("unknown booking status: {}", body.status))
    })?;
    let usecase = UpdateProfessionalBookingStatusUseCase {
        professionals: state.professional_repo(),
    };
    Ok(Json(usecase.execute(&user, id, status).await?))
}
