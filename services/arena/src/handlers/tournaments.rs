use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use courtside_domain::pagination::PageRequest;

use crate::domain::types::{Registration, Tournament};
use crate::error::ArenaError;
use crate::handlers::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::registration::{
    CreateTeamInput, CreateTeamUseCase, RegisterTeamInput, RegisterTeamUseCase,
};
use crate::usecase::tournament::{
    CreateTournamentInput, CreateTournamentUseCase, DeleteTournamentUseCase,
    ListRegistrationsUseCase, UpdateTournamentInput, UpdateTournamentUseCase,
};

// ── POST /tournaments ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub description: Option<String>,
    pub sport_type: String,
    pub city: String,
    pub max_teams: i32,
    #[serde(default)]
    pub entry_fee_paise: i64,
    pub start_date: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
}

pub async fn create_tournament(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateTournamentRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = CreateTournamentUseCase {
        tournaments: state.tournament_repo(),
        grants: state.grant_repo(),
    };
    let tournament = usecase
        .execute(
            &user,
            CreateTournamentInput {
                name: body.name,
                description: body.description,
                sport_type: body.sport_type,
                city: body.city,
                max_teams: body.max_teams,
                entry_fee_paise: body.entry_fee_paise,
                start_date: body.start_date,
                registration_deadline: body.registration_deadline,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

// ── PATCH /tournaments/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateTournamentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub max_teams: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

pub async fn update_tournament(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTournamentRequest>,
) -> Result<Json<Tournament>, ArenaError> {
    let usecase = UpdateTournamentUseCase {
        tournaments: state.tournament_repo(),
        grants: state.grant_repo(),
    };
    let tournament = usecase
        .execute(
            &user,
            id,
            UpdateTournamentInput {
                name: body.name,
                description: body.description,
                status: body.status,
                max_teams: body.max_teams,
                registration_deadline: body.registration_deadline,
            },
        )
        .await?;
    Ok(Json(tournament))
}

// ── DELETE /tournaments/{id} ─────────────────────────────────────────────────

pub async fn delete_tournament(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ArenaError> {
    let usecase = DeleteTournamentUseCase {
        tournaments: state.tournament_repo(),
        grants: state.grant_repo(),
    };
    usecase.execute(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /tournaments/teams ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub sport_type: String,
    pub city: String,
}

pub async fn create_team(
    State(state): State<AppState>,
    CurrentUser(captain): CurrentUser,
    Json(body): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = CreateTeamUseCase {
        tournaments: state.tournament_repo(),
    };
    let team = usecase
        .execute(
            &captain,
            CreateTeamInput {
                name: body.name,
                sport_type: body.sport_type,
                city: body.city,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(team)))
}

// ── POST /tournaments/{id}/register ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterTeamRequest {
    pub team_id: Uuid,
    pub captain_name: String,
    pub captain_contact: String,
}

pub async fn register_team(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RegisterTeamRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = RegisterTeamUseCase {
        tournaments: state.tournament_repo(),
    };
    let registration = usecase
        .execute(
            &user,
            id,
            RegisterTeamInput {
                team_id: body.team_id,
                captain_name: body.captain_name,
                captain_contact: body.captain_contact,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

// ── GET /tournaments/{id}/registrations ──────────────────────────────────────

pub async fn list_registrations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<Registration>>, ArenaError> {
    let usecase = ListRegistrationsUseCase {
        tournaments: state.tournament_repo(),
        grants: state.grant_repo(),
    };
    Ok(Json(usecase.execute(&user, id, page).await?))
}
