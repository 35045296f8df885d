use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtside_domain::capability::CapabilitySet;
use courtside_domain::pagination::PageRequest;

use crate::domain::types::{EffectivePermissions, Invitation, ManagerGrant, User};
use crate::error::ArenaError;
use crate::handlers::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::invitation::{
    AcceptInvitationUseCase, ListInvitationsUseCase, RejectInvitationUseCase,
    SendInvitationInput, SendInvitationUseCase,
};
use crate::usecase::permission::{
    GetManagerUseCase, GrantDirectInput, GrantDirectUseCase, GrantWithNewIdentityUseCase,
    ListManagersUseCase, NewManagerInput, RemoveManagerUseCase, UpdateManagerInput,
    UpdateManagerUseCase, effective_permissions,
};

/// Absent means "use the default"; present (even empty) is taken as given.
fn parse_capabilities(raw: Option<Vec<String>>) -> Result<Option<CapabilitySet>, ArenaError> {
    raw.map(|list| {
        CapabilitySet::parse_all(list).map_err(|e| ArenaError::validation(e.to_string()))
    })
    .transpose()
}

// ── POST /organizer-team/managers ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateManagerRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role_description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct CreateManagerResponse {
    pub user: User,
    pub manager: ManagerGrant,
}

pub async fn create_manager(
    State(state): State<AppState>,
    CurrentUser(organizer): CurrentUser,
    Json(body): Json<CreateManagerRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = GrantWithNewIdentityUseCase {
        grants: state.grant_repo(),
        users: state.user_repo(),
    };
    let (user, manager) = usecase
        .execute(
            &organizer,
            NewManagerInput {
                name: body.name,
                phone: body.phone,
                email: body.email,
                role_description: body.role_description,
                capabilities: parse_capabilities(body.permissions)?,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateManagerResponse { user, manager }),
    ))
}

// ── POST /organizer-team/managers/add-existing ───────────────────────────────

#[derive(Deserialize)]
pub struct AddExistingRequest {
    pub user_id: Uuid,
    pub role_description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

pub async fn add_existing_manager(
    State(state): State<AppState>,
    CurrentUser(organizer): CurrentUser,
    Json(body): Json<AddExistingRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = GrantDirectUseCase {
        grants: state.grant_repo(),
        users: state.user_repo(),
    };
    let grant = usecase
        .execute(
            &organizer,
            GrantDirectInput {
                user_id: body.user_id,
                capabilities: parse_capabilities(body.permissions)?,
                role_description: body.role_description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

// ── GET /organizer-team/managers ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListManagersQuery {
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

pub async fn list_managers(
    State(state): State<AppState>,
    CurrentUser(organizer): CurrentUser,
    Query(query): Query<ListManagersQuery>,
) -> Result<Json<Vec<ManagerGrant>>, ArenaError> {
    let page = PageRequest {
        skip: query.skip,
        limit: query.limit.unwrap_or(PageRequest::default().limit),
    };
    let usecase = ListManagersUseCase {
        grants: state.grant_repo(),
    };
    let list = usecase
        .execute(&organizer, query.include_inactive, page)
        .await?;
    Ok(Json(list))
}

// ── GET /organizer-team/managers/{id} ────────────────────────────────────────

pub async fn get_manager(
    State(state): State<AppState>,
    CurrentUser(organizer): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ManagerGrant>, ArenaError> {
    let usecase = GetManagerUseCase {
        grants: state.grant_repo(),
    };
    Ok(Json(usecase.execute(&organizer, id).await?))
}

// ── PATCH /organizer-team/managers/{id} ──────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateManagerRequest {
    pub role_description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

pub async fn update_manager(
    State(state): State<AppState>,
    CurrentUser(organizer): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateManagerRequest>,
) -> Result<Json<ManagerGrant>, ArenaError> {
    let usecase = UpdateManagerUseCase {
        grants: state.grant_repo(),
    };
    let grant = usecase
        .execute(
            &organizer,
            id,
            UpdateManagerInput {
                role_description: body.role_description,
                capabilities: parse_capabilities(body.permissions)?,
            },
        )
        .await?;
    Ok(Json(grant))
}

// ── DELETE /organizer-team/managers/{id} ─────────────────────────────────────

pub async fn remove_manager(
    State(state): State<AppState>,
    CurrentUser(organizer): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ArenaError> {
    let usecase = RemoveManagerUseCase {
        grants: state.grant_repo(),
    };
    usecase.execute(&organizer, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /organizer-team/invitations/send ────────────────────────────────────

#[derive(Deserialize)]
pub struct SendInvitationRequest {
    pub user_id: Uuid,
    pub role_description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

pub async fn send_invitation(
    State(state): State<AppState>,
    CurrentUser(organizer): CurrentUser,
    Json(body): Json<SendInvitationRequest>,
) -> Result<impl IntoResponse, ArenaError> {
    let usecase = SendInvitationUseCase {
        invitations: state.invitation_repo(),
        grants: state.grant_repo(),
        users: state.user_repo(),
    };
    let invitation = usecase
        .execute(
            &organizer,
            SendInvitationInput {
                user_id: body.user_id,
                capabilities: parse_capabilities(body.permissions)?,
                role_description: body.role_description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(invitation)))
}

// ── GET /organizer-team/invitations ──────────────────────────────────────────

pub async fn list_invitations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<Invitation>>, ArenaError> {
    let usecase = ListInvitationsUseCase {
        invitations: state.invitation_repo(),
    };
    Ok(Json(usecase.execute(&user, page).await?))
}

// ── POST /organizer-team/invitations/{id}/accept ─────────────────────────────

pub async fn accept_invitation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ManagerGrant>, ArenaError> {
    let usecase = AcceptInvitationUseCase {
        invitations: state.invitation_repo(),
    };
    Ok(Json(usecase.execute(&user, id).await?))
}

// ── POST /organizer-team/invitations/{id}/reject ─────────────────────────────

pub async fn reject_invitation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ArenaError> {
    let usecase = RejectInvitationUseCase {
        invitations: state.invitation_repo(),
    };
    usecase.execute(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /organizer-team/check-permission ─────────────────────────────────────

pub async fn check_permission(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<EffectivePermissions>, ArenaError> {
    let perms = effective_permissions(&state.grant_repo(), &user).await?;
    Ok(Json(perms))
}
