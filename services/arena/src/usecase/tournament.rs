use chrono::{DateTime, Utc};
use uuid::Uuid;

use courtside_domain::capability::Capability;
use courtside_domain::pagination::PageRequest;

use crate::domain::repository::{GrantRepository, TournamentRepository};
use crate::domain::types::{Registration, Tournament, User};
use crate::error::ArenaError;
use crate::usecase::permission::{authorize, effective_permissions};

pub const TOURNAMENT_STATUSES: [&str; 4] = ["upcoming", "ongoing", "completed", "cancelled"];

/// Allow the recorded organizer, or a delegate holding `capability` under them.
pub async fn gate<G: GrantRepository>(
    grants: &G,
    caller: &User,
    tournament: &Tournament,
    capability: Capability,
) -> Result<(), ArenaError> {
    if caller.id == tournament.organizer_id
        || authorize(grants, caller.id, tournament.organizer_id, capability).await?
    {
        return Ok(());
    }
    tracing::info!(
        user_id = %caller.id,
        tournament_id = %tournament.id,
        capability = %capability,
        "tournament access denied"
    );
    Err(ArenaError::Forbidden("not authorized"))
}

async fn find_live<T: TournamentRepository>(
    tournaments: &T,
    id: Uuid,
) -> Result<Tournament, ArenaError> {
    tournaments
        .find(id)
        .await?
        .filter(|t| t.is_active)
        .ok_or(ArenaError::TournamentNotFound)
}

fn check_schedule(
    max_teams: i32,
    start_date: DateTime<Utc>,
    registration_deadline: DateTime<Utc>,
) -> Result<(), ArenaError> {
    if max_teams <= 0 {
        return Err(ArenaError::validation("max_teams must be positive"));
    }
    if registration_deadline > start_date {
        return Err(ArenaError::validation(
            "registration_deadline must not be after start_date",
        ));
    }
    Ok(())
}

// ── CreateTournament ─────────────────────────────────────────────────────────

pub struct CreateTournamentInput {
    pub name: String,
    pub description: Option<String>,
    pub sport_type: String,
    pub city: String,
    pub max_teams: i32,
    pub entry_fee_paise: i64,
    pub start_date: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
}

pub struct CreateTournamentUseCase<T: TournamentRepository, G: GrantRepository> {
    pub tournaments: T,
    pub grants: G,
}

impl<T: TournamentRepository, G: GrantRepository> CreateTournamentUseCase<T, G> {
    /// The tournament belongs to the caller's principal; `created_by` and
    /// `created_by_manager` record who actually acted.
    pub async fn execute(
        &self,
        caller: &User,
        input: CreateTournamentInput,
    ) -> Result<Tournament, ArenaError> {
        let perms = effective_permissions(&self.grants, caller).await?;
        let principal_id = match perms.principal_id {
            Some(id) if perms.capabilities.contains(Capability::CreateTournament) => id,
            _ => {
                return Err(ArenaError::Forbidden(
                    "only organizers and their managers can create tournaments",
                ));
            }
        };

        if input.name.trim().is_empty() || input.sport_type.trim().is_empty() {
            return Err(ArenaError::validation("name and sport_type are required"));
        }
        if input.entry_fee_paise < 0 {
            return Err(ArenaError::validation("entry_fee cannot be negative"));
        }
        check_schedule(input.max_teams, input.start_date, input.registration_deadline)?;

        let now = Utc::now();
        let tournament = Tournament {
            id: Uuid::now_v7(),
            name: input.name.trim().to_owned(),
            description: input.description,
            sport_type: input.sport_type,
            city: input.city,
            organizer_id: principal_id,
            created_by: caller.id,
            created_by_manager: perms.is_delegate,
            max_teams: input.max_teams,
            current_teams: 0,
            entry_fee_paise: input.entry_fee_paise,
            start_date: input.start_date,
            registration_deadline: input.registration_deadline,
            status: TOURNAMENT_STATUSES[0].to_owned(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.tournaments.create(&tournament).await?;

        tracing::info!(
            tournament_id = %tournament.id,
            organizer_id = %principal_id,
            created_by = %caller.id,
            created_by_manager = perms.is_delegate,
            "tournament created"
        );
        Ok(tournament)
    }
}

// ── UpdateTournament ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateTournamentInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub max_teams: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

pub struct UpdateTournamentUseCase<T: TournamentRepository, G: GrantRepository> {
    pub tournaments: T,
    pub grants: G,
}

impl<T: TournamentRepository, G: GrantRepository> UpdateTournamentUseCase<T, G> {
    pub async fn execute(
        &self,
        caller: &User,
        id: Uuid,
        input: UpdateTournamentInput,
    ) -> Result<Tournament, ArenaError> {
        let mut tournament = find_live(&self.tournaments, id).await?;
        gate(&self.grants, caller, &tournament, Capability::EditTournament).await?;

        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(ArenaError::validation("name cannot be empty"));
            }
            tournament.name = name.trim().to_owned();
        }
        if let Some(description) = input.description {
            tournament.description = Some(description);
        }
        if let Some(status) = input.status {
            if !TOURNAMENT_STATUSES.contains(&status.as_str()) {
                return Err(ArenaError::validation(format!("unknown status: {status}")));
            }
            tournament.status = status;
        }
        if let Some(max_teams) = input.max_teams {
            if max_teams < tournament.current_teams {
                return Err(ArenaError::validation(
                    "max_teams cannot be below the number of registered teams",
                ));
            }
            tournament.max_teams = max_teams;
        }
        if let Some(deadline) = input.registration_deadline {
            tournament.registration_deadline = deadline;
        }
        check_schedule(
            tournament.max_teams,
            tournament.start_date,
            tournament.registration_deadline,
        )?;

        tournament.updated_at = Utc::now();
        if !self.tournaments.update(&tournament).await? {
            return Err(ArenaError::validation(
                "max_teams cannot be below the number of registered teams",
            ));
        }
        tracing::info!(tournament_id = %id, user_id = %caller.id, "tournament updated");
        Ok(tournament)
    }
}

// ── DeleteTournament ─────────────────────────────────────────────────────────

pub struct DeleteTournamentUseCase<T: TournamentRepository, G: GrantRepository> {
    pub tournaments: T,
    pub grants: G,
}

impl<T: TournamentRepository, G: GrantRepository> DeleteTournamentUseCase<T, G> {
    pub async fn execute(&self, caller: &User, id: Uuid) -> Result<(), ArenaError> {
        let tournament = find_live(&self.tournaments, id).await?;
        gate(&self.grants, caller, &tournament, Capability::EditTournament).await?;
        self.tournaments.deactivate(id, Utc::now()).await?;
        tracing::info!(tournament_id = %id, user_id = %caller.id, "tournament deleted");
        Ok(())
    }
}

// ── ListRegistrations ────────────────────────────────────────────────────────

pub struct ListRegistrationsUseCase<T: TournamentRepository, G: GrantRepository> {
    pub tournaments: T,
    pub grants: G,
}

impl<T: TournamentRepository, G: GrantRepository> ListRegistrationsUseCase<T, G> {
    pub async fn execute(
        &self,
        caller: &User,
        id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Registration>, ArenaError> {
        let tournament = find_live(&self.tournaments, id).await?;
        gate(&self.grants, caller, &tournament, Capability::ViewRegistrations).await?;
        self.tournaments
            .list_registrations(id, page.clamped())
            .await
    }
}
