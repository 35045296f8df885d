use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::TournamentRepository;
use crate::domain::types::{PAYMENT_PENDING, Registration, Team, User};
use crate::error::ArenaError;

/// `REG-<tournament>-<team>` using the first eight hex digits of each id.
fn registration_number(tournament_id: Uuid, team_id: Uuid) -> String {
    let short = |id: Uuid| id.simple().to_string()[..8].to_uppercase();
    format!("REG-{}-{}", short(tournament_id), short(team_id))
}

// ── CreateTeam ───────────────────────────────────────────────────────────────

pub struct CreateTeamInput {
    pub name: String,
    pub sport_type: String,
    pub city: String,
}

pub struct CreateTeamUseCase<T: TournamentRepository> {
    pub tournaments: T,
}

impl<T: TournamentRepository> CreateTeamUseCase<T> {
    pub async fn execute(
        &self,
        captain: &User,
        input: CreateTeamInput,
    ) -> Result<Team, ArenaError> {
        if input.name.trim().is_empty() || input.sport_type.trim().is_empty() {
            return Err(ArenaError::validation("name and sport_type are required"));
        }
        let team = Team {
            id: Uuid::now_v7(),
            name: input.name.trim().to_owned(),
            sport_type: input.sport_type,
            city: input.city,
            captain_id: captain.id,
            is_active: true,
            created_at: Utc::now(),
        };
        self.tournaments.create_team(&team).await?;
        tracing::info!(team_id = %team.id, captain_id = %captain.id, "team created");
        Ok(team)
    }
}

// ── RegisterTeam ─────────────────────────────────────────────────────────────

pub struct RegisterTeamInput {
    pub team_id: Uuid,
    pub captain_name: String,
    pub captain_contact: String,
}

pub struct RegisterTeamUseCase<T: TournamentRepository> {
    pub tournaments: T,
}

impl<T: TournamentRepository> RegisterTeamUseCase<T> {
    /// Checks run in order: tournament and team exist, deadline open, caller
    /// captains the team, capacity left. The capacity read is advisory; the
    /// repository's conditional increment is what enforces `max_teams`.
    pub async fn execute(
        &self,
        caller: &User,
        tournament_id: Uuid,
        input: RegisterTeamInput,
    ) -> Result<Registration, ArenaError> {
        let tournament = self
            .tournaments
            .find(tournament_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or(ArenaError::TournamentNotFound)?;
        let team = self
            .tournaments
            .find_team(input.team_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or(ArenaError::TeamNotFound)?;

        let now = Utc::now();
        if now > tournament.registration_deadline {
            return Err(ArenaError::RegistrationClosed);
        }
        if team.captain_id != caller.id {
            return Err(ArenaError::Forbidden("only the team captain can register"));
        }
        if tournament.current_teams >= tournament.max_teams {
            return Err(ArenaError::TournamentFull);
        }
        if input.captain_name.trim().is_empty() || input.captain_contact.trim().is_empty() {
            return Err(ArenaError::validation(
                "captain_name and captain_contact are required",
            ));
        }

        let registration = Registration {
            id: Uuid::now_v7(),
            registration_number: registration_number(tournament.id, team.id),
            tournament_id: tournament.id,
            team_id: team.id,
            registered_by: caller.id,
            captain_name: input.captain_name,
            captain_contact: input.captain_contact,
            entry_fee_paise: tournament.entry_fee_paise,
            payment_status: PAYMENT_PENDING.to_owned(),
            status: "pending".to_owned(),
            created_at: now,
        };
        self.tournaments.register(&registration).await?;

        tracing::info!(
            registration_id = %registration.id,
            tournament_id = %tournament.id,
            team_id = %team.id,
            "team registered"
        );
        Ok(registration)
    }
}
