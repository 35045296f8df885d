use chrono::{Duration, Utc};
use uuid::Uuid;

use courtside_domain::capability::{Capability, CapabilitySet};
use courtside_domain::pagination::PageRequest;

use crate::domain::repository::{GrantRepository, InvitationRepository, UserRepository};
use crate::domain::types::{
    INVITATION_TTL_DAYS, Invitation, InvitationStatus, ManagerGrant, User,
};
use crate::error::ArenaError;
use crate::usecase::permission::require_organizer;

fn require_invitee(invitation: &Invitation, caller: &User) -> Result<(), ArenaError> {
    if invitation.user_id == caller.id {
        Ok(())
    } else {
        Err(ArenaError::Forbidden("this invitation is not for you"))
    }
}

// ── SendInvitation ───────────────────────────────────────────────────────────

pub struct SendInvitationInput {
    pub user_id: Uuid,
    pub capabilities: Option<CapabilitySet>,
    pub role_description: Option<String>,
}

pub struct SendInvitationUseCase<I: InvitationRepository, G: GrantRepository, U: UserRepository> {
    pub invitations: I,
    pub grants: G,
    pub users: U,
}

impl<I, G, U> SendInvitationUseCase<I, G, U>
where
    I: InvitationRepository,
    G: GrantRepository,
    U: UserRepository,
{
    pub async fn execute(
        &self,
        organizer: &User,
        input: SendInvitationInput,
    ) -> Result<Invitation, ArenaError> {
        require_organizer(organizer, "only organizers can send invitations")?;

        if input.user_id == organizer.id {
            return Err(ArenaError::validation("you cannot invite yourself"));
        }

        self.users
            .find_by_id(input.user_id)
            .await?
            .ok_or(ArenaError::UserNotFound)?;

        if self
            .grants
            .find_active(organizer.id, input.user_id)
            .await?
            .is_some()
        {
            return Err(ArenaError::AlreadyManager);
        }

        // An invitee must at least be able to edit the organizer's tournaments.
        let capabilities = input
            .capabilities
            .unwrap_or_else(CapabilitySet::delegate_default)
            .with(Capability::EditTournament);

        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::now_v7(),
            organizer_id: organizer.id,
            user_id: input.user_id,
            capabilities,
            role_description: input.role_description,
            status: InvitationStatus::Pending,
            created_at: now,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            responded_at: None,
        };
        self.invitations.create(&invitation, now).await?;

        tracing::info!(
            organizer_id = %organizer.id,
            user_id = %invitation.user_id,
            invitation_id = %invitation.id,
            "invitation sent"
        );
        Ok(invitation)
    }
}

// ── AcceptInvitation ─────────────────────────────────────────────────────────

pub struct AcceptInvitationUseCase<I: InvitationRepository> {
    pub invitations: I,
}

impl<I: InvitationRepository> AcceptInvitationUseCase<I> {
    pub async fn execute(&self, caller: &User, id: Uuid) -> Result<ManagerGrant, ArenaError> {
        let invitation = self
            .invitations
            .find(id)
            .await?
            .ok_or(ArenaError::InvitationNotFound)?;
        require_invitee(&invitation, caller)?;

        if invitation.status != InvitationStatus::Pending {
            return Err(ArenaError::InvitationNotPending);
        }
        let now = Utc::now();
        if invitation.is_expired(now) {
            return Err(ArenaError::InvitationExpired);
        }

        let grant = ManagerGrant {
            id: Uuid::now_v7(),
            organizer_id: invitation.organizer_id,
            manager_user_id: Some(caller.id),
            name: caller.name.clone(),
            phone: Some(caller.phone.clone()),
            email: caller.email.clone(),
            role_description: invitation.role_description,
            capabilities: invitation.capabilities,
            is_active: true,
            is_verified: true,
            created_at: now,
            updated_at: now,
        };

        // Lost a race with another response or the expiry sweep.
        if !self.invitations.accept(id, &grant, now).await? {
            return Err(ArenaError::InvitationNotPending);
        }

        tracing::info!(
            organizer_id = %grant.organizer_id,
            manager_user_id = %caller.id,
            invitation_id = %id,
            grant_id = %grant.id,
            "invitation accepted"
        );
        Ok(grant)
    }
}

// ── RejectInvitation ─────────────────────────────────────────────────────────

pub struct RejectInvitationUseCase<I: InvitationRepository> {
    pub invitations: I,
}

impl<I: InvitationRepository> RejectInvitationUseCase<I> {
    pub async fn execute(&self, caller: &User, id: Uuid) -> Result<(), ArenaError> {
        let invitation = self
            .invitations
            .find(id)
            .await?
            .ok_or(ArenaError::InvitationNotFound)?;
        require_invitee(&invitation, caller)?;

        if invitation.status != InvitationStatus::Pending
            || !self.invitations.reject(id, Utc::now()).await?
        {
            return Err(ArenaError::InvitationNotPending);
        }

        tracing::info!(invitation_id = %id, user_id = %caller.id, "invitation rejected");
        Ok(())
    }
}

// ── ListInvitations ──────────────────────────────────────────────────────────

pub struct ListInvitationsUseCase<I: InvitationRepository> {
    pub invitations: I,
}

impl<I: InvitationRepository> ListInvitationsUseCase<I> {
    pub async fn execute(
        &self,
        caller: &User,
        page: PageRequest,
    ) -> Result<Vec<Invitation>, ArenaError> {
        self.invitations
            .list_for_user(caller.id, page.clamped())
            .await
    }
}
