use chrono::Utc;
use uuid::Uuid;

use courtside_domain::capability::{Capability, CapabilitySet};
use courtside_domain::pagination::PageRequest;
use courtside_domain::phone::Phone;
use courtside_domain::user::UserRole;

use crate::domain::repository::{GrantRepository, UserRepository};
use crate::domain::types::{EffectivePermissions, ManagerGrant, User};
use crate::error::ArenaError;

/// What `user` may do and on whose behalf.
///
/// An active grant takes precedence: a delegate acts for the grant's
/// organizer with the grant's capabilities, even if their own role is
/// organizer. Otherwise an organizer is their own principal with every
/// capability, and anyone else holds nothing.
pub async fn effective_permissions<G: GrantRepository>(
    grants: &G,
    user: &User,
) -> Result<EffectivePermissions, ArenaError> {
    if let Some(grant) = grants.latest_active_for_manager(user.id).await? {
        return Ok(EffectivePermissions {
            is_owner: false,
            is_delegate: true,
            principal_id: Some(grant.organizer_id),
            capabilities: grant.capabilities,
        });
    }

    if user.is_organizer() {
        return Ok(EffectivePermissions {
            is_owner: true,
            is_delegate: false,
            principal_id: Some(user.id),
            capabilities: CapabilitySet::full(),
        });
    }

    Ok(EffectivePermissions::none())
}

/// Whether `user_id` may exercise `capability` over resources owned by `owner_id`.
pub async fn authorize<G: GrantRepository>(
    grants: &G,
    user_id: Uuid,
    owner_id: Uuid,
    capability: Capability,
) -> Result<bool, ArenaError> {
    if user_id == owner_id {
        return Ok(true);
    }
    Ok(grants
        .find_active(owner_id, user_id)
        .await?
        .is_some_and(|grant| grant.capabilities.contains(capability)))
}

pub(crate) fn require_organizer(user: &User, action: &'static str) -> Result<(), ArenaError> {
    if user.is_organizer() {
        Ok(())
    } else {
        Err(ArenaError::Forbidden(action))
    }
}

fn require_grant_owner(grant: &ManagerGrant, organizer: &User) -> Result<(), ArenaError> {
    if grant.organizer_id == organizer.id {
        Ok(())
    } else {
        Err(ArenaError::Forbidden("not authorized"))
    }
}

// ── GrantDirect (add existing user) ──────────────────────────────────────────

pub struct GrantDirectInput {
    pub user_id: Uuid,
    /// `None` applies the delegate default; `Some` is honored verbatim, even if empty.
    pub capabilities: Option<CapabilitySet>,
    pub role_description: Option<String>,
}

pub struct GrantDirectUseCase<G: GrantRepository, U: UserRepository> {
    pub grants: G,
    pub users: U,
}

impl<G: GrantRepository, U: UserRepository> GrantDirectUseCase<G, U> {
    pub async fn execute(
        &self,
        organizer: &User,
        input: GrantDirectInput,
    ) -> Result<ManagerGrant, ArenaError> {
        require_organizer(organizer, "only organizers can add team members")?;

        if input.user_id == organizer.id {
            return Err(ArenaError::validation("you cannot add yourself to your team"));
        }

        let target = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or(ArenaError::UserNotFound)?;

        if self
            .grants
            .find_active(organizer.id, target.id)
            .await?
            .is_some()
        {
            return Err(ArenaError::AlreadyManager);
        }

        let now = Utc::now();
        let grant = ManagerGrant {
            id: Uuid::now_v7(),
            organizer_id: organizer.id,
            manager_user_id: Some(target.id),
            name: target.name.clone(),
            phone: Some(target.phone.clone()),
            email: target.email.clone(),
            role_description: input.role_description,
            capabilities: input
                .capabilities
                .unwrap_or_else(CapabilitySet::delegate_default),
            is_active: true,
            is_verified: true,
            created_at: now,
            updated_at: now,
        };
        self.grants.create(&grant).await?;

        tracing::info!(
            organizer_id = %organizer.id,
            manager_user_id = %target.id,
            grant_id = %grant.id,
            "manager added"
        );
        Ok(grant)
    }
}

// ── GrantWithNewIdentity (create user + grant) ───────────────────────────────

pub struct NewManagerInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role_description: Option<String>,
    pub capabilities: Option<CapabilitySet>,
}

pub struct GrantWithNewIdentityUseCase<G: GrantRepository, U: UserRepository> {
    pub grants: G,
    pub users: U,
}

impl<G: GrantRepository, U: UserRepository> GrantWithNewIdentityUseCase<G, U> {
    pub async fn execute(
        &self,
        organizer: &User,
        input: NewManagerInput,
    ) -> Result<(User, ManagerGrant), ArenaError> {
        require_organizer(organizer, "only organizers can create manager accounts")?;

        let phone =
            Phone::parse(&input.phone).map_err(|e| ArenaError::validation(e.to_string()))?;
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ArenaError::validation("name is required"));
        }
        let email = input
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        if self.users.find_by_phone(phone.as_str()).await?.is_some() {
            return Err(ArenaError::PhoneAlreadyRegistered);
        }
        if let Some(email) = &email
            && self.users.find_by_email(email).await?.is_some()
        {
            return Err(ArenaError::EmailAlreadyRegistered);
        }

        let now = Utc::now();
        // Delegates get the organizer role so tournaments they create under
        // their own identity still pass ownership checks.
        let user = User {
            id: Uuid::now_v7(),
            phone: phone.into_inner(),
            name: Some(name.to_owned()),
            email,
            role: Some(UserRole::Organizer),
            is_verified: true,
            is_active: true,
            onboarding_completed: true,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
        };
        let grant = ManagerGrant {
            id: Uuid::now_v7(),
            organizer_id: organizer.id,
            manager_user_id: Some(user.id),
            name: user.name.clone(),
            phone: Some(user.phone.clone()),
            email: user.email.clone(),
            role_description: input.role_description,
            capabilities: input
                .capabilities
                .unwrap_or_else(CapabilitySet::delegate_default),
            is_active: true,
            is_verified: true,
            created_at: now,
            updated_at: now,
        };
        self.grants.create_with_user(&user, &grant).await?;

        tracing::info!(
            organizer_id = %organizer.id,
            manager_user_id = %user.id,
            grant_id = %grant.id,
            "manager account created"
        );
        Ok((user, grant))
    }
}

// ── Manager CRUD ─────────────────────────────────────────────────────────────

pub struct ListManagersUseCase<G: GrantRepository> {
    pub grants: G,
}

impl<G: GrantRepository> ListManagersUseCase<G> {
    pub async fn execute(
        &self,
        organizer: &User,
        include_inactive: bool,
        page: PageRequest,
    ) -> Result<Vec<ManagerGrant>, ArenaError> {
        require_organizer(organizer, "only organizers can view their team")?;
        self.grants
            .list_by_organizer(organizer.id, include_inactive, page.clamped())
            .await
    }
}

pub struct GetManagerUseCase<G: GrantRepository> {
    pub grants: G,
}

impl<G: GrantRepository> GetManagerUseCase<G> {
    pub async fn execute(&self, organizer: &User, id: Uuid) -> Result<ManagerGrant, ArenaError> {
        let grant = self
            .grants
            .find(id)
            .await?
            .ok_or(ArenaError::GrantNotFound)?;
        require_grant_owner(&grant, organizer)?;
        Ok(grant)
    }
}

pub struct UpdateManagerInput {
    pub role_description: Option<String>,
    pub capabilities: Option<CapabilitySet>,
}

pub struct UpdateManagerUseCase<G: GrantRepository> {
    pub grants: G,
}

impl<G: GrantRepository> UpdateManagerUseCase<G> {
    pub async fn execute(
        &self,
        organizer: &User,
        id: Uuid,
        input: UpdateManagerInput,
    ) -> Result<ManagerGrant, ArenaError> {
        let mut grant = self
            .grants
            .find(id)
            .await?
            .ok_or(ArenaError::GrantNotFound)?;
        require_grant_owner(&grant, organizer)?;

        if let Some(role_description) = input.role_description {
            grant.role_description = Some(role_description);
        }
        if let Some(capabilities) = input.capabilities {
            grant.capabilities = capabilities;
        }
        grant.updated_at = Utc::now();
        self.grants.update(&grant).await?;
        Ok(grant)
    }
}

pub struct RemoveManagerUseCase<G: GrantRepository> {
    pub grants: G,
}

impl<G: GrantRepository> RemoveManagerUseCase<G> {
    pub async fn execute(&self, organizer: &User, id: Uuid) -> Result<(), ArenaError> {
        let grant = self
            .grants
            .find(id)
            .await?
            .ok_or(ArenaError::GrantNotFound)?;
        require_grant_owner(&grant, organizer)?;

        if self.grants.deactivate(id, Utc::now()).await? {
            tracing::info!(organizer_id = %organizer.id, grant_id = %id, "manager removed");
        }
        Ok(())
    }
}
