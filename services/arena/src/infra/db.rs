use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use courtside_arena_schema::{
    bookings, invitations, manager_grants, professional_availability, professional_bookings,
    teams, tournament_registrations, tournaments, users, venues,
};
use courtside_core::sea_ext::violates_index;
use courtside_domain::capability::CapabilitySet;
use courtside_domain::pagination::PageRequest;

use crate::domain::repository::{
    GrantRepository, InvitationRepository, ProfessionalRepository, TournamentRepository,
    UserRepository, VenueRepository,
};
use crate::domain::types::{
    Booking, BookingParty, BookingStatus, Invitation, InvitationStatus, ManagerGrant, ProfessionalAvailability,
    ProfessionalBooking, ProfessionalBookingStatus, ProfessionalRole, Registration, SplitPlan,
    Team, Tournament, User, Venue,
};
use crate::error::ArenaError;

const LIVE_BOOKING_STATUSES: [&str; 2] = ["confirmed", "pending"];
const LIVE_PROFESSIONAL_STATUSES: [&str; 2] = ["confirmed", "accepted"];

// ── Error helpers ────────────────────────────────────────────────────────────

fn db_err(what: &'static str) -> impl FnOnce(DbErr) -> ArenaError {
    move |e| ArenaError::Internal(anyhow::Error::new(e).context(what))
}

/// Map a violation of `index` to `conflict`; anything else is internal.
fn on_unique(
    index: &'static str,
    conflict: ArenaError,
    what: &'static str,
) -> impl FnOnce(DbErr) -> ArenaError {
    move |e| {
        if violates_index(&e, index) {
            conflict
        } else {
            db_err(what)(e)
        }
    }
}

fn txn_err(err: TransactionError<ArenaError>) -> ArenaError {
    match err {
        TransactionError::Connection(e) => db_err("transaction")(e),
        TransactionError::Transaction(e) => e,
    }
}

fn capabilities_to_json(capabilities: &CapabilitySet) -> serde_json::Value {
    serde_json::Value::from(capabilities.to_strings())
}

fn capabilities_from_json(value: serde_json::Value) -> Result<CapabilitySet, ArenaError> {
    Ok(serde_json::from_value(value).context("decode capabilities")?)
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ArenaError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ArenaError> {
        let model = users::Entity::find()
            .filter(users::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .context("find user by phone")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ArenaError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn upsert_verified(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<(User, bool), ArenaError> {
        let id = Uuid::now_v7();
        let user = users::ActiveModel {
            id: Set(id),
            phone: Set(phone.to_owned()),
            name: Set(None),
            email: Set(None),
            role: Set(None),
            is_verified: Set(true),
            is_active: Set(true),
            onboarding_completed: Set(false),
            latitude: Set(None),
            longitude: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = users::Entity::insert(user)
            .on_conflict(
                OnConflict::column(users::Column::Phone)
                    .update_columns([users::Column::IsVerified, users::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .context("upsert verified user")?;
        let created = model.id == id;
        Ok((user_from_model(model), created))
    }
}

fn user_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        phone: Set(user.phone.clone()),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        role: Set(user.role.map(|r| r.as_str().to_owned())),
        is_verified: Set(user.is_verified),
        is_active: Set(user.is_active),
        onboarding_completed: Set(user.onboarding_completed),
        latitude: Set(user.latitude),
        longitude: Set(user.longitude),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        phone: model.phone,
        name: model.name,
        email: model.email,
        // An unrecognized stored role reads as "no role yet".
        role: model.role.as_deref().and_then(|r| r.parse().ok()),
        is_verified: model.is_verified,
        is_active: model.is_active,
        onboarding_completed: model.onboarding_completed,
        latitude: model.latitude,
        longitude: model.longitude,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Grant repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGrantRepository {
    pub db: DatabaseConnection,
}

impl GrantRepository for DbGrantRepository {
    async fn find(&self, id: Uuid) -> Result<Option<ManagerGrant>, ArenaError> {
        let model = manager_grants::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find grant")?;
        model.map(grant_from_model).transpose()
    }

    async fn find_active(
        &self,
        organizer_id: Uuid,
        manager_user_id: Uuid,
    ) -> Result<Option<ManagerGrant>, ArenaError> {
        let model = manager_grants::Entity::find()
            .filter(manager_grants::Column::OrganizerId.eq(organizer_id))
            .filter(manager_grants::Column::ManagerUserId.eq(manager_user_id))
            .filter(manager_grants::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .context("find active grant")?;
        model.map(grant_from_model).transpose()
    }

    async fn latest_active_for_manager(
        &self,
        manager_user_id: Uuid,
    ) -> Result<Option<ManagerGrant>, ArenaError> {
        let model = manager_grants::Entity::find()
            .filter(manager_grants::Column::ManagerUserId.eq(manager_user_id))
            .filter(manager_grants::Column::IsActive.eq(true))
            .order_by_desc(manager_grants::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest active grant for manager")?;
        model.map(grant_from_model).transpose()
    }

    async fn list_by_organizer(
        &self,
        organizer_id: Uuid,
        include_inactive: bool,
        page: PageRequest,
    ) -> Result<Vec<ManagerGrant>, ArenaError> {
        let mut query = manager_grants::Entity::find()
            .filter(manager_grants::Column::OrganizerId.eq(organizer_id));
        if !include_inactive {
            query = query.filter(manager_grants::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_desc(manager_grants::Column::CreatedAt)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list grants by organizer")?;
        models.into_iter().map(grant_from_model).collect()
    }

    async fn create(&self, grant: &ManagerGrant) -> Result<(), ArenaError> {
        grant_active_model(grant)
            .insert(&self.db)
            .await
            .map_err(on_unique(
                "uq_manager_grants_active_pair",
                ArenaError::AlreadyManager,
                "create grant",
            ))?;
        Ok(())
    }

    async fn create_with_user(&self, user: &User, grant: &ManagerGrant) -> Result<(), ArenaError> {
        let user = user_active_model(user);
        let grant = grant_active_model(grant);
        self.db
            .transaction::<_, (), ArenaError>(|txn| {
                Box::pin(async move {
                    user.insert(txn).await.map_err(|e| {
                        if violates_index(&e, "users_email_key") {
                            ArenaError::EmailAlreadyRegistered
                        } else if violates_index(&e, "users_phone_key") {
                            ArenaError::PhoneAlreadyRegistered
                        } else {
                            db_err("insert manager user")(e)
                        }
                    })?;
                    grant.insert(txn).await.map_err(on_unique(
                        "uq_manager_grants_active_pair",
                        ArenaError::AlreadyManager,
                        "insert manager grant",
                    ))?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn update(&self, grant: &ManagerGrant) -> Result<(), ArenaError> {
        manager_grants::Entity::update_many()
            .col_expr(
                manager_grants::Column::RoleDescription,
                Expr::value(grant.role_description.clone()),
            )
            .col_expr(
                manager_grants::Column::Capabilities,
                Expr::value(capabilities_to_json(&grant.capabilities)),
            )
            .col_expr(manager_grants::Column::UpdatedAt, Expr::value(grant.updated_at))
            .filter(manager_grants::Column::Id.eq(grant.id))
            .exec(&self.db)
            .await
            .context("update grant")?;
        Ok(())
    }

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError> {
        let result = manager_grants::Entity::update_many()
            .col_expr(manager_grants::Column::IsActive, Expr::value(false))
            .col_expr(manager_grants::Column::UpdatedAt, Expr::value(now))
            .filter(manager_grants::Column::Id.eq(id))
            .filter(manager_grants::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .context("deactivate grant")?;
        Ok(result.rows_affected > 0)
    }
}

fn grant_active_model(grant: &ManagerGrant) -> manager_grants::ActiveModel {
    manager_grants::ActiveModel {
        id: Set(grant.id),
        organizer_id: Set(grant.organizer_id),
        manager_user_id: Set(grant.manager_user_id),
        name: Set(grant.name.clone()),
        phone: Set(grant.phone.clone()),
        email: Set(grant.email.clone()),
        role_description: Set(grant.role_description.clone()),
        capabilities: Set(capabilities_to_json(&grant.capabilities)),
        is_active: Set(grant.is_active),
        is_verified: Set(grant.is_verified),
        created_at: Set(grant.created_at),
        updated_at: Set(grant.updated_at),
    }
}

fn grant_from_model(model: manager_grants::Model) -> Result<ManagerGrant, ArenaError> {
    Ok(ManagerGrant {
        id: model.id,
        organizer_id: model.organizer_id,
        manager_user_id: model.manager_user_id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        role_description: model.role_description,
        capabilities: capabilities_from_json(model.capabilities)?,
        is_active: model.is_active,
        is_verified: model.is_verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Invitation repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInvitationRepository {
    pub db: DatabaseConnection,
}

impl InvitationRepository for DbInvitationRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Invitation>, ArenaError> {
        let model = invitations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find invitation")?;
        model.map(invitation_from_model).transpose()
    }

    async fn create(&self, invitation: &Invitation, now: DateTime<Utc>) -> Result<(), ArenaError> {
        let organizer_id = invitation.organizer_id;
        let user_id = invitation.user_id;
        let model = invitations::ActiveModel {
            id: Set(invitation.id),
            organizer_id: Set(organizer_id),
            user_id: Set(user_id),
            capabilities: Set(capabilities_to_json(&invitation.capabilities)),
            role_description: Set(invitation.role_description.clone()),
            status: Set(invitation.status.as_str().to_owned()),
            created_at: Set(invitation.created_at),
            expires_at: Set(invitation.expires_at),
            responded_at: Set(invitation.responded_at),
        };
        self.db
            .transaction::<_, (), ArenaError>(|txn| {
                Box::pin(async move {
                    invitations::Entity::update_many()
                        .col_expr(
                            invitations::Column::Status,
                            Expr::value(InvitationStatus::Expired.as_str()),
                        )
                        .filter(invitations::Column::OrganizerId.eq(organizer_id))
                        .filter(invitations::Column::UserId.eq(user_id))
                        .filter(invitations::Column::Status.eq(InvitationStatus::Pending.as_str()))
                        .filter(invitations::Column::ExpiresAt.lte(now))
                        .exec(txn)
                        .await
                        .map_err(db_err("expire stale invitations"))?;
                    model.insert(txn).await.map_err(on_unique(
                        "uq_invitations_pending_pair",
                        ArenaError::InvitationPending,
                        "insert invitation",
                    ))?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn accept(
        &self,
        id: Uuid,
        grant: &ManagerGrant,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError> {
        let grant = grant_active_model(grant);
        self.db
            .transaction::<_, bool, ArenaError>(|txn| {
                Box::pin(async move {
                    let flipped = invitations::Entity::update_many()
                        .col_expr(
                            invitations::Column::Status,
                            Expr::value(InvitationStatus::Accepted.as_str()),
                        )
                        .col_expr(invitations::Column::RespondedAt, Expr::value(now))
                        .filter(invitations::Column::Id.eq(id))
                        .filter(invitations::Column::Status.eq(InvitationStatus::Pending.as_str()))
                        .filter(invitations::Column::ExpiresAt.gt(now))
                        .exec(txn)
                        .await
                        .map_err(db_err("accept invitation"))?;
                    if flipped.rows_affected == 0 {
                        return Ok(false);
                    }
                    grant.insert(txn).await.map_err(on_unique(
                        "uq_manager_grants_active_pair",
                        ArenaError::AlreadyManager,
                        "insert grant for invitation",
                    ))?;
                    Ok(true)
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn reject(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError> {
        let result = invitations::Entity::update_many()
            .col_expr(
                invitations::Column::Status,
                Expr::value(InvitationStatus::Rejected.as_str()),
            )
            .col_expr(invitations::Column::RespondedAt, Expr::value(now))
            .filter(invitations::Column::Id.eq(id))
            .filter(invitations::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("reject invitation")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Invitation>, ArenaError> {
        let models = invitations::Entity::find()
            .filter(invitations::Column::UserId.eq(user_id))
            .order_by_desc(invitations::Column::CreatedAt)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list invitations for user")?;
        models.into_iter().map(invitation_from_model).collect()
    }
}

fn invitation_from_model(model: invitations::Model) -> Result<Invitation, ArenaError> {
    let status = InvitationStatus::parse(&model.status)
        .with_context(|| format!("unknown invitation status: {}", model.status))?;
    Ok(Invitation {
        id: model.id,
        organizer_id: model.organizer_id,
        user_id: model.user_id,
        capabilities: capabilities_from_json(model.capabilities)?,
        role_description: model.role_description,
        status,
        created_at: model.created_at,
        expires_at: model.expires_at,
        responded_at: model.responded_at,
    })
}

// ── Venue repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVenueRepository {
    pub db: DatabaseConnection,
}

impl VenueRepository for DbVenueRepository {
    async fn create_venue(&self, venue: &Venue) -> Result<(), ArenaError> {
        venues::ActiveModel {
            id: Set(venue.id),
            owner_id: Set(venue.owner_id),
            name: Set(venue.name.clone()),
            city: Set(venue.city.clone()),
            opening_time: Set(venue.opening_time),
            closing_time: Set(venue.closing_time),
            price_per_hour_paise: Set(venue.price_per_hour_paise),
            peak_hour_price_paise: Set(venue.peak_hour_price_paise),
            weekend_price_paise: Set(venue.weekend_price_paise),
            total_bookings: Set(venue.total_bookings),
            is_active: Set(venue.is_active),
            created_at: Set(venue.created_at),
        }
        .insert(&self.db)
        .await
        .context("create venue")?;
        Ok(())
    }

    async fn find_venue(&self, id: Uuid) -> Result<Option<Venue>, ArenaError> {
        let model = venues::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find venue")?;
        Ok(model.map(venue_from_model))
    }

    async fn booked_start_times(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, ArenaError> {
        let times = bookings::Entity::find()
            .select_only()
            .column(bookings::Column::StartTime)
            .filter(bookings::Column::VenueId.eq(venue_id))
            .filter(bookings::Column::BookingDate.eq(date))
            .filter(bookings::Column::Status.is_in(LIVE_BOOKING_STATUSES))
            .into_tuple::<NaiveTime>()
            .all(&self.db)
            .await
            .context("list booked start times")?;
        Ok(times)
    }

    async fn create_booking(&self, booking: &Booking) -> Result<(), ArenaError> {
        let venue_id = booking.venue_id;
        let model = booking_active_model(booking)?;
        self.db
            .transaction::<_, (), ArenaError>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await.map_err(on_unique(
                        "uq_bookings_live_slot",
                        ArenaError::SlotTaken,
                        "insert booking",
                    ))?;
                    venues::Entity::update_many()
                        .col_expr(
                            venues::Column::TotalBookings,
                            Expr::col(venues::Column::TotalBookings).add(1),
                        )
                        .filter(venues::Column::Id.eq(venue_id))
                        .exec(txn)
                        .await
                        .map_err(db_err("bump venue booking count"))?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ArenaError> {
        let model = bookings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find booking")?;
        model.map(booking_from_model).transpose()
    }

    async fn cancel_booking(
        &self,
        id: Uuid,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError> {
        let result = bookings::Entity::update_many()
            .col_expr(
                bookings::Column::Status,
                Expr::value(BookingStatus::Cancelled.as_str()),
            )
            .col_expr(bookings::Column::CancelledAt, Expr::value(now))
            .col_expr(
                bookings::Column::CancellationReason,
                Expr::value(reason.map(str::to_owned)),
            )
            .col_expr(bookings::Column::UpdatedAt, Expr::value(now))
            .filter(bookings::Column::Id.eq(id))
            .filter(bookings::Column::Status.ne(BookingStatus::Cancelled.as_str()))
            .exec(&self.db)
            .await
            .context("cancel booking")?;
        Ok(result.rows_affected > 0)
    }

    async fn save_split(&self, id: Uuid, plan: &SplitPlan) -> Result<(), ArenaError> {
        let json = serde_json::to_value(plan).context("encode split plan")?;
        bookings::Entity::update_many()
            .col_expr(bookings::Column::SplitPayment, Expr::value(json))
            .col_expr(bookings::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(bookings::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("save split plan")?;
        Ok(())
    }

    async fn list_bookings_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Booking>, ArenaError> {
        let models = bookings::Entity::find()
            .filter(bookings::Column::UserId.eq(user_id))
            .order_by_desc(bookings::Column::CreatedAt)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list bookings by user")?;
        models.into_iter().map(booking_from_model).collect()
    }
}

fn venue_from_model(model: venues::Model) -> Venue {
    Venue {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        city: model.city,
        opening_time: model.opening_time,
        closing_time: model.closing_time,
        price_per_hour_paise: model.price_per_hour_paise,
        peak_hour_price_paise: model.peak_hour_price_paise,
        weekend_price_paise: model.weekend_price_paise,
        total_bookings: model.total_bookings,
        is_active: model.is_active,
        created_at: model.created_at,
    }
}

fn booking_active_model(booking: &Booking) -> Result<bookings::ActiveModel, ArenaError> {
    let split_payment = booking
        .split_payment
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .context("encode split plan")?;
    Ok(bookings::ActiveModel {
        id: Set(booking.id),
        booking_number: Set(booking.booking_number.clone()),
        venue_id: Set(booking.venue_id),
        user_id: Set(booking.user_id),
        sport_type: Set(booking.sport_type.clone()),
        booking_date: Set(booking.booking_date),
        start_time: Set(booking.start_time),
        end_time: Set(booking.end_time),
        duration_hours: Set(booking.duration_hours),
        player_count: Set(booking.player_count),
        team_name: Set(booking.team_name.clone()),
        contact_person: Set(booking.contact_person.clone()),
        contact_number: Set(booking.contact_number.clone()),
        special_requests: Set(booking.special_requests.clone()),
        price_per_hour_paise: Set(booking.price_per_hour_paise),
        total_amount_paise: Set(booking.total_amount_paise),
        status: Set(booking.status.as_str().to_owned()),
        payment_status: Set(booking.payment_status.clone()),
        split_payment: Set(split_payment),
        cancelled_at: Set(booking.cancelled_at),
        cancellation_reason: Set(booking.cancellation_reason.clone()),
        created_at: Set(booking.created_at),
        updated_at: Set(booking.updated_at),
    })
}

fn booking_from_model(model: bookings::Model) -> Result<Booking, ArenaError> {
    let status = BookingStatus::parse(&model.status)
        .with_context(|| format!("unknown booking status: {}", model.status))?;
    let split_payment = model
        .split_payment
        .map(serde_json::from_value::<SplitPlan>)
        .transpose()
        .context("decode split plan")?;
    Ok(Booking {
        id: model.id,
        booking_number: model.booking_number,
        venue_id: model.venue_id,
        user_id: model.user_id,
        sport_type: model.sport_type,
        booking_date: model.booking_date,
        start_time: model.start_time,
        end_time: model.end_time,
        duration_hours: model.duration_hours,
        player_count: model.player_count,
        team_name: model.team_name,
        contact_person: model.contact_person,
        contact_number: model.contact_number,
        special_requests: model.special_requests,
        price_per_hour_paise: model.price_per_hour_paise,
        total_amount_paise: model.total_amount_paise,
        status,
        payment_status: model.payment_status,
        split_payment,
        cancelled_at: model.cancelled_at,
        cancellation_reason: model.cancellation_reason,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Professional repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfessionalRepository {
    pub db: DatabaseConnection,
}

impl ProfessionalRepository for DbProfessionalRepository {
    async fn create_availability(
        &self,
        availability: &ProfessionalAvailability,
    ) -> Result<(), ArenaError> {
        professional_availability::ActiveModel {
            id: Set(availability.id),
            professional_id: Set(availability.professional_id),
            sport_type: Set(availability.sport_type.clone()),
            per_match_fee_paise: Set(availability.per_match_fee_paise),
            currency: Set(availability.currency.clone()),
            can_play: Set(availability.can_play),
            can_coach: Set(availability.can_coach),
            can_umpire: Set(availability.can_umpire),
            is_active: Set(availability.is_active),
            total_bookings: Set(availability.total_bookings),
            created_at: Set(availability.created_at),
            updated_at: Set(availability.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create availability")?;
        Ok(())
    }

    async fn find_availability(
        &self,
        id: Uuid,
    ) -> Result<Option<ProfessionalAvailability>, ArenaError> {
        let model = professional_availability::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find availability")?;
        Ok(model.map(availability_from_model))
    }

    async fn create_booking(&self, booking: &ProfessionalBooking) -> Result<(), ArenaError> {
        let availability_id = booking.availability_id;
        let model = professional_bookings::ActiveModel {
            id: Set(booking.id),
            booking_number: Set(booking.booking_number.clone()),
            availability_id: Set(availability_id),
            professional_id: Set(booking.professional_id),
            booked_by: Set(booking.booked_by),
            tournament_id: Set(booking.tournament_id),
            role: Set(booking.role.as_str().to_owned()),
            match_date: Set(booking.match_date),
            notes: Set(booking.notes.clone()),
            per_match_fee_paise: Set(booking.per_match_fee_paise),
            currency: Set(booking.currency.clone()),
            status: Set(booking.status.as_str().to_owned()),
            payment_status: Set(booking.payment_status.clone()),
            cancelled_at: Set(booking.cancelled_at),
            created_at: Set(booking.created_at),
            updated_at: Set(booking.updated_at),
        };
        self.db
            .transaction::<_, (), ArenaError>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await.map_err(on_unique(
                        "uq_professional_bookings_live_umpire",
                        ArenaError::AlreadyBooked,
                        "insert professional booking",
                    ))?;
                    professional_availability::Entity::update_many()
                        .col_expr(
                            professional_availability::Column::TotalBookings,
                            Expr::col(professional_availability::Column::TotalBookings).add(1),
                        )
                        .filter(professional_availability::Column::Id.eq(availability_id))
                        .exec(txn)
                        .await
                        .map_err(db_err("bump availability booking count"))?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<ProfessionalBooking>, ArenaError> {
        let model = professional_bookings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find professional booking")?;
        model.map(professional_booking_from_model).transpose()
    }

    async fn find_live_booking(
        &self,
        tournament_id: Uuid,
        availability_id: Uuid,
        role: &str,
    ) -> Result<Option<ProfessionalBooking>, ArenaError> {
        let model = professional_bookings::Entity::find()
            .filter(professional_bookings::Column::TournamentId.eq(tournament_id))
            .filter(professional_bookings::Column::AvailabilityId.eq(availability_id))
            .filter(professional_bookings::Column::Role.eq(role))
            .filter(professional_bookings::Column::Status.is_in(LIVE_PROFESSIONAL_STATUSES))
            .one(&self.db)
            .await
            .context("find live professional booking")?;
        model.map(professional_booking_from_model).transpose()
    }

    async fn cancel_booking(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, ArenaError> {
        let cancelled = ProfessionalBookingStatus::Cancelled.as_str();
        let result = professional_bookings::Entity::update_many()
            .col_expr(professional_bookings::Column::Status, Expr::value(cancelled))
            .col_expr(professional_bookings::Column::CancelledAt, Expr::value(now))
            .col_expr(professional_bookings::Column::UpdatedAt, Expr::value(now))
            .filter(professional_bookings::Column::Id.eq(id))
            .filter(professional_bookings::Column::Status.ne(cancelled))
            .exec(&self.db)
            .await
            .context("cancel professional booking")?;
        Ok(result.rows_affected > 0)
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: ProfessionalBookingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, ArenaError> {
        let cancelled = ProfessionalBookingStatus::Cancelled.as_str();
        let result = professional_bookings::Entity::update_many()
            .col_expr(
                professional_bookings::Column::Status,
                Expr::value(status.as_str()),
            )
            .col_expr(professional_bookings::Column::UpdatedAt, Expr::value(now))
            .filter(professional_bookings::Column::Id.eq(id))
            .filter(professional_bookings::Column::Status.ne(cancelled))
            .exec(&self.db)
            .await
            .map_err(on_unique(
                "uq_professional_bookings_live_umpire",
                ArenaError::AlreadyBooked,
                "update professional booking status",
            ))?;
        Ok(result.rows_affected > 0)
    }

    async fn list_bookings(
        &self,
        user_id: Uuid,
        party: BookingParty,
        page: PageRequest,
    ) -> Result<Vec<ProfessionalBooking>, ArenaError> {
        let column = match party {
            BookingParty::Professional => professional_bookings::Column::ProfessionalId,
            BookingParty::Booker => professional_bookings::Column::BookedBy,
        };
        let models = professional_bookings::Entity::find()
            .filter(column.eq(user_id))
            .order_by_asc(professional_bookings::Column::MatchDate)
            .order_by_asc(professional_bookings::Column::CreatedAt)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list professional bookings")?;
        models
            .into_iter()
            .map(professional_booking_from_model)
            .collect()
    }
}

fn availability_from_model(model: professional_availability::Model) -> ProfessionalAvailability {
    ProfessionalAvailability {
        id: model.id,
        professional_id: model.professional_id,
        sport_type: model.sport_type,
        per_match_fee_paise: model.per_match_fee_paise,
        currency: model.currency,
        can_play: model.can_play,
        can_coach: model.can_coach,
        can_umpire: model.can_umpire,
        is_active: model.is_active,
        total_bookings: model.total_bookings,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn professional_booking_from_model(
    model: professional_bookings::Model,
) -> Result<ProfessionalBooking, ArenaError> {
    let role = ProfessionalRole::parse(&model.role)
        .with_context(|| format!("unknown professional role: {}", model.role))?;
    let status = ProfessionalBookingStatus::parse(&model.status)
        .with_context(|| format!("unknown professional booking status: {}", model.status))?;
    Ok(ProfessionalBooking {
        id: model.id,
        booking_number: model.booking_number,
        availability_id: model.availability_id,
        professional_id: model.professional_id,
        booked_by: model.booked_by,
        tournament_id: model.tournament_id,
        role,
        match_date: model.match_date,
        notes: model.notes,
        per_match_fee_paise: model.per_match_fee_paise,
        currency: model.currency,
        status,
        payment_status: model.payment_status,
        cancelled_at: model.cancelled_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Tournament repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTournamentRepository {
    pub db: DatabaseConnection,
}

impl TournamentRepository for DbTournamentRepository {
    async fn create(&self, tournament: &Tournament) -> Result<(), ArenaError> {
        tournaments::ActiveModel {
            id: Set(tournament.id),
            name: Set(tournament.name.clone()),
            description: Set(tournament.description.clone()),
            sport_type: Set(tournament.sport_type.clone()),
            city: Set(tournament.city.clone()),
            organizer_id: Set(tournament.organizer_id),
            created_by: Set(tournament.created_by),
            created_by_manager: Set(tournament.created_by_manager),
            max_teams: Set(tournament.max_teams),
            current_teams: Set(tournament.current_teams),
            entry_fee_paise: Set(tournament.entry_fee_paise),
            start_date: Set(tournament.start_date),
            registration_deadline: Set(tournament.registration_deadline),
            status: Set(tournament.status.clone()),
            is_active: Set(tournament.is_active),
            created_at: Set(tournament.created_at),
            updated_at: Set(tournament.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create tournament")?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Tournament>, ArenaError> {
        let model = tournaments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tournament")?;
        Ok(model.map(tournament_from_model))
    }

    async fn update(&self, tournament: &Tournament) -> Result<bool, ArenaError> {
        // `current_teams` is only ever moved by `register`.
        let result = tournaments::Entity::update_many()
            .col_expr(tournaments::Column::Name, Expr::value(tournament.name.clone()))
            .col_expr(
                tournaments::Column::Description,
                Expr::value(tournament.description.clone()),
            )
            .col_expr(tournaments::Column::Status, Expr::value(tournament.status.clone()))
            .col_expr(tournaments::Column::MaxTeams, Expr::value(tournament.max_teams))
            .col_expr(
                tournaments::Column::RegistrationDeadline,
                Expr::value(tournament.registration_deadline),
            )
            .col_expr(tournaments::Column::UpdatedAt, Expr::value(tournament.updated_at))
            .filter(tournaments::Column::Id.eq(tournament.id))
            .filter(tournaments::Column::CurrentTeams.lte(tournament.max_teams))
            .exec(&self.db)
            .await
            .context("update tournament")?;
        Ok(result.rows_affected > 0)
    }

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), ArenaError> {
        tournaments::Entity::update_many()
            .col_expr(tournaments::Column::IsActive, Expr::value(false))
            .col_expr(tournaments::Column::UpdatedAt, Expr::value(now))
            .filter(tournaments::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("deactivate tournament")?;
        Ok(())
    }

    async fn create_team(&self, team: &Team) -> Result<(), ArenaError> {
        teams::ActiveModel {
            id: Set(team.id),
            name: Set(team.name.clone()),
            sport_type: Set(team.sport_type.clone()),
            city: Set(team.city.clone()),
            captain_id: Set(team.captain_id),
            is_active: Set(team.is_active),
            created_at: Set(team.created_at),
        }
        .insert(&self.db)
        .await
        .context("create team")?;
        Ok(())
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<Team>, ArenaError> {
        let model = teams::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find team")?;
        Ok(model.map(|m| Team {
            id: m.id,
            name: m.name,
            sport_type: m.sport_type,
            city: m.city,
            captain_id: m.captain_id,
            is_active: m.is_active,
            created_at: m.created_at,
        }))
    }

    async fn register(&self, registration: &Registration) -> Result<(), ArenaError> {
        let tournament_id = registration.tournament_id;
        let now = registration.created_at;
        let model = tournament_registrations::ActiveModel {
            id: Set(registration.id),
            registration_number: Set(registration.registration_number.clone()),
            tournament_id: Set(tournament_id),
            team_id: Set(registration.team_id),
            registered_by: Set(registration.registered_by),
            captain_name: Set(registration.captain_name.clone()),
            captain_contact: Set(registration.captain_contact.clone()),
            entry_fee_paise: Set(registration.entry_fee_paise),
            payment_status: Set(registration.payment_status.clone()),
            status: Set(registration.status.clone()),
            created_at: Set(registration.created_at),
        };
        self.db
            .transaction::<_, (), ArenaError>(|txn| {
                Box::pin(async move {
                    let claimed = tournaments::Entity::update_many()
                        .col_expr(
                            tournaments::Column::CurrentTeams,
                            Expr::col(tournaments::Column::CurrentTeams).add(1),
                        )
                        .col_expr(tournaments::Column::UpdatedAt, Expr::value(now))
                        .filter(tournaments::Column::Id.eq(tournament_id))
                        .filter(
                            Expr::col(tournaments::Column::CurrentTeams)
                                .lt(Expr::col(tournaments::Column::MaxTeams)),
                        )
                        .exec(txn)
                        .await
                        .map_err(db_err("claim tournament slot"))?;
                    if claimed.rows_affected == 0 {
                        return Err(ArenaError::TournamentFull);
                    }
                    model.insert(txn).await.map_err(on_unique(
                        "uq_tournament_registrations_team",
                        ArenaError::AlreadyRegistered,
                        "insert registration",
                    ))?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    async fn list_registrations(
        &self,
        tournament_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Registration>, ArenaError> {
        let models = tournament_registrations::Entity::find()
            .filter(tournament_registrations::Column::TournamentId.eq(tournament_id))
            .order_by_asc(tournament_registrations::Column::CreatedAt)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list registrations")?;
        Ok(models
            .into_iter()
            .map(|m| Registration {
                id: m.id,
                registration_number: m.registration_number,
                tournament_id: m.tournament_id,
                team_id: m.team_id,
                registered_by: m.registered_by,
                captain_name: m.captain_name,
                captain_contact: m.captain_contact,
                entry_fee_paise: m.entry_fee_paise,
                payment_status: m.payment_status,
                status: m.status,
                created_at: m.created_at,
            })
            .collect())
    }
}

fn tournament_from_model(model: tournaments::Model) -> Tournament {
    Tournament {
        id: model.id,
        name: model.name,
        description: model.description,
        sport_type: model.sport_type,
        city: model.city,
        organizer_id: model.organizer_id,
        created_by: model.created_by,
        created_by_manager: model.created_by_manager,
        max_teams: model.max_teams,
        current_teams: model.current_teams,
        entry_fee_paise: model.entry_fee_paise,
        start_date: model.start_date,
        registration_deadline: model.registration_deadline,
        status: model.status,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
