use sea_orm::entity::prelude::*;

/// Tournament owned by an organizer. `current_teams <= max_teams` is a table CHECK.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tournaments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sport_type: String,
    pub city: String,
    /// Principal owner; a delegate creating on an organizer's behalf stamps the organizer here.
    pub organizer_id: Uuid,
    /// Account that actually performed the create.
    pub created_by: Uuid,
    pub created_by_manager: bool,
    pub max_teams: i32,
    pub current_teams: i32,
    pub entry_fee_paise: i64,
    pub start_date: DateTimeUtc,
    pub registration_deadline: DateTimeUtc,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tournament_registrations::Entity")]
    Registrations,
}

impl Related<super::tournament_registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
