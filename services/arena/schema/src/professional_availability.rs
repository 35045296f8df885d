use sea_orm::entity::prelude::*;

/// A professional's bookable offer (per-match fee, roles they take on).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "professional_availability")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub professional_id: Uuid,
    pub sport_type: String,
    pub per_match_fee_paise: i64,
    pub currency: String,
    pub can_play: bool,
    pub can_coach: bool,
    pub can_umpire: bool,
    pub is_active: bool,
    pub total_bookings: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::professional_bookings::Entity")]
    Bookings,
}

impl Related<super::professional_bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
