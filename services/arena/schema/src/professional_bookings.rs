use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "professional_bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_number: String,
    pub availability_id: Uuid,
    pub professional_id: Uuid,
    pub booked_by: Uuid,
    pub tournament_id: Option<Uuid>,
    /// `Umpire`, `Player`, `Coach` or `Trainer`.
    pub role: String,
    pub match_date: Option<Date>,
    pub notes: Option<String>,
    pub per_match_fee_paise: i64,
    pub currency: String,
    pub status: String,
    pub payment_status: String,
    pub cancelled_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::professional_availability::Entity",
        from = "Column::AvailabilityId",
        to = "super::professional_availability::Column::Id"
    )]
    Availability,
}

impl Related<super::professional_availability::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Availability.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
