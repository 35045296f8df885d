use sea_orm::entity::prelude::*;

/// Claim on a `(venue, date, start_time)` slot.
///
/// Live claims (`confirmed`, `pending`) are unique per slot via a partial index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_number: String,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    pub sport_type: String,
    pub booking_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub duration_hours: i32,
    pub player_count: Option<i32>,
    pub team_name: Option<String>,
    pub contact_person: String,
    pub contact_number: String,
    pub special_requests: Option<String>,
    pub price_per_hour_paise: i64,
    pub total_amount_paise: i64,
    pub status: String,
    pub payment_status: String,
    /// Serialized split plan, set once the booker splits the bill.
    pub split_payment: Option<Json>,
    pub cancelled_at: Option<DateTimeUtc>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::venues::Entity",
        from = "Column::VenueId",
        to = "super::venues::Column::Id"
    )]
    Venue,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::venues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venue.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
