use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Venues::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Venues::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Venues::Name).string().not_null())
                    .col(ColumnDef::new(Venues::City).string().not_null())
                    .col(ColumnDef::new(Venues::OpeningTime).time().not_null())
                    .col(ColumnDef::new(Venues::ClosingTime).time().not_null())
                    .col(
                        ColumnDef::new(Venues::PricePerHourPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Venues::PeakHourPricePaise).big_integer())
                    .col(ColumnDef::new(Venues::WeekendPricePaise).big_integer())
                    .col(
                        ColumnDef::new(Venues::TotalBookings)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Venues::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Venues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Venues::Table, Venues::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::BookingNumber).string().not_null())
                    .col(ColumnDef::new(Bookings::VenueId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::SportType).string().not_null())
                    .col(ColumnDef::new(Bookings::BookingDate).date().not_null())
                    .col(ColumnDef::new(Bookings::StartTime).time().not_null())
                    .col(ColumnDef::new(Bookings::EndTime).time().not_null())
                    .col(ColumnDef::new(Bookings::DurationHours).integer().not_null())
                    .col(ColumnDef::new(Bookings::PlayerCount).integer())
                    .col(ColumnDef::new(Bookings::TeamName).string())
                    .col(ColumnDef::new(Bookings::ContactPerson).string().not_null())
                    .col(ColumnDef::new(Bookings::ContactNumber).string().not_null())
                    .col(ColumnDef::new(Bookings::SpecialRequests).text())
                    .col(
                        ColumnDef::new(Bookings::PricePerHourPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TotalAmountPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Bookings::SplitPayment).json_binary())
                    .col(ColumnDef::new(Bookings::CancelledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Bookings::CancellationReason).text())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bookings::Table, Bookings::VenueId)
                            .to(Venues::Table, Venues::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::CreatedAt)
                    .name("idx_bookings_user_id_created_at")
                    .to_owned(),
            )
            .await?;

        // Double-booking guard: one live claim per slot.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_bookings_live_slot \
                 ON bookings (venue_id, booking_date, start_time) \
                 WHERE status IN ('confirmed', 'pending')",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Venues {
    Table,
    Id,
    OwnerId,
    Name,
    City,
    OpeningTime,
    ClosingTime,
    PricePerHourPaise,
    PeakHourPricePaise,
    WeekendPricePaise,
    TotalBookings,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    BookingNumber,
    VenueId,
    UserId,
    SportType,
    BookingDate,
    StartTime,
    EndTime,
    DurationHours,
    PlayerCount,
    TeamName,
    ContactPerson,
    ContactNumber,
    SpecialRequests,
    PricePerHourPaise,
    TotalAmountPaise,
    Status,
    PaymentStatus,
    SplitPayment,
    CancelledAt,
    CancellationReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
