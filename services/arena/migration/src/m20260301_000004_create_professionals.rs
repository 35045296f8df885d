use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfessionalAvailability::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfessionalAvailability::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::ProfessionalId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::SportType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::PerMatchFeePaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::Currency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::CanPlay)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::CanCoach)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::CanUmpire)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::TotalBookings)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalAvailability::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ProfessionalAvailability::Table,
                                ProfessionalAvailability::ProfessionalId,
                            )
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfessionalBookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfessionalBookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::BookingNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::AvailabilityId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::ProfessionalId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::BookedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProfessionalBookings::TournamentId).uuid())
                    .col(ColumnDef::new(ProfessionalBookings::Role).string().not_null())
                    .col(ColumnDef::new(ProfessionalBookings::MatchDate).date())
                    .col(ColumnDef::new(ProfessionalBookings::Notes).text())
                    .col(
                        ColumnDef::new(ProfessionalBookings::PerMatchFeePaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::Currency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::PaymentStatus)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::CancelledAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfessionalBookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ProfessionalBookings::Table,
                                ProfessionalBookings::AvailabilityId,
                            )
                            .to(ProfessionalAvailability::Table, ProfessionalAvailability::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One live umpire booking per (tournament, professional). Other roles are unguarded.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_professional_bookings_live_umpire \
                 ON professional_bookings (tournament_id, availability_id) \
                 WHERE role = 'Umpire' AND tournament_id IS NOT NULL \
                 AND status IN ('confirmed', 'accepted')",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfessionalBookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfessionalAvailability::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProfessionalAvailability {
    Table,
    Id,
    ProfessionalId,
    SportType,
    PerMatchFeePaise,
    Currency,
    CanPlay,
    CanCoach,
    CanUmpire,
    IsActive,
    TotalBookings,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProfessionalBookings {
    Table,
    Id,
    BookingNumber,
    AvailabilityId,
    ProfessionalId,
    BookedBy,
    TournamentId,
    Role,
    MatchDate,
    Notes,
    PerMatchFeePaise,
    Currency,
    Status,
    PaymentStatus,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
