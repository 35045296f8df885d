use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tournaments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tournaments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tournaments::Name).string().not_null())
                    .col(ColumnDef::new(Tournaments::Description).text())
                    .col(ColumnDef::new(Tournaments::SportType).string().not_null())
                    .col(ColumnDef::new(Tournaments::City).string().not_null())
                    .col(ColumnDef::new(Tournaments::OrganizerId).uuid().not_null())
                    .col(ColumnDef::new(Tournaments::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Tournaments::CreatedByManager)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tournaments::MaxTeams).integer().not_null())
                    .col(
                        ColumnDef::new(Tournaments::CurrentTeams)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tournaments::EntryFeePaise)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tournaments::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::RegistrationDeadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Tournaments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Tournaments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Tournaments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(
                        Expr::col(Tournaments::CurrentTeams)
                            .lte(Expr::col(Tournaments::MaxTeams))
                            .and(Expr::col(Tournaments::CurrentTeams).gte(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tournaments::Table, Tournaments::OrganizerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Tournaments::Table)
                    .col(Tournaments::OrganizerId)
                    .name("idx_tournaments_organizer_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teams::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .col(ColumnDef::new(Teams::SportType).string().not_null())
                    .col(ColumnDef::new(Teams::City).string().not_null())
                    .col(ColumnDef::new(Teams::CaptainId).uuid().not_null())
                    .col(
                        ColumnDef::new(Teams::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Teams::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teams::Table, Teams::CaptainId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TournamentRegistrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TournamentRegistrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::RegistrationNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::TournamentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::TeamId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::RegisteredBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::CaptainName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::CaptainContact)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::EntryFeePaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::PaymentStatus)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TournamentRegistrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                TournamentRegistrations::Table,
                                TournamentRegistrations::TournamentId,
                            )
                            .to(Tournaments::Table, Tournaments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                TournamentRegistrations::Table,
                                TournamentRegistrations::TeamId,
                            )
                            .to(Teams::Table, Teams::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(TournamentRegistrations::Table)
                    .col(TournamentRegistrations::TournamentId)
                    .col(TournamentRegistrations::TeamId)
                    .unique()
                    .name("uq_tournament_registrations_team")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TournamentRegistrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tournaments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tournaments {
    Table,
    Id,
    Name,
    Description,
    SportType,
    City,
    OrganizerId,
    CreatedBy,
    CreatedByManager,
    MaxTeams,
    CurrentTeams,
    EntryFeePaise,
    StartDate,
    RegistrationDeadline,
    Status,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Teams {
    Table,
    Id,
    Name,
    SportType,
    City,
    CaptainId,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum TournamentRegistrations {
    Table,
    Id,
    RegistrationNumber,
    TournamentId,
    TeamId,
    RegisteredBy,
    CaptainName,
    CaptainContact,
    EntryFeePaise,
    PaymentStatus,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
