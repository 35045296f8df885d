use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ManagerGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ManagerGrants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ManagerGrants::OrganizerId).uuid().not_null())
                    .col(ColumnDef::new(ManagerGrants::ManagerUserId).uuid())
                    .col(ColumnDef::new(ManagerGrants::Name).string())
                    .col(ColumnDef::new(ManagerGrants::Phone).string())
                    .col(ColumnDef::new(ManagerGrants::Email).string())
                    .col(ColumnDef::new(ManagerGrants::RoleDescription).string())
                    .col(
                        ColumnDef::new(ManagerGrants::Capabilities)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManagerGrants::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ManagerGrants::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ManagerGrants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManagerGrants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ManagerGrants::Table, ManagerGrants::OrganizerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ManagerGrants::Table)
                    .col(ManagerGrants::ManagerUserId)
                    .name("idx_manager_grants_manager_user_id")
                    .to_owned(),
            )
            .await?;

        // sea-query's index builder has no WHERE clause; partial indexes go in raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_manager_grants_active_pair \
                 ON manager_grants (organizer_id, manager_user_id) WHERE is_active",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invitations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invitations::OrganizerId).uuid().not_null())
                    .col(ColumnDef::new(Invitations::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Invitations::Capabilities)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invitations::RoleDescription).string())
                    .col(ColumnDef::new(Invitations::Status).string().not_null())
                    .col(
                        ColumnDef::new(Invitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invitations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invitations::RespondedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invitations::Table, Invitations::OrganizerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invitations::Table, Invitations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Invitations::Table)
                    .col(Invitations::UserId)
                    .name("idx_invitations_user_id")
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_invitations_pending_pair \
                 ON invitations (organizer_id, user_id) WHERE status = 'pending'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invitations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ManagerGrants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ManagerGrants {
    Table,
    Id,
    OrganizerId,
    ManagerUserId,
    Name,
    Phone,
    Email,
    RoleDescription,
    Capabilities,
    IsActive,
    IsVerified,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Invitations {
    Table,
    Id,
    OrganizerId,
    UserId,
    Capabilities,
    RoleDescription,
    Status,
    CreatedAt,
    ExpiresAt,
    RespondedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
