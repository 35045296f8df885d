pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_delegation;
mod m20260301_000003_create_venues_and_bookings;
mod m20260301_000004_create_professionals;
mod m20260301_000005_create_tournaments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_delegation::Migration),
            Box::new(m20260301_000003_create_venues_and_bookings::Migration),
            Box::new(m20260301_000004_create_professionals::Migration),
            Box::new(m20260301_000005_create_tournaments::Migration),
        ]
    }
}
