//! sea-orm entities for the arena service.

pub mod bookings;
pub mod invitations;
pub mod manager_grants;
pub mod professional_availability;
pub mod professional_bookings;
pub mod teams;
pub mod tournament_registrations;
pub mod tournaments;
pub mod users;
pub mod venues;
