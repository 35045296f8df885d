pub mod auth;
pub mod extract;
pub mod health;
pub mod organizer_team;
pub mod professionals;
pub mod tournaments;
pub mod venues;
