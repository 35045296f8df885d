//! Domain types shared across courtside crates.
//!
//! Pure types with no framework dependencies: phone numbers, user roles,
//! delegation capabilities and pagination.

pub mod capability;
pub mod pagination;
pub mod phone;
pub mod user;
