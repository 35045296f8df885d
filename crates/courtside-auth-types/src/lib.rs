//! Auth types shared across courtside services.
//!
//! Bearer-token minting/validation and `Authorization` header parsing.

pub mod bearer;
pub mod token;
