pub mod identity;
pub mod invitation;
pub mod otp;
pub mod permission;
pub mod pricing;
pub mod professional;
pub mod registration;
pub mod token;
pub mod tournament;
pub mod venue;
