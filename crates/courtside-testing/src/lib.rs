//! Test utilities for courtside services.
//!
//! Import in `#[cfg(test)]` blocks or `tests/` only, never in production code.

pub mod auth;
