//! Service plumbing shared by courtside services: configuration, tracing,
//! request-id middleware, health probes and the error taxonomy.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
