//! Offset pagination shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Upper bound for `limit` on any list endpoint.
pub const MAX_LIMIT: u64 = 100;

/// Offset pagination parameters taken from the query string.
///
/// - `skip`: rows to skip, default 0
/// - `limit`: 1–100, default 50
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Clamp `limit` into 1–100. Call after deserializing from query params.
    pub fn clamped(self) -> Self {
        Self {
            skip: self.skip,
            limit: self.limit.clamp(1, MAX_LIMIT),
        }
    }
}
