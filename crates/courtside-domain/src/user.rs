//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a user picks during onboarding.
///
/// Wire and storage format: lowercase string (`"player"`, `"organizer"`, ...).
/// A user may have no role yet (onboarding incomplete); that is modelled as
/// `Option<UserRole>` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Player,
    Parent,
    Professional,
    Organizer,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Parent => "parent",
            Self::Professional => "professional",
            Self::Organizer => "organizer",
        }
    }

    /// Organizers own tournaments and may delegate to managers.
    pub fn is_organizer(self) -> bool {
        matches!(self, Self::Organizer)
    }

    /// Roles allowed to publish professional availability.
    pub fn can_offer_services(self) -> bool {
        matches!(self, Self::Professional | Self::Player)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "player" => Ok(Self::Player),
            "parent" => Ok(Self::Parent),
            "professional" => Ok(Self::Professional),
            "organizer" => Ok(Self::Organizer),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}
