//! Capabilities a manager grant can carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named permission checked by the authorization gate.
///
/// Wire format: snake_case string (`"edit_tournament"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreateTournament,
    EditTournament,
    ViewRegistrations,
    ManageTeam,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Self::CreateTournament,
        Self::EditTournament,
        Self::ViewRegistrations,
        Self::ManageTeam,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateTournament => "create_tournament",
            Self::EditTournament => "edit_tournament",
            Self::ViewRegistrations => "view_registrations",
            Self::ManageTeam => "manage_team",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_owned()))
    }
}

/// Ordered, duplicate-free set of capabilities.
///
/// Insertion order is preserved so grants echo back exactly what the
/// organizer submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Every capability; what an organizer holds over their own resources.
    pub fn full() -> Self {
        Self(Capability::ALL.to_vec())
    }

    /// Applied when an organizer enrolls a manager without listing capabilities.
    pub fn delegate_default() -> Self {
        Self(vec![
            Capability::CreateTournament,
            Capability::EditTournament,
            Capability::ViewRegistrations,
        ])
    }

    pub fn insert(&mut self, capability: Capability) {
        if !self.0.contains(&capability) {
            self.0.push(capability);
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn is_superset_of(&self, other: &CapabilitySet) -> bool {
        other.iter().all(|c| self.contains(c))
    }

    /// Storage form: list of capability strings.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|c| c.as_str().to_owned()).collect()
    }

    /// Parse a list of capability strings, dropping duplicates.
    pub fn parse_all<I, S>(raw: I) -> Result<Self, UnknownCapability>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(|s| s.as_ref().parse::<Capability>())
            .collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        let mut set = Self::empty();
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Self::parse_all(raw).map_err(serde::de::Error::custom)
    }
}
