//! Identifier types for agents and table keys.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Canonical string encoding of a perceived state.
///
/// Produced by [`crate::perception::codec::encode`]. Two states that agree on
/// position, walls, doors and exit always map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    /// Wrap an already encoded state string.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridnav::identifiers::StateKey;
    ///
    /// let key = StateKey::new("SelfPosition: (1, 1)~ NearbyAgents: []~ Walls: []~ Doors: []~ Exit: ");
    /// assert!(key.as_str().starts_with("SelfPosition"));
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the key into its inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for StateKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Key of a single Q-table entry: an encoded state and a destination cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateActionKey {
    pub state: StateKey,
    pub action: Position,
}

impl StateActionKey {
    pub fn new(state: StateKey, action: Position) -> Self {
        Self { state, action }
    }
}

impl fmt::Display for StateActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.state, self.action)
    }
}

/// Identifier of a navigation agent within one simulation run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct AgentId(u64);

impl AgentId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for AgentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}
