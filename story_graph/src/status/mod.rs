//! Status module - the named integer state of a story.
//!
//! Both the status table and decision effects keep insertion order, so iterating them (and
//! therefore exporting them) is deterministic.

mod update;

pub use update::*;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryError};

/// Mapping from status name to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTable {
    entries: Vec<(String, i64)>,
}

impl StatusTable {
    /// Create an empty status table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a status.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.position(name).map(|i| self.entries[i].1)
    }

    /// Check if the table holds a status.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert a status, or replace its value in place if it exists.
    ///
    /// Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: i64) -> Option<i64> {
        let name = name.into();
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove a status, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<i64> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Apply an update to an existing status and return its new value.
    pub fn apply(&mut self, name: &str, update: StatusUpdate) -> Result<i64> {
        let i = self
            .position(name)
            .ok_or_else(|| StoryError::UnknownStatus(name.to_string()))?;
        let value = update.apply(self.entries[i].1);
        self.entries[i].1 = value;
        Ok(value)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for StatusTable {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut table = StatusTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

/// The consequences of a decision: status name to update, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Effects {
    entries: Vec<(String, StatusUpdate)>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect. A second effect on the same status replaces the first in place.
    pub fn insert(&mut self, name: impl Into<String>, update: StatusUpdate) -> Option<StatusUpdate> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, update)),
            None => {
                self.entries.push((name, update));
                None
            }
        }
    }

    /// Builder-style variant of [`Effects::insert`].
    pub fn with(mut self, name: impl Into<String>, update: StatusUpdate) -> Self {
        self.insert(name, update);
        self
    }

    pub fn get(&self, name: &str) -> Option<StatusUpdate> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, update)| *update)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, StatusUpdate)> {
        self.entries.iter().map(|(name, update)| (name.as_str(), *update))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every effect to the table.
    ///
    /// All names are checked before anything is written, so a missing status leaves the table
    /// untouched.
    pub fn apply_to(&self, statuses: &mut StatusTable) -> Result<()> {
        if let Some(missing) = self.names().find(|name| !statuses.contains(name)) {
            return Err(StoryError::UnknownStatus(missing.to_string()));
        }
        for (name, update) in self.iter() {
            statuses.apply(name, update)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, StatusUpdate)> for Effects {
    fn from_iter<I: IntoIterator<Item = (S, StatusUpdate)>>(iter: I) -> Self {
        let mut effects = Effects::new();
        for (name, update) in iter {
            effects.insert(name, update);
        }
        effects
    }
}
