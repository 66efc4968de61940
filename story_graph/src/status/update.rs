//! Status updates - pure transforms of a single status value.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StoryError;

/// A function object that maps the old value of a status to its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusUpdate {
    /// Adds to the status (the increment may be negative).
    Add(i64),
    /// Replaces the status outright.
    Set(i64),
}

impl StatusUpdate {
    pub const ADD_TAG: &'static str = "ADD";
    pub const SET_TAG: &'static str = "SET";

    /// Build an update from its type tag and operand.
    pub fn from_parts(tag: &str, operand: i64) -> Option<Self> {
        match tag {
            Self::ADD_TAG => Some(StatusUpdate::Add(operand)),
            Self::SET_TAG => Some(StatusUpdate::Set(operand)),
            _ => None,
        }
    }

    /// Compute the new value of a status.
    pub fn apply(&self, old: i64) -> i64 {
        match self {
            StatusUpdate::Add(increment) => old.saturating_add(*increment),
            StatusUpdate::Set(value) => *value,
        }
    }

    /// The type tag used in the text encoding.
    pub fn tag(&self) -> &'static str {
        match self {
            StatusUpdate::Add(_) => Self::ADD_TAG,
            StatusUpdate::Set(_) => Self::SET_TAG,
        }
    }

    pub fn operand(&self) -> i64 {
        match self {
            StatusUpdate::Add(n) | StatusUpdate::Set(n) => *n,
        }
    }

    /// Canonical encoding: `ADD <n>` or `SET <n>`.
    pub fn encode(&self) -> String {
        format!("{} {}", self.tag(), self.operand())
    }
}

impl std::fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tag(), self.operand())
    }
}

impl FromStr for StatusUpdate {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StoryError::InvalidStatusUpdate(s.to_string());
        let mut parts = s.split_whitespace();
        let (Some(tag), Some(operand), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let operand = operand.parse::<i64>().map_err(|_| invalid())?;
        Self::from_parts(tag, operand).ok_or_else(invalid)
    }
}
