//! Outcome determiners - strategies that pick a successor choice from the status table.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryError};
use crate::graph::ChoiceId;
use crate::status::StatusTable;

/// Picks one of several possible outcomes based on the current statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeDeterminer {
    /// `below` when the dependency is under the threshold, `meets` otherwise.
    TwoThreshold {
        dependency: String,
        threshold: i64,
        below: ChoiceId,
        meets: ChoiceId,
    },
}

impl OutcomeDeterminer {
    pub const TWO_THRESHOLD_TAG: &'static str = "TWOTHRESHOLD";

    /// Create a two-threshold determiner.
    pub fn two_threshold(
        dependency: impl Into<String>,
        threshold: i64,
        below: ChoiceId,
        meets: ChoiceId,
    ) -> Self {
        OutcomeDeterminer::TwoThreshold {
            dependency: dependency.into(),
            threshold,
            below,
            meets,
        }
    }

    /// Select the outcome for the given statuses.
    ///
    /// The threshold itself counts as meeting it.
    pub fn get_outcome(&self, statuses: &StatusTable) -> Result<ChoiceId> {
        match self {
            OutcomeDeterminer::TwoThreshold {
                dependency,
                threshold,
                below,
                meets,
            } => {
                let value = statuses
                    .get(dependency)
                    .ok_or_else(|| StoryError::MissingStatus(dependency.clone()))?;
                Ok(if value < *threshold { *below } else { *meets })
            }
        }
    }

    /// Every choice this determiner can return, in a fixed order.
    pub fn possible_outcomes(&self) -> Vec<ChoiceId> {
        match self {
            OutcomeDeterminer::TwoThreshold { below, meets, .. } => vec![*below, *meets],
        }
    }

    /// The status this determiner reads.
    pub fn dependency(&self) -> &str {
        match self {
            OutcomeDeterminer::TwoThreshold { dependency, .. } => dependency,
        }
    }

    /// Encode as `TWOTHRESHOLD "<dependency>" <threshold> C<below> C<meets>`.
    pub fn encode<F>(&self, id_of: &F) -> Result<String>
    where
        F: Fn(ChoiceId) -> Option<String>,
    {
        match self {
            OutcomeDeterminer::TwoThreshold {
                dependency,
                threshold,
                below,
                meets,
            } => {
                let below = id_of(*below).ok_or(StoryError::UnmappedChoice(*below))?;
                let meets = id_of(*meets).ok_or(StoryError::UnmappedChoice(*meets))?;
                Ok(format!(
                    "{} \"{}\" {} {} {}",
                    Self::TWO_THRESHOLD_TAG,
                    dependency,
                    threshold,
                    below,
                    meets
                ))
            }
        }
    }
}
