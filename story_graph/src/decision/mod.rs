//! Decision module - the options offered at a choice.
//!
//! A decision is one of three closed variants:
//! - **Simple**: always leads to its outcome
//! - **Consequential**: updates statuses, then leads to its outcome
//! - **Dependent**: resolves a delegate for its effects, then lets a determiner pick the outcome

mod determiner;

pub use determiner::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, StoryError};
use crate::graph::ChoiceId;
use crate::status::{Effects, StatusTable};

/// Discriminant of [`Decision`], mirrored one-to-one by the type tag in the text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    Simple,
    Consequential,
    Dependent,
}

impl DecisionKind {
    pub fn tag(&self) -> &'static str {
        match self {
            DecisionKind::Simple => "SIMPLE",
            DecisionKind::Consequential => "CONSEQUENTIAL",
            DecisionKind::Dependent => "DEPENDENT",
        }
    }
}

impl FromStr for DecisionKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SIMPLE" => Ok(DecisionKind::Simple),
            "CONSEQUENTIAL" => Ok(DecisionKind::Consequential),
            "DEPENDENT" => Ok(DecisionKind::Dependent),
            _ => Err(()),
        }
    }
}

/// One selectable option at a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Simple {
        description: String,
        outcome: ChoiceId,
    },
    Consequential {
        description: String,
        outcome: ChoiceId,
        effects: Effects,
    },
    Dependent {
        /// Resolved for its side effects only; its own outcome is discarded.
        delegate: Box<Decision>,
        determiner: OutcomeDeterminer,
    },
}

impl Decision {
    pub fn simple(description: impl Into<String>, outcome: ChoiceId) -> Self {
        Decision::Simple {
            description: description.into(),
            outcome,
        }
    }

    /// Create a consequential decision as given, even with no effects.
    pub fn consequential(
        description: impl Into<String>,
        outcome: ChoiceId,
        effects: Effects,
    ) -> Self {
        Decision::Consequential {
            description: description.into(),
            outcome,
            effects,
        }
    }

    pub fn dependent(delegate: Decision, determiner: OutcomeDeterminer) -> Self {
        Decision::Dependent {
            delegate: Box::new(delegate),
            determiner,
        }
    }

    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::Simple { .. } => DecisionKind::Simple,
            Decision::Consequential { .. } => DecisionKind::Consequential,
            Decision::Dependent { .. } => DecisionKind::Dependent,
        }
    }

    /// The text shown to the player. A dependent decision reads as its delegate.
    pub fn description(&self) -> &str {
        match self {
            Decision::Simple { description, .. } | Decision::Consequential { description, .. } => {
                description.as_str()
            }
            Decision::Dependent { delegate, .. } => delegate.description(),
        }
    }

    /// Make this decision: apply its effects to `statuses` and return the next choice.
    pub fn resolve(&self, statuses: &mut StatusTable) -> Result<ChoiceId> {
        match self {
            Decision::Simple { outcome, .. } => Ok(*outcome),
            Decision::Consequential {
                outcome, effects, ..
            } => {
                effects.apply_to(statuses)?;
                Ok(*outcome)
            }
            Decision::Dependent {
                delegate,
                determiner,
            } => {
                delegate.resolve(statuses)?;
                determiner.get_outcome(statuses)
            }
        }
    }

    /// Every choice resolving this decision can lead to.
    pub fn possible_outcomes(&self) -> Vec<ChoiceId> {
        match self {
            Decision::Simple { outcome, .. } | Decision::Consequential { outcome, .. } => {
                vec![*outcome]
            }
            Decision::Dependent { determiner, .. } => determiner.possible_outcomes(),
        }
    }

    /// Names of every status this decision reads or writes, delegate included.
    pub fn referenced_statuses(&self) -> Vec<&str> {
        match self {
            Decision::Simple { .. } => Vec::new(),
            Decision::Consequential { effects, .. } => effects.names().collect(),
            Decision::Dependent {
                delegate,
                determiner,
            } => {
                let mut names = delegate.referenced_statuses();
                if !names.contains(&determiner.dependency()) {
                    names.push(determiner.dependency());
                }
                names
            }
        }
    }

    /// Encode this decision in the text grammar, naming outcomes through `id_of`.
    ///
    /// ```text
    /// SIMPLE "<description>" C<outcome>
    /// CONSEQUENTIAL "<description>" [ <update> "<name>" ( | <update> "<name>" )* ] C<outcome>
    /// DEPENDENT <determiner> [ <delegate> ]
    /// ```
    pub fn encode<F>(&self, id_of: &F) -> Result<String>
    where
        F: Fn(ChoiceId) -> Option<String>,
    {
        match self {
            Decision::Simple {
                description,
                outcome,
            } => {
                let outcome = id_of(*outcome).ok_or(StoryError::UnmappedChoice(*outcome))?;
                Ok(format!("{} \"{}\" {}", self.kind().tag(), description, outcome))
            }
            Decision::Consequential {
                description,
                outcome,
                effects,
            } => {
                let outcome = id_of(*outcome).ok_or(StoryError::UnmappedChoice(*outcome))?;
                let updates = effects
                    .iter()
                    .map(|(name, update)| format!("{} \"{}\"", update.encode(), name))
                    .collect::<Vec<_>>();
                let block = if updates.is_empty() {
                    "[ ]".to_string()
                } else {
                    format!("[ {} ]", updates.join(" | "))
                };
                Ok(format!(
                    "{} \"{}\" {} {}",
                    self.kind().tag(),
                    description,
                    block,
                    outcome
                ))
            }
            Decision::Dependent {
                delegate,
                determiner,
            } => Ok(format!(
                "{} {} [ {} ]",
                self.kind().tag(),
                determiner.encode(id_of)?,
                delegate.encode(id_of)?
            )),
        }
    }
}
