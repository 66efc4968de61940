//! Error taxonomy for the story model.

use thiserror::Error;

use crate::graph::{ChoiceId, DecisionId};

/// Errors raised while building, traversing or playing a story.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    /// An effect references a status absent from the table.
    #[error("no status \"{0}\" in the story")]
    UnknownStatus(String),

    /// A determiner depends on a status absent from the table.
    #[error("can't determine outcome of this story, missing status \"{0}\"")]
    MissingStatus(String),

    #[error("no option {index} (choice has {len} options)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The current choice has no options left.
    #[error("game over, no choices left")]
    GameOver,

    /// Authoring-time structural violation.
    #[error("invalid story topology: {0}")]
    InvalidTopology(String),

    #[error("no choice {0} in the story")]
    UnknownChoice(ChoiceId),

    #[error("no decision {0} in the story")]
    UnknownDecision(DecisionId),

    /// An outcome has no entry in the id map handed to an encoder.
    #[error("choice {0} has no serialization id")]
    UnmappedChoice(ChoiceId),

    #[error("decision description can't be empty")]
    EmptyDescription,

    /// Text that would not read back unchanged from a story file.
    #[error("text \"{0}\" can't be stored: use single spaces and no quote before a space")]
    UnencodableText(String),

    #[error("invalid status update \"{0}\"")]
    InvalidStatusUpdate(String),
}

/// Result type used throughout the story model.
pub type Result<T> = std::result::Result<T, StoryError>;
