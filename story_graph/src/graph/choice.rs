//! Choices - the interactive unit a player resolves.

use serde::{Deserialize, Serialize};

use super::DecisionId;
use crate::error::{Result, StoryError};

/// Rendering of a choice without options.
pub const GAME_OVER: &str = "Game over, no choices left.";

/// An ordered list of options. A choice with no options ends the story.
///
/// Choices are compared by their [`ChoiceId`](super::ChoiceId) handle, never by content, so
/// `Choice` itself does not implement `PartialEq`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    options: Vec<DecisionId>,
}

impl Choice {
    /// Create a terminal choice.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Vec<DecisionId>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[DecisionId] {
        &self.options
    }

    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }

    pub fn contains(&self, decision: DecisionId) -> bool {
        self.options.contains(&decision)
    }

    /// The decision at a zero-based option index.
    pub fn option(&self, index: usize) -> Result<DecisionId> {
        self.options
            .get(index)
            .copied()
            .ok_or(StoryError::IndexOutOfRange {
                index,
                len: self.options.len(),
            })
    }

    pub(crate) fn push(&mut self, decision: DecisionId) {
        self.options.push(decision);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<DecisionId> {
        if index < self.options.len() {
            Ok(self.options.remove(index))
        } else {
            Err(StoryError::IndexOutOfRange {
                index,
                len: self.options.len(),
            })
        }
    }
}

/// Render option descriptions as the player sees them.
///
/// `a(1)`, `a(1) or b(2)`, `a(1), b(2), or c(3)`, and [`GAME_OVER`] for none.
pub fn render_options<S: AsRef<str>>(descriptions: &[S]) -> String {
    match descriptions {
        [] => GAME_OVER.to_string(),
        [only] => format!("{}(1)", only.as_ref()),
        [first, second] => format!("{}(1) or {}(2)", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let mut rendered = init
                .iter()
                .enumerate()
                .map(|(i, d)| format!("{}({}),", d.as_ref(), i + 1))
                .collect::<Vec<_>>()
                .join(" ");
            rendered.push_str(&format!(" or {}({})", last.as_ref(), descriptions.len()));
            rendered
        }
    }
}
