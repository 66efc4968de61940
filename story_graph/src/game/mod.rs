//! Game module - the play runtime over a story graph.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Result, StoryError};
use crate::graph::{ChoiceId, StoryGraph};
use crate::status::StatusTable;

/// Where a play session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    InProgress,
    /// The current choice has no options.
    Terminal,
}

/// A named story being played: shared topology, a cursor, and live statuses.
///
/// The graph is shared between a session and the sessions derived from it; only the cursor and the
/// status table belong to the session.
#[derive(Debug, Clone)]
pub struct StoryGame {
    name: String,
    graph: Arc<StoryGraph>,
    initial: ChoiceId,

    current: ChoiceId,

    /// Decisions made since the start or the last restart.
    steps: usize,

    statuses: StatusTable,

    /// Snapshot taken at construction, used to restart.
    original_statuses: StatusTable,
}

impl StoryGame {
    /// Create a session at `initial`.
    ///
    /// Fails if the graph holds dangling handles or does not contain `initial`.
    pub fn new(
        name: impl Into<String>,
        graph: impl Into<Arc<StoryGraph>>,
        initial: ChoiceId,
        statuses: StatusTable,
    ) -> Result<Self> {
        let graph = graph.into();
        if !graph.contains_choice(initial) {
            return Err(StoryError::UnknownChoice(initial));
        }
        graph.validate()?;
        Ok(Self {
            name: name.into(),
            graph,
            initial,
            current: initial,
            steps: 0,
            original_statuses: statuses.clone(),
            statuses,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Arc<StoryGraph> {
        &self.graph
    }

    pub fn initial_choice(&self) -> ChoiceId {
        self.initial
    }

    pub fn current_choice(&self) -> ChoiceId {
        self.current
    }

    /// Number of decisions made since the start or the last restart.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn statuses(&self) -> &StatusTable {
        &self.statuses
    }

    pub fn original_statuses(&self) -> &StatusTable {
        &self.original_statuses
    }

    pub fn state(&self) -> PlayState {
        match self.graph.choice(self.current_choice()) {
            Some(choice) if !choice.is_terminal() => PlayState::InProgress,
            _ => PlayState::Terminal,
        }
    }

    /// Descriptions of the current options.
    pub fn current_options(&self) -> Vec<&str> {
        self.graph.option_descriptions(self.current_choice())
    }

    /// The current choice as the player reads it.
    pub fn current_choice_text(&self) -> String {
        self.graph.render_choice(self.current_choice())
    }

    /// Make the decision at zero-based `index` of the current choice.
    ///
    /// On any error the session is left exactly as it was.
    pub fn next(&mut self, index: usize) -> Result<PlayState> {
        if self.state() == PlayState::Terminal {
            return Err(StoryError::GameOver);
        }
        let mut staged = self.statuses.clone();
        let outcome = self.graph.choose(self.current_choice(), index, &mut staged)?;
        self.statuses = staged;
        self.current = outcome;
        self.steps += 1;
        Ok(self.state())
    }

    /// Return to the initial choice and the original statuses.
    pub fn restart(&mut self) {
        self.current = self.initial;
        self.steps = 0;
        self.statuses = self.original_statuses.clone();
    }

    /// A fresh session over the same topology, leaving this one untouched.
    pub fn get_original(&self) -> StoryGame {
        StoryGame {
            name: self.name.clone(),
            graph: Arc::clone(&self.graph),
            initial: self.initial,
            current: self.initial,
            steps: 0,
            statuses: self.original_statuses.clone(),
            original_statuses: self.original_statuses.clone(),
        }
    }
}
