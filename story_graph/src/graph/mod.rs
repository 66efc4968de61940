//! Graph module - the node arena holding every choice and decision of a story.
//!
//! Choices and decisions refer to each other through [`ChoiceId`] and [`DecisionId`] handles, so
//! identity is the handle and cycles need no special treatment in storage.

mod choice;
mod nodes;

pub use choice::*;
pub use nodes::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::decision::Decision;
use crate::error::{Result, StoryError};

/// Unique identifier for choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceId(pub Uuid);

impl ChoiceId {
    /// Create a new random choice ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub Uuid);

impl DecisionId {
    /// Create a new random decision ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The topology of a story: all choices and decisions, addressed by handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryGraph {
    choices: HashMap<ChoiceId, Choice>,

    /// Choice handles in creation order.
    choice_order: Vec<ChoiceId>,

    decisions: HashMap<DecisionId, Decision>,
}

impl StoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new terminal choice.
    pub fn add_choice(&mut self) -> ChoiceId {
        let id = ChoiceId::new();
        self.insert_choice(id, Choice::new());
        id
    }

    /// Insert a choice under a known handle, replacing any previous one.
    pub fn insert_choice(&mut self, id: ChoiceId, choice: Choice) {
        if self.choices.insert(id, choice).is_none() {
            self.choice_order.push(id);
        }
    }

    /// Add a decision to the arena without attaching it to any choice.
    pub fn add_decision(&mut self, decision: Decision) -> DecisionId {
        let id = DecisionId::new();
        self.decisions.insert(id, decision);
        id
    }

    /// Insert a decision under a known handle, replacing any previous one.
    pub fn insert_decision(&mut self, id: DecisionId, decision: Decision) {
        self.decisions.insert(id, decision);
    }

    /// Append a decision to a choice's options.
    pub fn attach_option(&mut self, choice: ChoiceId, decision: DecisionId) -> Result<()> {
        if !self.decisions.contains_key(&decision) {
            return Err(StoryError::UnknownDecision(decision));
        }
        self.choices
            .get_mut(&choice)
            .ok_or(StoryError::UnknownChoice(choice))?
            .push(decision);
        Ok(())
    }

    /// Detach the option at `index` from a choice.
    ///
    /// The decision leaves the arena once no choice lists it any more.
    pub fn detach_option(&mut self, choice: ChoiceId, index: usize) -> Result<DecisionId> {
        let decision = self
            .choices
            .get_mut(&choice)
            .ok_or(StoryError::UnknownChoice(choice))?
            .remove(index)?;
        if !self.is_option(decision) {
            self.decisions.remove(&decision);
        }
        Ok(decision)
    }

    /// Remove a choice and any of its decisions no other choice lists.
    ///
    /// Callers are responsible for checking nothing still leads to it.
    pub fn remove_choice(&mut self, id: ChoiceId) -> Result<Choice> {
        let choice = self.choices.remove(&id).ok_or(StoryError::UnknownChoice(id))?;
        self.choice_order.retain(|c| *c != id);
        for decision in choice.options() {
            if !self.is_option(*decision) {
                self.decisions.remove(decision);
            }
        }
        Ok(choice)
    }

    pub fn choice(&self, id: ChoiceId) -> Option<&Choice> {
        self.choices.get(&id)
    }

    pub fn decision(&self, id: DecisionId) -> Option<&Decision> {
        self.decisions.get(&id)
    }

    pub fn contains_choice(&self, id: ChoiceId) -> bool {
        self.choices.contains_key(&id)
    }

    /// Choice handles in creation order.
    pub fn choice_ids(&self) -> &[ChoiceId] {
        &self.choice_order
    }

    pub fn decisions(&self) -> impl Iterator<Item = (DecisionId, &Decision)> {
        self.decisions.iter().map(|(id, decision)| (*id, decision))
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    /// Check if any choice lists the decision as an option.
    pub fn is_option(&self, decision: DecisionId) -> bool {
        self.choices.values().any(|c| c.contains(decision))
    }

    /// Check if any decision can lead to the choice.
    pub fn is_outcome(&self, choice: ChoiceId) -> bool {
        self.decisions
            .values()
            .any(|d| d.possible_outcomes().contains(&choice))
    }

    /// Check if any decision reads or writes the status.
    pub fn uses_status(&self, name: &str) -> bool {
        self.decisions
            .values()
            .any(|d| d.referenced_statuses().contains(&name))
    }

    /// Resolve the option at `index` of a choice against `statuses`.
    pub fn choose(
        &self,
        choice: ChoiceId,
        index: usize,
        statuses: &mut crate::status::StatusTable,
    ) -> Result<ChoiceId> {
        let decision = self
            .choice(choice)
            .ok_or(StoryError::UnknownChoice(choice))?
            .option(index)?;
        self.decision(decision)
            .ok_or(StoryError::UnknownDecision(decision))?
            .resolve(statuses)
    }

    /// Descriptions of a choice's options, in order.
    pub fn option_descriptions(&self, choice: ChoiceId) -> Vec<&str> {
        self.choice(choice)
            .map(|c| {
                c.options()
                    .iter()
                    .filter_map(|d| self.decision(*d))
                    .map(Decision::description)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Render a choice for the player; see [`render_options`].
    pub fn render_choice(&self, choice: ChoiceId) -> String {
        render_options(&self.option_descriptions(choice))
    }

    /// Check every handle stored in the graph points at a node of the graph.
    pub fn validate(&self) -> Result<()> {
        for choice in self.choices.values() {
            if let Some(missing) = choice
                .options()
                .iter()
                .find(|d| !self.decisions.contains_key(*d))
            {
                return Err(StoryError::UnknownDecision(*missing));
            }
        }
        for decision in self.decisions.values() {
            if let Some(missing) = decision
                .possible_outcomes()
                .into_iter()
                .find(|c| !self.choices.contains_key(c))
            {
                return Err(StoryError::UnknownChoice(missing));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Effects, StatusTable, StatusUpdate};

    #[test]
    fn test_attach_and_choose() {
        let mut graph = StoryGraph::new();
        let start = graph.add_choice();
        let end = graph.add_choice();
        let go = graph.add_decision(Decision::consequential(
            "Go",
            end,
            Effects::new().with("steps", StatusUpdate::Add(1)),
        ));
        graph.attach_option(start, go).unwrap();

        let mut statuses: StatusTable = [("steps", 0)].into_iter().collect();
        assert_eq!(graph.choose(start, 0, &mut statuses), Ok(end));
        assert_eq!(statuses.get("steps"), Some(1));
        assert_eq!(
            graph.choose(start, 1, &mut statuses),
            Err(StoryError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_attach_unknown_nodes() {
        let mut graph = StoryGraph::new();
        let start = graph.add_choice();
        let ghost = DecisionId::new();

        assert_eq!(
            graph.attach_option(start, ghost),
            Err(StoryError::UnknownDecision(ghost))
        );

        let decision = graph.add_decision(Decision::simple("Loop", start));
        let nowhere = ChoiceId::new();
        assert_eq!(
            graph.attach_option(nowhere, decision),
            Err(StoryError::UnknownChoice(nowhere))
        );
    }

    #[test]
    fn test_detach_drops_unlisted_decision() {
        let mut graph = StoryGraph::new();
        let a = graph.add_choice();
        let b = graph.add_choice();
        let shared = graph.add_decision(Decision::simple("Shared", a));
        graph.attach_option(a, shared).unwrap();
        graph.attach_option(b, shared).unwrap();

        graph.detach_option(a, 0).unwrap();
        assert!(graph.decision(shared).is_some());

        graph.detach_option(b, 0).unwrap();
        assert!(graph.decision(shared).is_none());
    }

    #[test]
    fn test_outcome_and_status_queries() {
        let mut graph = StoryGraph::new();
        let a = graph.add_choice();
        let b = graph.add_choice();
        let d = graph.add_decision(Decision::consequential(
            "Drink",
            b,
            Effects::new().with("thirst", StatusUpdate::Set(0)),
        ));
        graph.attach_option(a, d).unwrap();

        assert!(graph.is_outcome(b));
        assert!(!graph.is_outcome(a));
        assert!(graph.uses_status("thirst"));
        assert!(!graph.uses_status("hunger"));
    }

    #[test]
    fn test_render_choice() {
        let mut graph = StoryGraph::new();
        let a = graph.add_choice();
        let left = graph.add_decision(Decision::simple("Go left", a));
        let right = graph.add_decision(Decision::simple("Go right", a));
        graph.attach_option(a, left).unwrap();
        graph.attach_option(a, right).unwrap();
        let end = graph.add_choice();

        assert_eq!(graph.render_choice(a), "Go left(1) or Go right(2)");
        assert_eq!(graph.render_choice(end), GAME_OVER);
    }

    #[test]
    fn test_validate_dangling_outcome() {
        let mut graph = StoryGraph::new();
        let a = graph.add_choice();
        let nowhere = ChoiceId::new();
        let d = graph.add_decision(Decision::simple("Leap", nowhere));
        graph.attach_option(a, d).unwrap();

        assert_eq!(graph.validate(), Err(StoryError::UnknownChoice(nowhere)));
    }

    #[test]
    fn test_remove_choice_keeps_order() {
        let mut graph = StoryGraph::new();
        let a = graph.add_choice();
        let b = graph.add_choice();
        let c = graph.add_choice();

        graph.remove_choice(b).unwrap();

        assert_eq!(graph.choice_ids(), &[a, c]);
        assert!(graph.remove_choice(b).is_err());
    }
}
