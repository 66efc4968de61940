//! Story builder - the authoring layer used to assemble and edit stories before they are played or
//! exported.

use crate::decision::{Decision, OutcomeDeterminer};
use crate::error::{Result, StoryError};
use crate::game::StoryGame;
use crate::graph::{ChoiceId, DecisionId, StoryGraph, StoryNodes};
use crate::status::{Effects, StatusTable};
use crate::text;

/// Name given to stories created without one.
pub const UNTITLED: &str = "Untitled";

/// Mutable authoring state for a story.
#[derive(Debug, Clone)]
pub struct StoryBuilder {
    name: String,
    statuses: StatusTable,
    graph: StoryGraph,
    initial: Option<ChoiceId>,
}

impl Default for StoryBuilder {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StoryBuilder {
    /// Start a new, empty story.
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or(UNTITLED).to_string(),
            statuses: StatusTable::new(),
            graph: StoryGraph::new(),
            initial: None,
        }
    }

    /// Re-open a story for editing.
    ///
    /// Keeps only the part reachable from its initial choice, in traversal order, together with its
    /// original statuses.
    pub fn from_story(story: &StoryGame) -> Result<Self> {
        let source = story.graph();
        let nodes = StoryNodes::collect(source, story.initial_choice())?;
        let mut graph = StoryGraph::new();
        for &id in nodes.choices() {
            let choice = source.choice(id).ok_or(StoryError::UnknownChoice(id))?;
            graph.insert_choice(id, choice.clone());
        }
        for &id in nodes.decisions() {
            let decision = source.decision(id).ok_or(StoryError::UnknownDecision(id))?;
            graph.insert_decision(id, decision.clone());
        }
        Ok(Self {
            name: story.name().to_string(),
            statuses: story.original_statuses().clone(),
            graph,
            initial: Some(story.initial_choice()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        text::ensure_encodable(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn statuses(&self) -> &StatusTable {
        &self.statuses
    }

    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    /// Choices in creation order.
    pub fn choices(&self) -> &[ChoiceId] {
        self.graph.choice_ids()
    }

    pub fn initial_choice(&self) -> Option<ChoiceId> {
        self.initial
    }

    /// Add a status, or change the starting value of an existing one.
    pub fn add_status(&mut self, name: impl Into<String>, value: i64) -> Result<()> {
        let name = name.into();
        text::ensure_encodable(&name)?;
        self.statuses.insert(name, value);
        Ok(())
    }

    /// Remove a status no decision refers to.
    pub fn remove_status(&mut self, name: &str) -> Result<i64> {
        if !self.statuses.contains(name) {
            return Err(StoryError::UnknownStatus(name.to_string()));
        }
        if self.graph.uses_status(name) {
            return Err(StoryError::InvalidTopology(format!(
                "at least one decision references status \"{}\"",
                name
            )));
        }
        self.statuses
            .remove(name)
            .ok_or_else(|| StoryError::UnknownStatus(name.to_string()))
    }

    /// Add an empty choice.
    pub fn add_choice(&mut self) -> ChoiceId {
        self.graph.add_choice()
    }

    pub fn set_initial_choice(&mut self, choice: ChoiceId) -> Result<()> {
        self.ensure_choice(choice)?;
        self.initial = Some(choice);
        Ok(())
    }

    /// Add an option to `choice` that leads straight to `outcome`.
    pub fn add_simple_decision(
        &mut self,
        choice: ChoiceId,
        description: &str,
        outcome: ChoiceId,
    ) -> Result<DecisionId> {
        ensure_description(description)?;
        self.ensure_choice(outcome)?;
        self.attach(choice, Decision::simple(description, outcome))
    }

    /// Add an option that applies `effects` and leads to `outcome`.
    ///
    /// Without effects this is a simple decision.
    pub fn add_consequential_decision(
        &mut self,
        choice: ChoiceId,
        description: &str,
        outcome: ChoiceId,
        effects: Effects,
    ) -> Result<DecisionId> {
        ensure_description(description)?;
        self.ensure_choice(outcome)?;
        self.ensure_effects(&effects)?;
        let decision = if effects.is_empty() {
            Decision::simple(description, outcome)
        } else {
            Decision::consequential(description, outcome, effects)
        };
        self.attach(choice, decision)
    }

    /// Add an option whose outcome is picked by `determiner`.
    pub fn add_dependent_decision(
        &mut self,
        choice: ChoiceId,
        description: &str,
        determiner: OutcomeDeterminer,
    ) -> Result<DecisionId> {
        self.add_consequential_dependent_decision(choice, description, Effects::new(), determiner)
    }

    /// Add an option that applies `effects`, then lets `determiner` pick the outcome.
    pub fn add_consequential_dependent_decision(
        &mut self,
        choice: ChoiceId,
        description: &str,
        effects: Effects,
        determiner: OutcomeDeterminer,
    ) -> Result<DecisionId> {
        ensure_description(description)?;
        self.ensure_determiner(&determiner)?;
        self.ensure_effects(&effects)?;
        let outcomes = determiner.possible_outcomes();
        let placeholder = outcomes
            .first()
            .copied()
            .ok_or_else(|| StoryError::InvalidTopology("determiner has no outcomes".to_string()))?;
        let delegate = if effects.is_empty() {
            Decision::simple(description, placeholder)
        } else {
            Decision::consequential(description, placeholder, effects)
        };
        self.attach(choice, Decision::dependent(delegate, determiner))
    }

    /// Remove the option at zero-based `index` from `choice`.
    pub fn remove_decision(&mut self, choice: ChoiceId, index: usize) -> Result<DecisionId> {
        self.graph.detach_option(choice, index)
    }

    /// Remove a choice that nothing leads to and that is not the initial choice.
    pub fn remove_choice(&mut self, choice: ChoiceId) -> Result<()> {
        self.ensure_choice(choice)?;
        if self.initial == Some(choice) {
            return Err(StoryError::InvalidTopology(
                "can't remove the initial choice".to_string(),
            ));
        }
        if self.graph.is_outcome(choice) {
            return Err(StoryError::InvalidTopology(
                "choice is an outcome of a decision".to_string(),
            ));
        }
        self.graph.remove_choice(choice)?;
        Ok(())
    }

    /// Build a playable story from the current state.
    ///
    /// Without an initial choice the story starts, and ends, at a fresh terminal choice.
    pub fn build(&self) -> Result<StoryGame> {
        text::ensure_encodable(&self.name)?;
        let mut graph = self.graph.clone();
        let initial = match self.initial {
            Some(initial) => initial,
            None => graph.add_choice(),
        };
        StoryGame::new(self.name.clone(), graph, initial, self.statuses.clone())
    }

    fn attach(&mut self, choice: ChoiceId, decision: Decision) -> Result<DecisionId> {
        self.ensure_choice(choice)?;
        let id = self.graph.add_decision(decision);
        self.graph.attach_option(choice, id)?;
        Ok(id)
    }

    fn ensure_choice(&self, choice: ChoiceId) -> Result<()> {
        if self.graph.contains_choice(choice) {
            Ok(())
        } else {
            Err(StoryError::UnknownChoice(choice))
        }
    }

    fn ensure_effects(&self, effects: &Effects) -> Result<()> {
        match effects.names().find(|name| !self.statuses.contains(name)) {
            Some(missing) => Err(StoryError::UnknownStatus(missing.to_string())),
            None => Ok(()),
        }
    }

    fn ensure_determiner(&self, determiner: &OutcomeDeterminer) -> Result<()> {
        if !self.statuses.contains(determiner.dependency()) {
            return Err(StoryError::UnknownStatus(determiner.dependency().to_string()));
        }
        for outcome in determiner.possible_outcomes() {
            self.ensure_choice(outcome)?;
        }
        Ok(())
    }
}

fn ensure_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(StoryError::EmptyDescription);
    }
    text::ensure_encodable(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionKind;
    use crate::game::PlayState;
    use crate::status::StatusUpdate;

    #[test]
    fn test_untitled_by_default() {
        assert_eq!(StoryBuilder::new(None).name(), UNTITLED);
        assert_eq!(StoryBuilder::new(Some("Cave")).name(), "Cave");
    }

    #[test]
    fn test_build_without_initial_is_over() {
        let story = StoryBuilder::new(Some("Nothing")).build().unwrap();
        assert_eq!(story.state(), PlayState::Terminal);
    }

    #[test]
    fn test_empty_effects_make_simple_decision() {
        let mut builder = StoryBuilder::new(None);
        let start = builder.add_choice();
        let id = builder
            .add_consequential_decision(start, "Wait", start, Effects::new())
            .unwrap();

        let decision = builder.graph().decision(id).unwrap();
        assert_eq!(decision.kind(), DecisionKind::Simple);
    }

    #[test]
    fn test_dependent_decision_delegate() {
        let mut builder = StoryBuilder::new(None);
        builder.add_status("strength", -1).unwrap();
        let start = builder.add_choice();
        let lose = builder.add_choice();
        let win = builder.add_choice();

        let id = builder
            .add_consequential_dependent_decision(
                start,
                "get strength",
                Effects::new().with("strength", StatusUpdate::Add(2)),
                OutcomeDeterminer::two_threshold("strength", 1, lose, win),
            )
            .unwrap();
        builder.set_initial_choice(start).unwrap();

        let Decision::Dependent { delegate, .. } = builder.graph().decision(id).unwrap() else {
            panic!("expected a dependent decision");
        };
        assert_eq!(delegate.kind(), DecisionKind::Consequential);
        assert_eq!(delegate.possible_outcomes(), vec![lose]);

        let mut story = builder.build().unwrap();
        story.next(0).unwrap();
        assert_eq!(story.current_choice(), win);
    }

    #[test]
    fn test_validation_errors() {
        let mut builder = StoryBuilder::new(None);
        let start = builder.add_choice();
        let ghost = ChoiceId::new();

        assert_eq!(
            builder.add_simple_decision(start, "Go", ghost),
            Err(StoryError::UnknownChoice(ghost))
        );
        assert_eq!(
            builder.add_simple_decision(start, "  ", start),
            Err(StoryError::EmptyDescription)
        );
        assert_eq!(
            builder.add_consequential_decision(
                start,
                "Eat",
                start,
                Effects::new().with("hunger", StatusUpdate::Set(0)),
            ),
            Err(StoryError::UnknownStatus("hunger".to_string()))
        );
        assert_eq!(
            builder.add_dependent_decision(
                start,
                "Climb",
                OutcomeDeterminer::two_threshold("stamina", 3, start, start),
            ),
            Err(StoryError::UnknownStatus("stamina".to_string()))
        );
        assert!(builder.graph().choice(start).unwrap().is_terminal());
    }

    #[test]
    fn test_remove_status_in_use() {
        let mut builder = StoryBuilder::new(None);
        builder.add_status("gold", 5).unwrap();
        builder.add_status("spare", 0).unwrap();
        let start = builder.add_choice();
        builder
            .add_consequential_decision(
                start,
                "Spend",
                start,
                Effects::new().with("gold", StatusUpdate::Add(-1)),
            )
            .unwrap();

        assert!(matches!(
            builder.remove_status("gold"),
            Err(StoryError::InvalidTopology(_))
        ));
        assert_eq!(builder.remove_status("spare"), Ok(0));
        assert_eq!(
            builder.remove_status("spare"),
            Err(StoryError::UnknownStatus("spare".to_string()))
        );
    }

    #[test]
    fn test_remove_choice_rules() {
        let mut builder = StoryBuilder::new(None);
        let start = builder.add_choice();
        let end = builder.add_choice();
        let loose = builder.add_choice();
        builder.add_simple_decision(start, "Finish", end).unwrap();
        builder.set_initial_choice(start).unwrap();

        assert!(matches!(
            builder.remove_choice(start),
            Err(StoryError::InvalidTopology(_))
        ));
        assert!(matches!(
            builder.remove_choice(end),
            Err(StoryError::InvalidTopology(_))
        ));
        assert_eq!(builder.remove_choice(loose), Ok(()));
        assert_eq!(builder.choices(), &[start, end]);
    }

    #[test]
    fn test_remove_decision_frees_outcome() {
        let mut builder = StoryBuilder::new(None);
        let start = builder.add_choice();
        let end = builder.add_choice();
        builder.add_simple_decision(start, "Finish", end).unwrap();

        assert_eq!(
            builder.remove_decision(start, 1),
            Err(StoryError::IndexOutOfRange { index: 1, len: 1 })
        );
        builder.remove_decision(start, 0).unwrap();

        assert_eq!(builder.graph().decision_count(), 0);
        assert_eq!(builder.remove_choice(end), Ok(()));
    }

    #[test]
    fn test_from_story_keeps_reachable_part() {
        let mut builder = StoryBuilder::new(Some("Trimmed"));
        builder.add_status("steps", 0).unwrap();
        let start = builder.add_choice();
        let end = builder.add_choice();
        let unused = builder.add_choice();
        builder
            .add_consequential_decision(
                start,
                "Walk",
                end,
                Effects::new().with("steps", StatusUpdate::Add(1)),
            )
            .unwrap();
        builder.set_initial_choice(start).unwrap();
        let mut story = builder.build().unwrap();
        story.next(0).unwrap();

        let reopened = StoryBuilder::from_story(&story).unwrap();

        assert_eq!(reopened.name(), "Trimmed");
        assert_eq!(reopened.choices(), &[start, end]);
        assert!(!reopened.graph().contains_choice(unused));
        assert_eq!(reopened.statuses().get("steps"), Some(0));
        assert_eq!(reopened.initial_choice(), Some(start));
    }

    #[test]
    fn test_rejects_text_a_file_cannot_hold() {
        let mut builder = StoryBuilder::new(Some("Quotes"));
        let start = builder.add_choice();

        assert_eq!(
            builder.add_simple_decision(start, "Say \"yes\" now", start),
            Err(StoryError::UnencodableText("Say \"yes\" now".to_string()))
        );
        assert!(builder.add_simple_decision(start, "two  spaces", start).is_err());
        assert!(builder.add_status("line\nbreak", 0).is_err());
        assert!(builder.set_name("bad\tname").is_err());
        assert_eq!(builder.graph().decision_count(), 0);
        assert!(builder.statuses().is_empty());
        assert_eq!(builder.name(), "Quotes");

        builder.add_simple_decision(start, "Say \"yes\"", start).unwrap();
        assert!(builder.build().is_ok());
        assert!(StoryBuilder::new(Some("two  spaces")).build().is_err());
    }
}
