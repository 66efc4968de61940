//! Story nodes - stable numbering of the reachable part of a story graph.
//!
//! Numbering is breadth-first from the initial choice: a choice gets the next `C` index when it is
//! first popped from the frontier, then each of its options gets the next unseen `D` index in list
//! order, and each option's possible outcomes not yet numbered join the frontier. Seen sets are
//! keyed by handle, so a cycle is walked once no matter how often it is re-entered.

use std::collections::{HashMap, VecDeque};

use super::{ChoiceId, DecisionId, StoryGraph};
use crate::error::{Result, StoryError};

/// Every choice and decision reachable from an initial choice, with serialization indices.
#[derive(Debug, Clone, Default)]
pub struct StoryNodes {
    choices: Vec<ChoiceId>,
    decisions: Vec<DecisionId>,
    choice_index: HashMap<ChoiceId, usize>,
    decision_index: HashMap<DecisionId, usize>,

    /// Option indices (into `decisions`) per choice, parallel to `choices`.
    options: Vec<Vec<usize>>,
}

impl StoryNodes {
    /// Number every node reachable from `initial`.
    pub fn collect(graph: &StoryGraph, initial: ChoiceId) -> Result<Self> {
        let mut nodes = StoryNodes::default();
        let mut frontier = VecDeque::from([initial]);

        while let Some(next) = frontier.pop_front() {
            if nodes.choice_index.contains_key(&next) {
                continue;
            }
            let choice = graph.choice(next).ok_or(StoryError::UnknownChoice(next))?;
            nodes.choice_index.insert(next, nodes.choices.len());
            nodes.choices.push(next);

            let mut option_indices = Vec::with_capacity(choice.options().len());
            for &decision_id in choice.options() {
                let decision = graph
                    .decision(decision_id)
                    .ok_or(StoryError::UnknownDecision(decision_id))?;
                let index = match nodes.decision_index.get(&decision_id) {
                    Some(index) => *index,
                    None => {
                        let index = nodes.decisions.len();
                        nodes.decision_index.insert(decision_id, index);
                        nodes.decisions.push(decision_id);
                        index
                    }
                };
                option_indices.push(index);

                for outcome in decision.possible_outcomes() {
                    if !nodes.choice_index.contains_key(&outcome) {
                        frontier.push_back(outcome);
                    }
                }
            }
            nodes.options.push(option_indices);
        }

        tracing::trace!(
            choices = nodes.choices.len(),
            decisions = nodes.decisions.len(),
            "numbered story nodes"
        );
        Ok(nodes)
    }

    /// Reachable choices in index order.
    pub fn choices(&self) -> &[ChoiceId] {
        &self.choices
    }

    /// Reachable decisions in index order.
    pub fn decisions(&self) -> &[DecisionId] {
        &self.decisions
    }

    pub fn choice_index(&self, id: ChoiceId) -> Option<usize> {
        self.choice_index.get(&id).copied()
    }

    pub fn decision_index(&self, id: DecisionId) -> Option<usize> {
        self.decision_index.get(&id).copied()
    }

    /// The `C<k>` label of a choice.
    pub fn choice_label(&self, id: ChoiceId) -> Option<String> {
        self.choice_index(id).map(|i| format!("C{}", i))
    }

    /// The `D<k>` label of a decision.
    pub fn decision_label(&self, id: DecisionId) -> Option<String> {
        self.decision_index(id).map(|i| format!("D{}", i))
    }

    /// Decision indices of the options of the choice at `position`.
    pub fn options_of(&self, position: usize) -> &[usize] {
        self.options.get(position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The `C<k> [ D<j> ... ]` line of the choice at `position`.
    pub fn option_line(&self, position: usize) -> String {
        let mut line = format!("C{} [ ", position);
        for index in self.options_of(position) {
            line.push_str(&format!("D{} ", index));
        }
        line.push(']');
        line
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{Decision, OutcomeDeterminer};

    #[test]
    fn test_breadth_first_order() {
        let mut graph = StoryGraph::new();
        let start = graph.add_choice();
        let left = graph.add_choice();
        let right = graph.add_choice();
        let end = graph.add_choice();

        let go_left = graph.add_decision(Decision::simple("Go left", left));
        let go_right = graph.add_decision(Decision::simple("Go right", right));
        let finish = graph.add_decision(Decision::simple("Finish", end));
        graph.attach_option(start, go_left).unwrap();
        graph.attach_option(start, go_right).unwrap();
        graph.attach_option(left, finish).unwrap();
        graph.attach_option(right, finish).unwrap();

        let nodes = StoryNodes::collect(&graph, start).unwrap();

        assert_eq!(nodes.choices(), &[start, left, right, end]);
        assert_eq!(nodes.decisions(), &[go_left, go_right, finish]);
        assert_eq!(nodes.option_line(0), "C0 [ D0 D1 ]");
        assert_eq!(nodes.option_line(1), "C1 [ D2 ]");
        assert_eq!(nodes.option_line(2), "C2 [ D2 ]");
        assert_eq!(nodes.option_line(3), "C3 [ ]");
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = StoryGraph::new();
        let hub = graph.add_choice();
        let again = graph.add_decision(Decision::simple("Again", hub));
        let also_again = graph.add_decision(Decision::simple("Once more", hub));
        graph.attach_option(hub, again).unwrap();
        graph.attach_option(hub, also_again).unwrap();

        let nodes = StoryNodes::collect(&graph, hub).unwrap();

        assert_eq!(nodes.choice_count(), 1);
        assert_eq!(nodes.decision_count(), 2);
        assert_eq!(nodes.choice_label(hub), Some("C0".to_string()));
        assert_eq!(nodes.decision_label(also_again), Some("D1".to_string()));
    }

    #[test]
    fn test_back_edge_to_earlier_choice() {
        let mut graph = StoryGraph::new();
        let first = graph.add_choice();
        let second = graph.add_choice();
        let forward = graph.add_decision(Decision::simple("Forward", second));
        let back = graph.add_decision(Decision::simple("Back", first));
        let stay = graph.add_decision(Decision::simple("Stay", second));
        graph.attach_option(first, forward).unwrap();
        graph.attach_option(second, back).unwrap();
        graph.attach_option(second, stay).unwrap();

        let nodes = StoryNodes::collect(&graph, first).unwrap();

        assert_eq!(nodes.choices(), &[first, second]);
        assert_eq!(nodes.decisions(), &[forward, back, stay]);
    }

    #[test]
    fn test_dependent_outcomes_enqueued_in_order() {
        let mut graph = StoryGraph::new();
        let start = graph.add_choice();
        let weak = graph.add_choice();
        let strong = graph.add_choice();
        let lift = graph.add_decision(Decision::dependent(
            Decision::simple("Lift", weak),
            OutcomeDeterminer::two_threshold("strength", 3, weak, strong),
        ));
        graph.attach_option(start, lift).unwrap();

        let nodes = StoryNodes::collect(&graph, start).unwrap();

        assert_eq!(nodes.choices(), &[start, weak, strong]);
    }

    #[test]
    fn test_unreachable_nodes_are_skipped() {
        let mut graph = StoryGraph::new();
        let start = graph.add_choice();
        let orphan = graph.add_choice();
        let d = graph.add_decision(Decision::simple("Orphaned", start));
        graph.attach_option(orphan, d).unwrap();

        let nodes = StoryNodes::collect(&graph, start).unwrap();

        assert_eq!(nodes.choices(), &[start]);
        assert!(nodes.decisions().is_empty());
        assert_eq!(nodes.choice_index(orphan), None);
    }

    #[test]
    fn test_unknown_initial_choice() {
        let graph = StoryGraph::new();
        let missing = ChoiceId::new();

        assert_eq!(
            StoryNodes::collect(&graph, missing).unwrap_err(),
            StoryError::UnknownChoice(missing)
        );
    }
}
