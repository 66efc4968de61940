//! Importer - parses story text into a fresh story.
//!
//! Decisions are read into a flat list before the choice blocks, and choice references are
//! resolved by index, so a decision may lead to any choice (earlier ones included) and a choice may
//! list decisions in any order. Any deviation from the grammar aborts the whole import.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use story_graph::{
    Choice, ChoiceId, Decision, DecisionId, DecisionKind, Effects, OutcomeDeterminer, StatusTable,
    StatusUpdate, StoryGame, StoryGraph,
};

use crate::error::{CodecError, Result};
use crate::token::{Token, Tokens};

/// Read and parse a story file.
pub fn import_file(path: impl AsRef<Path>) -> Result<StoryGame> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CodecError::FileNotFound(path.to_path_buf()),
        _ => CodecError::Io(e),
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "importing story");
    import_str(&text)
}

/// Parse story text.
pub fn import_str(input: &str) -> Result<StoryGame> {
    let mut parser = Parser::new(input);

    let name = parser.text("story name")?;
    let statuses = parser.statuses()?;
    let declared_choices = parser.legacy_choice_count()?;
    let decisions = parser.decisions()?;
    let options = parser.choices(decisions.len())?;
    let initial = parser.choice_index()?;
    if !parser.tokens.is_done()? {
        return Err(CodecError::format("unexpected text after the initial choice"));
    }

    let choice_count = options.len();
    if let Some(declared) = declared_choices {
        if declared != choice_count {
            return Err(CodecError::format(format!(
                "declared {} choices but found {}",
                declared, choice_count
            )));
        }
    }
    if let Some(out_of_range) = parser
        .referenced_choices
        .iter()
        .chain(std::iter::once(&initial))
        .find(|index| **index >= choice_count)
    {
        return Err(CodecError::format(format!(
            "choice C{} is out of range",
            out_of_range
        )));
    }

    let choice_ids: Vec<ChoiceId> = (0..choice_count).map(|i| parser.slots.get(i)).collect();
    let decision_ids: Vec<DecisionId> = decisions.iter().map(|_| DecisionId::new()).collect();
    let mut graph = StoryGraph::new();
    for (id, decision) in decision_ids.iter().zip(decisions) {
        graph.insert_decision(*id, decision);
    }
    for (id, option_indices) in choice_ids.iter().zip(options) {
        let options = option_indices.into_iter().map(|d| decision_ids[d]).collect();
        graph.insert_choice(*id, Choice::with_options(options));
    }

    tracing::debug!(
        story = %name,
        choices = choice_count,
        decisions = decision_ids.len(),
        "imported story"
    );
    Ok(StoryGame::new(name, graph, choice_ids[initial], statuses)?)
}

/// Handles for choices handed out as soon as a decision mentions them by index.
///
/// Only indices actually referenced get a handle, so a huge `C#` costs one entry.
#[derive(Default)]
struct ChoiceSlots {
    ids: HashMap<usize, ChoiceId>,
}

impl ChoiceSlots {
    fn get(&mut self, index: usize) -> ChoiceId {
        *self.ids.entry(index).or_insert_with(ChoiceId::new)
    }
}

struct Parser<'a> {
    tokens: Tokens<'a>,
    slots: ChoiceSlots,
    /// Every `C#` index used by a decision, checked once the choice count is known.
    referenced_choices: Vec<usize>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: Tokens::new(input),
            slots: ChoiceSlots::default(),
            referenced_choices: Vec::new(),
        }
    }

    /// `[ "<name>" <int> ... ]`
    fn statuses(&mut self) -> Result<StatusTable> {
        self.expect("[")?;
        let mut statuses = StatusTable::new();
        loop {
            let token = self.tokens.next_token()?;
            if token.is_symbol("]") {
                return Ok(statuses);
            }
            if !token.quoted && is_structural(&token.text) {
                return Err(unexpected("status name or ]", &token));
            }
            let value = self.int("status value")?;
            if statuses.insert(token.text.clone(), value).is_some() {
                return Err(CodecError::format(format!(
                    "status \"{}\" declared twice",
                    token.text
                )));
            }
        }
    }

    /// Older files carry the number of choices ahead of the decision block.
    fn legacy_choice_count(&mut self) -> Result<Option<usize>> {
        let is_count = matches!(
            self.tokens.peek()?,
            Some(Token { text, quoted: false }) if text.parse::<usize>().is_ok()
        );
        if is_count {
            let token = self.tokens.next_token()?;
            Ok(token.text.parse().ok())
        } else {
            Ok(None)
        }
    }

    /// `{ [ <decision> ] ... }`
    fn decisions(&mut self) -> Result<Vec<Decision>> {
        self.expect("{")?;
        let mut decisions = Vec::new();
        loop {
            let token = self.tokens.next_token()?;
            if token.is_symbol("}") {
                return Ok(decisions);
            }
            if !token.is_symbol("[") {
                return Err(unexpected("[", &token));
            }
            decisions.push(self.decision()?);
            self.expect("]")?;
        }
    }

    fn decision(&mut self) -> Result<Decision> {
        let tag = self.tokens.next_token()?;
        let kind = if tag.quoted {
            None
        } else {
            tag.text.parse::<DecisionKind>().ok()
        };
        match kind {
            Some(DecisionKind::Simple) => {
                let description = self.description()?;
                let outcome = self.choice_ref()?;
                Ok(Decision::simple(description, outcome))
            }
            Some(DecisionKind::Consequential) => {
                let description = self.description()?;
                let effects = self.effects()?;
                let outcome = self.choice_ref()?;
                Ok(Decision::consequential(description, outcome, effects))
            }
            Some(DecisionKind::Dependent) => {
                let determiner = self.determiner()?;
                self.expect("[")?;
                let delegate = self.decision()?;
                self.expect("]")?;
                Ok(Decision::dependent(delegate, determiner))
            }
            None => Err(CodecError::format(format!(
                "unknown decision type \"{}\"",
                tag.text
            ))),
        }
    }

    /// `[ ]` or `[ <update> "<name>" ( | <update> "<name>" )* ]`
    fn effects(&mut self) -> Result<Effects> {
        self.expect("[")?;
        let mut effects = Effects::new();
        if matches!(self.tokens.peek()?, Some(token) if token.is_symbol("]")) {
            self.tokens.next_token()?;
            return Ok(effects);
        }
        loop {
            let update = self.status_update()?;
            let name = self.text("status name")?;
            effects.insert(name, update);
            let separator = self.tokens.next_token()?;
            if separator.is_symbol("]") {
                return Ok(effects);
            }
            if !separator.is_symbol("|") {
                return Err(unexpected("| or ]", &separator));
            }
        }
    }

    /// `ADD <n>` or `SET <n>`
    fn status_update(&mut self) -> Result<StatusUpdate> {
        let tag = self.tokens.next_token()?;
        let operand = self.int("status update operand")?;
        if tag.quoted {
            return Err(unexpected("status update type", &tag));
        }
        StatusUpdate::from_parts(&tag.text, operand).ok_or_else(|| {
            CodecError::format(format!("unknown status update type \"{}\"", tag.text))
        })
    }

    /// `TWOTHRESHOLD "<dependency>" <threshold> C<below> C<meets>`
    fn determiner(&mut self) -> Result<OutcomeDeterminer> {
        let tag = self.tokens.next_token()?;
        if !tag.is_symbol(OutcomeDeterminer::TWO_THRESHOLD_TAG) {
            return Err(CodecError::format(format!(
                "unknown outcome determiner \"{}\"",
                tag.text
            )));
        }
        let dependency = self.text("determiner dependency")?;
        let threshold = self.int("determiner threshold")?;
        let below = self.choice_ref()?;
        let meets = self.choice_ref()?;
        Ok(OutcomeDeterminer::two_threshold(
            dependency, threshold, below, meets,
        ))
    }

    /// `{ C<k> [ D<j> ... ] ... }`, returning option indices per choice in label order.
    fn choices(&mut self, decision_count: usize) -> Result<Vec<Vec<usize>>> {
        self.expect("{")?;
        let mut blocks = Vec::new();
        let mut labels = HashSet::new();
        loop {
            let token = self.tokens.next_token()?;
            if token.is_symbol("}") {
                break;
            }
            let label = numbered(&token, 'C')?;
            if !labels.insert(label) {
                return Err(CodecError::format(format!("choice C{} listed twice", label)));
            }
            self.expect("[")?;
            let mut options = Vec::new();
            loop {
                let token = self.tokens.next_token()?;
                if token.is_symbol("]") {
                    break;
                }
                let index = numbered(&token, 'D')?;
                if index >= decision_count {
                    return Err(CodecError::format(format!(
                        "decision D{} is out of range",
                        index
                    )));
                }
                options.push(index);
            }
            blocks.push((label, options));
        }

        let mut ordered = vec![Vec::new(); blocks.len()];
        for (label, options) in blocks {
            let slot = ordered.get_mut(label).ok_or_else(|| {
                CodecError::format(format!("choice C{} is out of range", label))
            })?;
            *slot = options;
        }
        Ok(ordered)
    }

    /// A `C#` reference inside a decision.
    fn choice_ref(&mut self) -> Result<ChoiceId> {
        let index = self.choice_index()?;
        self.referenced_choices.push(index);
        Ok(self.slots.get(index))
    }

    fn choice_index(&mut self) -> Result<usize> {
        let token = self.tokens.next_token()?;
        numbered(&token, 'C')
    }

    fn description(&mut self) -> Result<String> {
        let description = self.text("description")?;
        if description.is_empty() {
            return Err(CodecError::format("empty decision description"));
        }
        Ok(description)
    }

    fn text(&mut self, what: &str) -> Result<String> {
        let token = self.tokens.next_token()?;
        if !token.quoted && is_structural(&token.text) {
            return Err(unexpected(what, &token));
        }
        Ok(token.text)
    }

    fn int(&mut self, what: &str) -> Result<i64> {
        let token = self.tokens.next_token()?;
        if token.quoted {
            return Err(unexpected(what, &token));
        }
        token.text.parse().map_err(|_| unexpected(what, &token))
    }

    fn expect(&mut self, symbol: &str) -> Result<()> {
        let token = self.tokens.next_token()?;
        if token.is_symbol(symbol) {
            Ok(())
        } else {
            Err(unexpected(symbol, &token))
        }
    }
}

/// Parse an id of the form `<prefix><index>`, such as `C3` or `D0`.
fn numbered(token: &Token, prefix: char) -> Result<usize> {
    if !token.quoted {
        if let Some(index) = token
            .text
            .strip_prefix(prefix)
            .and_then(|digits| digits.parse::<usize>().ok())
        {
            return Ok(index);
        }
    }
    Err(unexpected(&format!("{}#", prefix), token))
}

fn is_structural(text: &str) -> bool {
    matches!(text, "[" | "]" | "{" | "}" | "|")
}

fn unexpected(expected: &str, found: &Token) -> CodecError {
    CodecError::format(format!("expected {}, found \"{}\"", expected, found.text))
}
