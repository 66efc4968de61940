//! Exporter - writes a story in the text format read by [`crate::import`].

use std::fs;
use std::path::{Path, PathBuf};

use story_graph::{text, ChoiceId, StoryError, StoryGame, StoryNodes};

use crate::config::TextConfig;
use crate::error::Result;

/// Serialize the definition of a story: its original statuses and everything reachable from its
/// initial choice. The session's progress is not part of the output.
///
/// Fails with [`StoryError::UnencodableText`] rather than write text that would read back
/// differently.
pub fn export_string(story: &StoryGame) -> Result<String> {
    let graph = story.graph();
    let nodes = StoryNodes::collect(graph, story.initial_choice())?;
    let id_of = |id: ChoiceId| nodes.choice_label(id);

    text::ensure_encodable(story.name())?;
    for name in story.original_statuses().names() {
        text::ensure_encodable(name)?;
    }
    for &id in nodes.decisions() {
        let decision = graph.decision(id).ok_or(StoryError::UnknownDecision(id))?;
        text::ensure_encodable(decision.description())?;
        for name in decision.referenced_statuses() {
            text::ensure_encodable(name)?;
        }
    }

    let mut out = format!("\"{}\"\n", story.name());

    out.push_str("[ ");
    for (name, value) in story.original_statuses().iter() {
        out.push_str(&format!("\"{}\" {} ", name, value));
    }
    out.push_str("]\n");

    out.push_str("{\n");
    for &id in nodes.decisions() {
        let decision = graph.decision(id).ok_or(StoryError::UnknownDecision(id))?;
        out.push_str(&format!("[ {} ]\n", decision.encode(&id_of)?));
    }
    out.push_str("}\n");

    out.push_str("{\n");
    for position in 0..nodes.choice_count() {
        out.push_str(&nodes.option_line(position));
        out.push('\n');
    }
    out.push_str("}\n");

    let initial = nodes
        .choice_label(story.initial_choice())
        .ok_or(StoryError::UnmappedChoice(story.initial_choice()))?;
    out.push_str(&initial);
    out.push('\n');

    tracing::trace!(
        story = story.name(),
        choices = nodes.choice_count(),
        decisions = nodes.decision_count(),
        "encoded story"
    );
    Ok(out)
}

/// Write a story to `path`.
///
/// The whole story is encoded before the file is opened, so an encoding failure leaves no file
/// behind.
pub fn export_file(story: &StoryGame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = export_string(story)?;
    fs::write(path, text)?;
    tracing::debug!(path = %path.display(), story = story.name(), "exported story");
    Ok(())
}

/// Write a story to the configured default location and return the path used.
pub fn export_to_default(story: &StoryGame, config: &TextConfig) -> Result<PathBuf> {
    let path = config.default_export_path(story.name());
    export_file(story, &path)?;
    Ok(path)
}
