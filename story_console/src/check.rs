//! Story validation and summary

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use story_graph::{StoryGame, StoryNodes};

/// Load a story file and report its shape.
pub fn run_check_command(file: &Path, as_json: bool) -> Result<()> {
    let story = story_text::import_file(file)
        .with_context(|| format!("Failed to load story from {}", file.display()))?;
    let summary = summarize(&story)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Checking story at: {}", file.display());
    println!("  Name: {}", story.name());
    println!("  Statuses: {}", summary["statuses"].as_object().map_or(0, |s| s.len()));
    println!("  Choices: {}", summary["choices"]);
    println!("  Decisions: {}", summary["decisions"]);
    println!("  Endings: {}", summary["endings"]);
    let unreachable = summary["unreachable_choices"].as_u64().unwrap_or(0);
    if unreachable > 0 {
        println!("  {} choice(s) can't be reached from the start", unreachable);
    }
    println!();
    println!("Check complete!");

    Ok(())
}

fn summarize(story: &StoryGame) -> Result<serde_json::Value> {
    let graph = story.graph();
    let nodes = StoryNodes::collect(graph, story.initial_choice())?;
    let endings = nodes
        .choices()
        .iter()
        .filter_map(|id| graph.choice(*id))
        .filter(|choice| choice.is_terminal())
        .count();
    let statuses: serde_json::Map<String, serde_json::Value> = story
        .original_statuses()
        .iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect();

    Ok(json!({
        "name": story.name(),
        "statuses": statuses,
        "choices": nodes.choice_count(),
        "decisions": nodes.decision_count(),
        "endings": endings,
        "unreachable_choices": graph.choice_count() - nodes.choice_count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let story = story_text::import_str(
            "\"Go Right\" [ \"steps\" 0 ] { [ SIMPLE \"Go left\" C0 ] \
             [ CONSEQUENTIAL \"Go right\" [ ADD 1 \"steps\" ] C1 ] } \
             { C0 [ D0 D1 ] C1 [ ] } C0",
        )
        .unwrap();

        let summary = summarize(&story).unwrap();

        assert_eq!(summary["name"], "Go Right");
        assert_eq!(summary["statuses"]["steps"], 0);
        assert_eq!(summary["choices"], 2);
        assert_eq!(summary["decisions"], 2);
        assert_eq!(summary["endings"], 1);
        assert_eq!(summary["unreachable_choices"], 0);
    }
}
