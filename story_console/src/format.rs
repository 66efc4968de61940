//! Canonical re-export of story files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use story_text::TextConfig;

/// Load a story and write it back out in canonical layout.
pub fn run_format_command(file: &Path, output: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let story = story_text::import_file(file)
        .with_context(|| format!("Failed to load story from {}", file.display()))?;

    let path: PathBuf = match output {
        Some(path) => {
            story_text::export_file(&story, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path.to_path_buf()
        }
        None => {
            let config = match config {
                Some(path) => TextConfig::load(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?,
                None => TextConfig::default(),
            };
            story_text::export_to_default(&story, &config)
                .context("Failed to write story file")?
        }
    };

    tracing::debug!(source = %file.display(), output = %path.display(), "formatted story");
    println!("Story saved to: {}", path.display());
    Ok(())
}
