//! Interactive play loop

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use story_graph::{PlayState, StoryError, StoryGame};

/// What the player typed.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Pick(usize),
    Restart,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "restart" | "r" => Some(Command::Restart),
        "quit" | "q" => Some(Command::Quit),
        number => match number.parse::<usize>() {
            Ok(n) if n >= 1 => Some(Command::Pick(n - 1)),
            _ => None,
        },
    }
}

/// Load a story file and play it on stdin/stdout.
pub fn run_play_command(file: &Path) -> Result<()> {
    let story = story_text::import_file(file)
        .with_context(|| format!("Failed to load story from {}", file.display()))?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    play(story, stdin.lock(), stdout.lock())
}

fn play<R: BufRead, W: Write>(mut story: StoryGame, input: R, mut out: W) -> Result<()> {
    writeln!(out, "{}", story.name())?;
    show(&story, &mut out)?;
    if story.state() == PlayState::Terminal {
        return Ok(());
    }

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Restart) => story.restart(),
            Some(Command::Pick(index)) => match story.next(index) {
                Ok(_) => {}
                Err(StoryError::IndexOutOfRange { len, .. }) => {
                    writeln!(out, "Pick a number from 1 to {}", len)?;
                    continue;
                }
                Err(e) => return Err(e).context("Story can't continue"),
            },
            None => {
                writeln!(out, "Type an option number, restart or quit.")?;
                continue;
            }
        }
        show(&story, &mut out)?;
        if story.state() == PlayState::Terminal {
            break;
        }
    }

    out.flush()?;
    Ok(())
}

fn show<W: Write>(story: &StoryGame, out: &mut W) -> Result<()> {
    let statuses: Vec<String> = story
        .statuses()
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    if !statuses.is_empty() {
        writeln!(out, "[{}]", statuses.join(", "))?;
    }
    writeln!(out, "{}", story.current_choice_text())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_graph::GAME_OVER;

    const GO_RIGHT: &str = "\"Go Right\" [ \"steps\" 0 ] { [ SIMPLE \"Go left\" C0 ] \
                            [ CONSEQUENTIAL \"Go right\" [ ADD 1 \"steps\" ] C1 ] } \
                            { C0 [ D0 D1 ] C1 [ ] } C0";

    fn run(script: &str) -> String {
        let story = story_text::import_str(GO_RIGHT).unwrap();
        let mut out = Vec::new();
        play(story, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(" 2 "), Some(Command::Pick(1)));
        assert_eq!(parse_command("restart"), Some(Command::Restart));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("0"), None);
        assert_eq!(parse_command("left"), None);
    }

    #[test]
    fn test_play_to_the_end() {
        let output = run("1\n2\n");

        assert_eq!(
            output,
            "Go Right\n\
             [steps=0]\nGo left(1) or Go right(2)\n\
             [steps=0]\nGo left(1) or Go right(2)\n\
             [steps=1]\nGame over, no choices left.\n"
        );
    }

    #[test]
    fn test_bad_input_keeps_position() {
        let output = run("5\nhello\n1\nrestart\nquit\n2\n");

        assert!(output.contains("Pick a number from 1 to 2\n"));
        assert!(output.contains("Type an option number, restart or quit.\n"));
        assert!(!output.contains(GAME_OVER));
        assert!(output.ends_with("[steps=0]\nGo left(1) or Go right(2)\n"));
    }

    #[test]
    fn test_input_after_the_end_is_ignored() {
        let output = run("2\n1\n");

        assert!(output.ends_with("[steps=1]\nGame over, no choices left.\n"));
    }
}
