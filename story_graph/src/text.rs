//! Rules for text that is written out as a quoted token.
//!
//! Story files split on whitespace and re-join a quoted run with single spaces, ending it at the
//! first word that closes with `"`. Text survives that only if it has no whitespace besides
//! single spaces, and no inner word ends with a quote.

use crate::error::{Result, StoryError};

/// Check if `text` reads back unchanged after being written as `"<text>"`.
pub fn is_encodable(text: &str) -> bool {
    if text.chars().any(|c| c.is_whitespace() && c != ' ') {
        return false;
    }
    let words: Vec<&str> = text.split(' ').collect();
    let last = words.len() - 1;
    words.iter().enumerate().all(|(i, word)| {
        if i == last {
            return true;
        }
        // A leading empty word is the lone opening quote, which never closes the run.
        (i == 0 || !word.is_empty()) && !word.ends_with('"')
    })
}

/// Fail with [`StoryError::UnencodableText`] unless `text` is encodable.
pub fn ensure_encodable(text: &str) -> Result<()> {
    if is_encodable(text) {
        Ok(())
    } else {
        Err(StoryError::UnencodableText(text.to_string()))
    }
}
