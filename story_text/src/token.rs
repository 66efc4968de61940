//! Tokenizer for story files.
//!
//! Tokens are whitespace-delimited words, with one quoting rule: a word starting with `"` absorbs
//! the following words, re-joined by single spaces, until the joined text ends with `"`. The
//! enclosing quotes are then stripped, so `""""` reads as the two-character text `""`.

use std::str::SplitWhitespace;

use crate::error::{CodecError, Result};

/// A single word, or a quoted run of words with its quotes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Quoted tokens never act as structural symbols such as `[` or `}`.
    pub quoted: bool,
}

impl Token {
    /// Check if this is the unquoted symbol `symbol`.
    pub fn is_symbol(&self, symbol: &str) -> bool {
        !self.quoted && self.text == symbol
    }
}

/// Pull-based token stream with one token of lookahead.
pub struct Tokens<'a> {
    words: SplitWhitespace<'a>,
    peeked: Option<Token>,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            words: input.split_whitespace(),
            peeked: None,
        }
    }

    /// Take the next token, failing at end of input.
    pub fn next_token(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self
                .read()?
                .ok_or_else(|| CodecError::format("unexpected end of input")),
        }
    }

    /// Look at the next token without taking it.
    pub fn peek(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.read()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Check if the input is exhausted.
    pub fn is_done(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }

    fn read(&mut self) -> Result<Option<Token>> {
        let Some(word) = self.words.next() else {
            return Ok(None);
        };
        if !word.starts_with('"') {
            return Ok(Some(Token {
                text: word.to_string(),
                quoted: false,
            }));
        }

        let mut joined = word.to_string();
        while joined.len() < 2 || !joined.ends_with('"') {
            let next = self
                .words
                .next()
                .ok_or_else(|| CodecError::format("unterminated quoted text"))?;
            joined.push(' ');
            joined.push_str(next);
        }
        Ok(Some(Token {
            text: joined[1..joined.len() - 1].to_string(),
            quoted: true,
        }))
    }
}
