//! Chirp body checks: length limit and banned-word masking.

use crate::error::{Error, Result};
use std::collections::HashSet;

/// Replacement for a banned word.
pub const MASK: &str = "****";

/// Default maximum chirp length in characters.
pub const DEFAULT_MAX_CHIRP_LENGTH: usize = 140;

/// Words masked when no list is configured.
pub const DEFAULT_BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Validates and cleans chirp bodies before they are shown.
#[derive(Debug, Clone)]
pub struct ChirpFilter {
    banned: HashSet<String>,
    max_length: usize,
}

impl Default for ChirpFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BANNED_WORDS, DEFAULT_MAX_CHIRP_LENGTH)
    }
}

impl ChirpFilter {
    /// Creates a filter masking `banned_words` (case-insensitively) and
    /// rejecting bodies longer than `max_length` characters.
    pub fn new<I, S>(banned_words: I, max_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            banned: banned_words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
            max_length,
        }
    }

    /// Maximum accepted body length in characters.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Rejects a body longer than the configured limit.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChirpTooLong` with the measured length.
    pub fn check_length(&self, body: &str) -> Result<()> {
        let length = body.chars().count();
        if length > self.max_length {
            return Err(Error::ChirpTooLong {
                length,
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// Masks banned words.
    ///
    /// The body is split on whitespace and re-joined with single spaces, so
    /// runs of whitespace collapse. Words are matched whole: "Fornax!" keeps
    /// its punctuation and is left alone.
    #[must_use]
    pub fn clean(&self, body: &str) -> String {
        body.split_whitespace()
            .map(|word| {
                if self.banned.contains(&word.to_lowercase()) {
                    MASK
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Checks the length, then returns the cleaned body.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChirpTooLong` if the body exceeds the limit.
    pub fn moderate(&self, body: &str) -> Result<String> {
        self.check_length(body)?;
        Ok(self.clean(body))
    }
}
