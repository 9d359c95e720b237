//! Session state tracking
//!
//! Maintains:
//! - Words transliterated and rejected
//! - Characters that fell outside the source alphabet
//! - Session duration

use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::TranslitError;

/// Counters for one interactive session
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Words successfully transliterated
    pub words_transliterated: u32,
    /// Words rejected with a per-request error
    pub words_rejected: u32,
    /// Unknown character → occurrences
    pub unknown_chars: BTreeMap<char, u32>,
    /// Session start time
    pub start_time: Option<Instant>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            words_transliterated: 0,
            words_rejected: 0,
            unknown_chars: BTreeMap::new(),
            start_time: None,
        }
    }

    /// Start the session timer
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get session duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn record_success(&mut self) {
        self.words_transliterated += 1;
    }

    /// Record a rejected word
    pub fn record_rejection(&mut self, error: &TranslitError) {
        self.words_rejected += 1;
        if let TranslitError::UnknownCharacter { character, .. } = error {
            *self.unknown_chars.entry(*character).or_insert(0) += 1;
        }
    }

    pub fn total_words(&self) -> u32 {
        self.words_transliterated + self.words_rejected
    }

    /// Unknown characters, most frequent first
    pub fn problematic_chars(&self) -> Vec<(char, u32)> {
        let mut chars: Vec<_> = self.unknown_chars.iter().map(|(&c, &n)| (c, n)).collect();
        chars.sort_by(|a, b| b.1.cmp(&a.1));
        chars
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
