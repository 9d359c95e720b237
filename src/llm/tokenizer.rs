//! Tokenizer: word ↔ padded token sequence
//!
//! Pure functions. Index 0 is the padding sentinel on the source side and is
//! never produced for a real character.

use crate::error::{Result, TranslitError};
use crate::llm::vocab::Vocabulary;

/// Padding sentinel for tokenized source words
pub const PAD_INDEX: u32 = 0;

/// Map each character of `word` to its token index
pub fn tokenize(word: &str, vocab: &Vocabulary) -> Result<Vec<u32>> {
    word.chars()
        .enumerate()
        .map(|(position, character)| {
            vocab
                .char_to_token(character)
                .ok_or(TranslitError::UnknownCharacter {
                    character,
                    position,
                })
        })
        .collect()
}

/// Right-pad `tokens` with `pad_value` up to `target_len`. Never truncates.
pub fn pad(mut tokens: Vec<u32>, target_len: usize, pad_value: u32) -> Vec<u32> {
    if tokens.len() < target_len {
        tokens.resize(target_len, pad_value);
    }
    tokens
}

/// Map indices back to symbols, stopping at the first `pad_value`
pub fn detokenize(indices: &[u32], vocab: &Vocabulary, pad_value: u32) -> Result<Vec<String>> {
    indices
        .iter()
        .take_while(|&&index| index != pad_value)
        .map(|&index| {
            vocab
                .token_to_symbol(index)
                .map(str::to_owned)
                .ok_or(TranslitError::UnknownIndex(index))
        })
        .collect()
}
