//! English-to-Indic transliteration with a character-level recurrent network
//!
//! Loads per-language vocabulary and weight artifacts and transliterates words
//! one at a time with greedy decoding. Supported targets are Tamil, Malayalam,
//! Bengali and Hindi.

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;

pub use config::{ArtifactPaths, Language};
pub use error::{Result, TranslitError};
pub use llm::{CellType, LanguageVocab, ModelConfig, TransliterateNet, Transliterator};
