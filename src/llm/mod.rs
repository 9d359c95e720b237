//! LLM Module: Vocabulary, network, weights and generation
//!
//! # Components
//! - `vocab.rs`: Symbol ↔ index bijections and the per-language artifact
//! - `tokenizer.rs`: Tokenize, pad and detokenize
//! - `model.rs`: Candle embedding + GRU/LSTM network
//! - `weights.rs`: Weight file formats and loading
//! - `generate.rs`: Greedy step-by-step transliteration

pub mod generate;
pub mod model;
pub mod tokenizer;
pub mod vocab;
pub mod weights;

pub use generate::{generate, StepModel, Transliterator};
pub use model::{CellType, HiddenState, ModelConfig, Reduction, TransliterateNet};
pub use vocab::{LanguageVocab, Vocabulary};
