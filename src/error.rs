//! Error types for indic-translit

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for transliteration operations
pub type Result<T> = std::result::Result<T, TranslitError>;

/// Invalid user-supplied configuration (language code, cell type, reduction)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

/// Errors that can occur while loading artifacts or transliterating
#[derive(Debug, Error)]
pub enum TranslitError {
    /// Bad command line value
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vocabulary or weight file missing or unreadable
    #[error("failed to load {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Stored weights were trained for a different network shape
    #[error("architecture mismatch: expected {expected}, found {found}")]
    ArchitectureMismatch { expected: String, found: String },

    /// Vocabulary mapping is not a bijection or violates the padding reservation
    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    /// Input character outside the source alphabet
    #[error("character {character:?} at position {position} is not in the source alphabet")]
    UnknownCharacter { character: char, position: usize },

    /// Model produced an index with no target symbol
    #[error("index {0} has no symbol in the target vocabulary")]
    UnknownIndex(u32),

    /// Word has more characters than the model's fixed sequence length
    #[error("input has {len} characters but the model accepts at most {max}")]
    InputTooLong { len: usize, max: usize },

    /// Tensor operation failure
    #[error("model error: {0}")]
    Model(#[from] candle_core::Error),

    /// Vocabulary artifact is not valid JSON
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Weight bundle could not be (de)serialized
    #[error("bundle error: {0}")]
    Bundle(#[from] bincode::Error),

    /// Terminal I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranslitError {
    /// Whether the interactive loop can report this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TranslitError::UnknownCharacter { .. }
                | TranslitError::UnknownIndex(_)
                | TranslitError::InputTooLong { .. }
        )
    }

    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TranslitError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TranslitError::UnknownCharacter {
            character: '7',
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "character '7' at position 2 is not in the source alphabet"
        );

        let err = TranslitError::InputTooLong { len: 30, max: 22 };
        assert_eq!(
            err.to_string(),
            "input has 30 characters but the model accepts at most 22"
        );
    }

    #[test]
    fn test_config_error_wraps() {
        let err: TranslitError = ConfigError("unknown language code 'fr'".into()).into();
        assert_eq!(
            err.to_string(),
            "configuration error: unknown language code 'fr'"
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverable_variants() {
        assert!(TranslitError::UnknownIndex(9).is_recoverable());
        assert!(TranslitError::InputTooLong { len: 4, max: 3 }.is_recoverable());
        assert!(!TranslitError::artifact("vars/ta.json", "missing").is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        assert!(!TranslitError::from(io).is_recoverable());
    }

    #[test]
    fn test_artifact_display_includes_path() {
        let err = TranslitError::artifact("model/ta_gru.pt", "no such file");
        assert_eq!(err.to_string(), "failed to load model/ta_gru.pt: no such file");
    }
}
