//! Language selection and per-language artifact locations
//!
//! Each supported language ships two artifacts:
//! - `<vars_dir>/<code>.json`: source/target vocabularies and sequence length
//! - `<model_dir>/<code>_<cell>.<ext>`: trained weights

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, Result, TranslitError};
use crate::llm::model::CellType;

/// Weight file extensions in lookup order
pub const WEIGHT_EXTENSIONS: [&str; 4] = ["safetensors", "pt", "pth", "bin"];

/// Target script of the transliteration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Tamil,
    Malayalam,
    Bengali,
    Hindi,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Tamil,
        Language::Malayalam,
        Language::Bengali,
        Language::Hindi,
    ];

    /// Two-letter code used on the command line and in artifact names
    pub fn code(self) -> &'static str {
        match self {
            Language::Tamil => "ta",
            Language::Malayalam => "ml",
            Language::Bengali => "bn",
            Language::Hindi => "hi",
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Language::Tamil => "Tamil",
            Language::Malayalam => "Malayalam",
            Language::Bengali => "Bengali",
            Language::Hindi => "Hindi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = Language::ALL.iter().map(|l| l.code()).collect();
                ConfigError(format!(
                    "unknown language code '{}' (valid codes: {})",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// Directory layout for vocabulary and weight artifacts
#[derive(Clone, Debug)]
pub struct ArtifactPaths {
    pub vars_dir: PathBuf,
    pub model_dir: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        ArtifactPaths {
            vars_dir: PathBuf::from("vars"),
            model_dir: PathBuf::from("model"),
        }
    }
}

impl ArtifactPaths {
    pub fn new(vars_dir: impl Into<PathBuf>, model_dir: impl Into<PathBuf>) -> Self {
        ArtifactPaths {
            vars_dir: vars_dir.into(),
            model_dir: model_dir.into(),
        }
    }

    /// Path of the vocabulary artifact for a language
    pub fn vocab_path(&self, lang: Language) -> PathBuf {
        self.vars_dir.join(format!("{}.json", lang.code()))
    }

    /// Candidate weight files, in lookup order
    pub fn weight_candidates(&self, lang: Language, cell: CellType) -> Vec<PathBuf> {
        WEIGHT_EXTENSIONS
            .iter()
            .map(|ext| {
                self.model_dir
                    .join(format!("{}_{}.{}", lang.code(), cell.name(), ext))
            })
            .collect()
    }

    /// First existing weight file for a language and cell type
    pub fn weights_path(&self, lang: Language, cell: CellType) -> Result<PathBuf> {
        let candidates = self.weight_candidates(lang, cell);
        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| {
                let tried: Vec<_> = candidates.iter().map(|p| p.display().to_string()).collect();
                TranslitError::artifact(
                    stem_path(&self.model_dir, lang, cell),
                    format!("no weight file found (tried {})", tried.join(", ")),
                )
            })
    }
}

fn stem_path(dir: &Path, lang: Language, cell: CellType) -> PathBuf {
    dir.join(format!("{}_{}", lang.code(), cell.name()))
}
