//! Vocabulary: symbol ↔ token index bijection
//!
//! Handles:
//! - Source alphabet (English letters → token IDs)
//! - Target script (token IDs → Indic symbols)
//! - Loading the per-language vocabulary artifact

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, TranslitError};

/// Bijective mapping between vocabulary symbols and token indices
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    /// Symbol → Token ID mapping
    symbol_to_id: FxHashMap<String, u32>,
    /// Token ID → Symbol reverse mapping
    id_to_symbol: FxHashMap<u32, String>,
}

impl Vocabulary {
    /// Build from a symbol → index map (source side layout)
    pub fn from_symbol_to_index(map: FxHashMap<String, u32>) -> Result<Self> {
        let mut id_to_symbol = FxHashMap::default();
        for (symbol, &id) in &map {
            if let Some(previous) = id_to_symbol.insert(id, symbol.clone()) {
                return Err(TranslitError::InvalidVocabulary(format!(
                    "index {} is assigned to both {:?} and {:?}",
                    id, previous, symbol
                )));
            }
        }
        Ok(Vocabulary {
            symbol_to_id: map,
            id_to_symbol,
        })
    }

    /// Build from an index → symbol map (target side layout)
    pub fn from_index_to_symbol(map: FxHashMap<u32, String>) -> Result<Self> {
        let mut symbol_to_id = FxHashMap::default();
        for (&id, symbol) in &map {
            if let Some(previous) = symbol_to_id.insert(symbol.clone(), id) {
                return Err(TranslitError::InvalidVocabulary(format!(
                    "symbol {:?} is assigned to both {} and {}",
                    symbol, previous, id
                )));
            }
        }
        Ok(Vocabulary {
            symbol_to_id,
            id_to_symbol: map,
        })
    }

    /// Reject a real character at `pad_index`
    pub fn reserve_padding(self, pad_index: u32) -> Result<Self> {
        if let Some(symbol) = self.id_to_symbol.get(&pad_index) {
            if symbol.chars().count() == 1 {
                return Err(TranslitError::InvalidVocabulary(format!(
                    "index {} is reserved for padding but maps to {:?}",
                    pad_index, symbol
                )));
            }
        }
        Ok(self)
    }

    /// Convert character to token ID
    pub fn char_to_token(&self, c: char) -> Option<u32> {
        let mut buf = [0u8; 4];
        self.symbol_to_id.get(&*c.encode_utf8(&mut buf)).copied()
    }

    /// Convert token ID to its symbol
    pub fn token_to_symbol(&self, token_id: u32) -> Option<&str> {
        self.id_to_symbol.get(&token_id).map(String::as_str)
    }

    /// Get vocabulary size
    pub fn size(&self) -> usize {
        self.id_to_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_symbol.is_empty()
    }

    /// Reject indices outside `0..size`; the network's embedding and
    /// output layers are sized by `size()`.
    pub fn check_dense(&self, side: &str) -> Result<()> {
        let size = self.size();
        match self.id_to_symbol.iter().find(|(&id, _)| id as usize >= size) {
            Some((id, symbol)) => Err(TranslitError::InvalidVocabulary(format!(
                "{} index {} for {:?} is out of range for {} symbols",
                side, id, symbol, size
            ))),
            None => Ok(()),
        }
    }

    /// Detokenization sentinel used on the target side: the last index.
    pub fn last_index(&self) -> u32 {
        self.size().saturating_sub(1) as u32
    }
}

/// On-disk layout of `vars/<code>.json`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabArtifact {
    pub en_voc2ind: FxHashMap<String, u32>,
    pub lang_ind2voc: FxHashMap<u32, String>,
    pub seq_len: usize,
}

/// Loaded vocabularies for one language pair
#[derive(Clone, Debug)]
pub struct LanguageVocab {
    pub source: Vocabulary,
    pub target: Vocabulary,
    pub seq_len: usize,
}

impl LanguageVocab {
    /// Load and validate a vocabulary artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| TranslitError::artifact(path, e))?;
        let artifact: VocabArtifact = serde_json::from_str(&content)
            .map_err(|e| TranslitError::artifact(path, format!("malformed artifact: {}", e)))?;

        let vocab = Self::from_artifact(artifact).map_err(|e| TranslitError::artifact(path, e))?;
        info!(
            path = %path.display(),
            source_size = vocab.source.size(),
            target_size = vocab.target.size(),
            seq_len = vocab.seq_len,
            "vocabulary loaded"
        );
        Ok(vocab)
    }

    pub fn from_artifact(artifact: VocabArtifact) -> Result<Self> {
        if artifact.seq_len == 0 {
            return Err(TranslitError::InvalidVocabulary(
                "seq_len must be at least 1".into(),
            ));
        }
        let source = Vocabulary::from_symbol_to_index(artifact.en_voc2ind)?
            .reserve_padding(crate::llm::tokenizer::PAD_INDEX)?;
        let target = Vocabulary::from_index_to_symbol(artifact.lang_ind2voc)?;
        if target.is_empty() {
            return Err(TranslitError::InvalidVocabulary(
                "target vocabulary is empty".into(),
            ));
        }
        source.check_dense("source")?;
        target.check_dense("target")?;
        Ok(LanguageVocab {
            source,
            target,
            seq_len: artifact.seq_len,
        })
    }

    /// Save as a JSON artifact
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let artifact = VocabArtifact {
            en_voc2ind: self.source.symbol_to_id.clone(),
            lang_ind2voc: self.target.id_to_symbol.clone(),
            seq_len: self.seq_len,
        };
        fs::write(path, serde_json::to_string_pretty(&artifact)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_map(entries: &[(&str, u32)]) -> FxHashMap<String, u32> {
        entries.iter().map(|&(s, i)| (s.to_string(), i)).collect()
    }

    #[test]
    fn test_lookup_both_directions() {
        let vocab =
            Vocabulary::from_symbol_to_index(source_map(&[("<pad>", 0), ("a", 1), ("b", 2)]))
                .unwrap();
        assert_eq!(vocab.char_to_token('a'), Some(1));
        assert_eq!(vocab.char_to_token('z'), None);
        assert_eq!(vocab.token_to_symbol(2), Some("b"));
        assert_eq!(vocab.size(), 3);
        assert_eq!(vocab.last_index(), 2);
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let err = Vocabulary::from_symbol_to_index(source_map(&[("a", 1), ("b", 1)])).unwrap_err();
        assert!(matches!(err, TranslitError::InvalidVocabulary(_)));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let map: FxHashMap<u32, String> =
            [(1, "க".to_string()), (2, "க".to_string())].into_iter().collect();
        assert!(Vocabulary::from_index_to_symbol(map).is_err());
    }

    #[test]
    fn test_padding_reservation() {
        let ok = Vocabulary::from_symbol_to_index(source_map(&[("pad", 0), ("a", 1)]))
            .unwrap()
            .reserve_padding(0);
        assert!(ok.is_ok());

        let bad = Vocabulary::from_symbol_to_index(source_map(&[("x", 0), ("a", 1)]))
            .unwrap()
            .reserve_padding(0);
        assert!(bad.is_err());
    }

    #[test]
    fn test_artifact_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ta.json");
        fs::write(
            &path,
            r#"{
                "en_voc2ind": {"<pad>": 0, "a": 1, "m": 2},
                "lang_ind2voc": {"0": "அ", "1": "ம", "2": "<pad>"},
                "seq_len": 4
            }"#,
        )
        .unwrap();

        let vocab = LanguageVocab::load(&path).unwrap();
        assert_eq!(vocab.seq_len, 4);
        assert_eq!(vocab.source.char_to_token('m'), Some(2));
        assert_eq!(vocab.target.token_to_symbol(1), Some("ம"));
        assert_eq!(vocab.target.last_index(), 2);
    }

    #[test]
    fn test_artifact_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hi.json");
        let artifact = VocabArtifact {
            en_voc2ind: source_map(&[("pad", 0), ("k", 1)]),
            lang_ind2voc: [(0, "क".to_string()), (1, "<pad>".to_string())]
                .into_iter()
                .collect(),
            seq_len: 2,
        };
        LanguageVocab::from_artifact(artifact)
            .unwrap()
            .save(&path)
            .unwrap();

        let loaded = LanguageVocab::load(&path).unwrap();
        assert_eq!(loaded.source.char_to_token('k'), Some(1));
        assert_eq!(loaded.target.token_to_symbol(0), Some("क"));
    }

    #[test]
    fn test_missing_artifact_is_load_error() {
        let err = LanguageVocab::load("/nonexistent/vars/ml.json").unwrap_err();
        assert!(matches!(err, TranslitError::ArtifactLoad { .. }));
    }

    #[test]
    fn test_sparse_source_indices_rejected() {
        let artifact = VocabArtifact {
            en_voc2ind: source_map(&[("pad", 0), ("a", 1), ("z", 7)]),
            lang_ind2voc: [(0, "அ".to_string()), (1, "<pad>".to_string())]
                .into_iter()
                .collect(),
            seq_len: 3,
        };
        let err = LanguageVocab::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, TranslitError::InvalidVocabulary(ref m) if m.contains("index 7")));
    }

    #[test]
    fn test_sparse_target_indices_rejected() {
        let artifact = VocabArtifact {
            en_voc2ind: source_map(&[("pad", 0), ("a", 1)]),
            lang_ind2voc: [(0, "அ".to_string()), (5, "<pad>".to_string())]
                .into_iter()
                .collect(),
            seq_len: 3,
        };
        assert!(matches!(
            LanguageVocab::from_artifact(artifact),
            Err(TranslitError::InvalidVocabulary(_))
        ));
    }

    #[test]
    fn test_sparse_artifact_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ml.json");
        fs::write(
            &path,
            r#"{
                "en_voc2ind": {"pad": 0, "a": 1, "z": 7},
                "lang_ind2voc": {"0": "അ", "1": "<pad>"},
                "seq_len": 3
            }"#,
        )
        .unwrap();
        let err = LanguageVocab::load(&path).unwrap_err();
        assert!(matches!(err, TranslitError::ArtifactLoad { .. }));
    }

    #[test]
    fn test_zero_seq_len_rejected() {
        let artifact = VocabArtifact {
            en_voc2ind: source_map(&[("a", 1)]),
            lang_ind2voc: [(0, "அ".to_string())].into_iter().collect(),
            seq_len: 0,
        };
        assert!(LanguageVocab::from_artifact(artifact).is_err());
    }
}
