//! Greedy transliteration of a single word
//!
//! The padded source word is fed one token at a time; the arg-max of each step's
//! distribution becomes the next output index.

use candle_core::Tensor;
use tracing::debug;

use crate::error::{Result, TranslitError};
use crate::llm::model::{HiddenState, TransliterateNet};
use crate::llm::tokenizer::{detokenize, pad, tokenize, PAD_INDEX};
use crate::llm::vocab::{LanguageVocab, Vocabulary};

/// Temperature used for generation: plain softmax, no sharpening
pub const GREEDY_TEMPERATURE: f64 = 1.0;

/// A network that can be advanced one token at a time
pub trait StepModel {
    type State;

    /// Distribution over target indices (any shape, one entry per index) and the
    /// state to pass to the next step
    fn infer_step(
        &self,
        token: u32,
        state: Option<&Self::State>,
        temperature: f64,
    ) -> Result<(Tensor, Self::State)>;
}

impl StepModel for TransliterateNet {
    type State = HiddenState;

    fn infer_step(
        &self,
        token: u32,
        state: Option<&HiddenState>,
        temperature: f64,
    ) -> Result<(Tensor, HiddenState)> {
        TransliterateNet::infer_step(self, token, state, temperature)
    }
}

/// Transliterate `word` into a sequence of target symbols
pub fn generate<M: StepModel>(
    word: &str,
    model: &M,
    source: &Vocabulary,
    target: &Vocabulary,
    seq_len: usize,
) -> Result<Vec<String>> {
    let tokens = tokenize(word, source)?;
    if tokens.len() > seq_len {
        return Err(TranslitError::InputTooLong {
            len: tokens.len(),
            max: seq_len,
        });
    }
    let padded = pad(tokens, seq_len, PAD_INDEX);
    debug!(word, tokens = ?padded, "generating");

    let mut hidden: Option<M::State> = None;
    let mut output = Vec::with_capacity(padded.len());
    for &token in &padded {
        let (probs, next) = model.infer_step(token, hidden.as_ref(), GREEDY_TEMPERATURE)?;
        output.push(argmax(&probs)?);
        hidden = Some(next);
    }

    debug!(indices = ?output, "decoded");
    detokenize(&output, target, target.last_index())
}

fn argmax(probs: &Tensor) -> Result<u32> {
    Ok(probs.flatten_all()?.argmax(0)?.to_scalar::<u32>()?)
}

/// Model plus the vocabularies it was trained with
pub struct Transliterator<M> {
    model: M,
    vocab: LanguageVocab,
}

impl<M: StepModel> Transliterator<M> {
    pub fn new(model: M, vocab: LanguageVocab) -> Self {
        Transliterator { model, vocab }
    }

    /// Transliterate `word` and join the symbols
    pub fn transliterate(&self, word: &str) -> Result<String> {
        let symbols = generate(
            word,
            &self.model,
            &self.vocab.source,
            &self.vocab.target,
            self.vocab.seq_len,
        )?;
        Ok(symbols.concat())
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm::model::{CellType, ModelConfig};
    use crate::llm::vocab::VocabArtifact;
    use candle_core::{DType, Device};
    use candle_nn::{VarBuilder, VarMap};
    use rustc_hash::FxHashMap;
    use std::cell::RefCell;

    /// Replays a fixed list of arg-max indices and records what it was fed
    pub(crate) struct ScriptedModel {
        pub outputs: Vec<u32>,
        pub vocab_size: usize,
        pub calls: RefCell<Vec<(u32, Option<usize>)>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(outputs: Vec<u32>, vocab_size: usize) -> Self {
            ScriptedModel {
                outputs,
                vocab_size,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl StepModel for ScriptedModel {
        type State = usize;

        fn infer_step(
            &self,
            token: u32,
            state: Option<&usize>,
            _temperature: f64,
        ) -> Result<(Tensor, usize)> {
            let step = self.calls.borrow().len();
            self.calls.borrow_mut().push((token, state.copied()));
            let mut probs = vec![0.01f32; self.vocab_size];
            probs[self.outputs[step % self.outputs.len()] as usize] = 0.9;
            let probs = Tensor::new(probs.as_slice(), &Device::Cpu)?.unsqueeze(0)?;
            Ok((probs, step))
        }
    }

    /// Source `{pad:0, a:1, b:2}`, target of size 5 (sentinel 4), seq_len 3
    pub(crate) fn toy_vocab() -> LanguageVocab {
        let en_voc2ind: FxHashMap<String, u32> = [("pad", 0), ("a", 1), ("b", 2)]
            .into_iter()
            .map(|(s, i)| (s.to_string(), i))
            .collect();
        let lang_ind2voc: FxHashMap<u32, String> = ["அ", "ப", "ம", "ா", "<pad>"]
            .iter()
            .enumerate()
            .map(|(i, s)| (i as u32, s.to_string()))
            .collect();
        LanguageVocab::from_artifact(VocabArtifact {
            en_voc2ind,
            lang_ind2voc,
            seq_len: 3,
        })
        .unwrap()
    }

    #[test]
    fn test_toy_scenario_feeds_padded_tokens() {
        let vocab = toy_vocab();
        let model = ScriptedModel::new(vec![0, 3, 2], 5);
        let out = generate("ab", &model, &vocab.source, &vocab.target, vocab.seq_len).unwrap();
        assert_eq!(out, vec!["அ", "ா", "ம"]);

        let calls = model.calls.borrow();
        let tokens: Vec<u32> = calls.iter().map(|(t, _)| *t).collect();
        assert_eq!(tokens, vec![1, 2, 0]);
    }

    #[test]
    fn test_hidden_state_threaded_from_absent() {
        let vocab = toy_vocab();
        let model = ScriptedModel::new(vec![1], 5);
        generate("a", &model, &vocab.source, &vocab.target, vocab.seq_len).unwrap();

        let states: Vec<Option<usize>> = model.calls.borrow().iter().map(|(_, s)| *s).collect();
        assert_eq!(states, vec![None, Some(0), Some(1)]);
    }

    #[test]
    fn test_output_truncated_at_target_sentinel() {
        let vocab = toy_vocab();
        let model = ScriptedModel::new(vec![1, 4, 2], 5);
        let out = generate("ab", &model, &vocab.source, &vocab.target, vocab.seq_len).unwrap();
        assert_eq!(out, vec!["ப"]);
        // All three steps still run
        assert_eq!(model.calls.borrow().len(), 3);
    }

    #[test]
    fn test_unknown_character_aborts_before_inference() {
        let vocab = toy_vocab();
        let model = ScriptedModel::new(vec![1], 5);
        let err = generate("ac", &model, &vocab.source, &vocab.target, vocab.seq_len).unwrap_err();
        assert!(matches!(
            err,
            TranslitError::UnknownCharacter {
                character: 'c',
                position: 1
            }
        ));
        assert!(model.calls.borrow().is_empty());
    }

    #[test]
    fn test_too_long_input_rejected() {
        let vocab = toy_vocab();
        let model = ScriptedModel::new(vec![1], 5);
        let err = generate("abab", &model, &vocab.source, &vocab.target, vocab.seq_len).unwrap_err();
        assert!(matches!(err, TranslitError::InputTooLong { len: 4, max: 3 }));
    }

    #[test]
    fn test_empty_word_runs_full_padding() {
        let vocab = toy_vocab();
        let model = ScriptedModel::new(vec![2], 5);
        let out = generate("", &model, &vocab.source, &vocab.target, vocab.seq_len).unwrap();
        assert_eq!(out.concat(), "மமம");
    }

    #[test]
    fn test_transliterator_joins_symbols() {
        let translit = Transliterator::new(ScriptedModel::new(vec![2, 3, 4], 5), toy_vocab());
        assert_eq!(translit.transliterate("ab").unwrap(), "மா");
    }

    #[test]
    fn test_real_network_output_is_bounded() {
        let vocab = toy_vocab();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let config = ModelConfig::new(3, 5, CellType::Gru).with_feature_size(8);
        let model = TransliterateNet::new(config, vb).unwrap();

        let translit = Transliterator::new(model, vocab);
        let out = translit.transliterate("ba").unwrap();
        assert!(out.chars().count() <= 3);
        assert!(!out.contains("<pad>"));
    }
}
