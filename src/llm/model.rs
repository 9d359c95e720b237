//! Candle transliteration network
//!
//! Embedding → recurrent layer → linear + leaky ReLU → recurrent layer → linear.
//! Handles:
//! - Full-sequence forward pass with an optional carried hidden state
//! - Single-token inference with temperature-scaled softmax
//! - Cross-entropy loss with selectable reduction
//!
//! Parameter names follow the PyTorch module the weights were trained with
//! (`encoder`, `rnn`, `midLayer`, `rnn2`, `decoder`).

use std::fmt;
use std::str::FromStr;

use candle_core::{Device, Tensor, D};
use candle_nn::rnn::{GRUConfig, GRUState, LSTMConfig, LSTMState, GRU, LSTM, RNN};
use candle_nn::{Embedding, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Lower bound applied to the sampling temperature
pub const MIN_TEMPERATURE: f64 = 1e-20;

/// Hidden width used by the published checkpoints
pub const DEFAULT_FEATURE_SIZE: usize = 128;

const LEAKY_RELU_SLOPE: f64 = 0.01;

/// Recurrent cell used by both recurrent layers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Gru,
    Lstm,
}

impl CellType {
    pub fn name(self) -> &'static str {
        match self {
            CellType::Gru => "gru",
            CellType::Lstm => "lstm",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellType {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gru" => Ok(CellType::Gru),
            "lstm" => Ok(CellType::Lstm),
            other => Err(ConfigError(format!(
                "RNN type must be either 'gru' or 'lstm', got '{}'",
                other
            ))),
        }
    }
}

/// How per-position losses are combined
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    Sum,
    None,
}

impl FromStr for Reduction {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Reduction::Mean),
            "sum" => Ok(Reduction::Sum),
            "none" => Ok(Reduction::None),
            other => Err(ConfigError(format!("unknown loss reduction '{}'", other))),
        }
    }
}

/// Network shape; must match the shape the weights were trained with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub en_vocab_size: usize,
    pub lang_vocab_size: usize,
    pub feature_size: usize,
    pub cell: CellType,
}

impl ModelConfig {
    pub fn new(en_vocab_size: usize, lang_vocab_size: usize, cell: CellType) -> Self {
        ModelConfig {
            en_vocab_size,
            lang_vocab_size,
            feature_size: DEFAULT_FEATURE_SIZE,
            cell,
        }
    }

    pub fn with_feature_size(mut self, feature_size: usize) -> Self {
        self.feature_size = feature_size;
        self
    }
}

/// Recurrent state carried between calls
#[derive(Clone, Debug)]
pub enum HiddenState {
    Gru(GRUState),
    Lstm(LSTMState),
}

impl HiddenState {
    /// Hidden activations, shape (batch, feature)
    pub fn h(&self) -> &Tensor {
        match self {
            HiddenState::Gru(state) => state.h(),
            HiddenState::Lstm(state) => state.h(),
        }
    }
}

#[derive(Debug)]
enum Recurrent {
    Gru(GRU),
    Lstm(LSTM),
}

impl Recurrent {
    fn new(cell: CellType, size: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(match cell {
            CellType::Gru => Recurrent::Gru(candle_nn::rnn::gru(
                size,
                size,
                GRUConfig::default(),
                vb,
            )?),
            CellType::Lstm => Recurrent::Lstm(candle_nn::rnn::lstm(
                size,
                size,
                LSTMConfig::default(),
                vb,
            )?),
        })
    }

    fn zero_state(&self, batch: usize) -> candle_core::Result<HiddenState> {
        Ok(match self {
            Recurrent::Gru(rnn) => HiddenState::Gru(rnn.zero_state(batch)?),
            Recurrent::Lstm(rnn) => HiddenState::Lstm(rnn.zero_state(batch)?),
        })
    }

    /// Run over `xs` (batch, seq, feature) starting from `init`.
    /// Returns per-position outputs and the final state.
    fn run(&self, xs: &Tensor, init: &HiddenState) -> candle_core::Result<(Tensor, HiddenState)> {
        match (self, init) {
            (Recurrent::Gru(rnn), HiddenState::Gru(state)) => {
                let states = rnn.seq_init(xs, state)?;
                let out = stack_hidden(states.iter().map(GRUState::h))?;
                let last = states.last().cloned().unwrap_or_else(|| state.clone());
                Ok((out, HiddenState::Gru(last)))
            }
            (Recurrent::Lstm(rnn), HiddenState::Lstm(state)) => {
                let states = rnn.seq_init(xs, state)?;
                let out = stack_hidden(states.iter().map(LSTMState::h))?;
                let last = states.last().cloned().unwrap_or_else(|| state.clone());
                Ok((out, HiddenState::Lstm(last)))
            }
            _ => Err(candle_core::Error::Msg(
                "hidden state does not match the recurrent cell type".into(),
            )),
        }
    }
}

/// Per-step hidden activations (batch, feature) → (batch, seq, feature)
fn stack_hidden<'a>(hs: impl Iterator<Item = &'a Tensor>) -> candle_core::Result<Tensor> {
    let hs: Vec<Tensor> = hs.cloned().collect();
    Tensor::stack(&hs, 1)
}

/// English → Indic character transliteration network
#[derive(Debug)]
pub struct TransliterateNet {
    config: ModelConfig,
    device: Device,
    encoder: Embedding,
    rnn: Recurrent,
    mid_layer: Linear,
    rnn2: Recurrent,
    decoder: Linear,
}

impl TransliterateNet {
    /// Build the network, reading every parameter from `vb`.
    /// Missing tensors or shape mismatches fail here.
    pub fn new(config: ModelConfig, vb: VarBuilder) -> Result<Self> {
        let features = config.feature_size;
        let device = vb.device().clone();
        let encoder = candle_nn::embedding(config.en_vocab_size, features, vb.pp("encoder"))?;
        let rnn = Recurrent::new(config.cell, features, vb.pp("rnn"))?;
        let mid_layer = candle_nn::linear(features, features, vb.pp("midLayer"))?;
        let rnn2 = Recurrent::new(config.cell, features, vb.pp("rnn2"))?;
        let decoder = candle_nn::linear(features, config.lang_vocab_size, vb.pp("decoder"))?;

        Ok(TransliterateNet {
            config,
            device,
            encoder,
            rnn,
            mid_layer,
            rnn2,
            decoder,
        })
    }

    /// Forward pass over `tokens` (batch, seq) of u32 indices.
    ///
    /// Returns logits (batch, seq, lang_vocab_size) and the hidden state after the
    /// last position. One state threads through both recurrent layers: the first
    /// layer starts from `hidden`, the second from the first layer's final state.
    pub fn forward(
        &self,
        tokens: &Tensor,
        hidden: Option<&HiddenState>,
    ) -> Result<(Tensor, HiddenState)> {
        let (batch, _seq_len) = tokens.dims2()?;
        let init = match hidden {
            Some(state) => state.clone(),
            None => self.rnn.zero_state(batch)?,
        };

        let xs = self.encoder.forward(tokens)?;
        let (xs, hidden) = self.rnn.run(&xs, &init)?;
        let xs = self.mid_layer.forward(&xs)?;
        let xs = leaky_relu(&xs)?;
        let (xs, hidden) = self.rnn2.run(&xs, &hidden)?;
        let logits = self.decoder.forward(&xs)?;
        Ok((logits, hidden))
    }

    /// Probability distribution (1, lang_vocab_size) over the next target symbol
    pub fn infer_step(
        &self,
        token: u32,
        hidden: Option<&HiddenState>,
        temperature: f64,
    ) -> Result<(Tensor, HiddenState)> {
        let input = Tensor::new(&[[token]], &self.device)?;
        let (logits, hidden) = self.forward(&input, hidden)?;
        let logits = logits.reshape((1, self.config.lang_vocab_size))?;
        let probs = temperature_softmax(&logits, temperature)?;
        Ok((probs, hidden))
    }

    /// Cross-entropy between flattened logits and flattened labels
    pub fn loss(&self, prediction: &Tensor, label: &Tensor, reduction: Reduction) -> Result<Tensor> {
        let logits = prediction.reshape(((), self.config.lang_vocab_size))?;
        let labels = label.flatten_all()?.unsqueeze(1)?;
        let log_probs = candle_nn::ops::log_softmax(&logits, D::Minus1)?;
        let losses = log_probs.gather(&labels, 1)?.squeeze(1)?.neg()?;
        Ok(match reduction {
            Reduction::Mean => losses.mean_all()?,
            Reduction::Sum => losses.sum_all()?,
            Reduction::None => losses,
        })
    }
}

/// Softmax over the last dimension of `logits / max(temperature, MIN_TEMPERATURE)`
pub fn temperature_softmax(logits: &Tensor, temperature: f64) -> Result<Tensor> {
    let temperature = temperature.max(MIN_TEMPERATURE);
    let scaled = (logits / temperature)?;
    Ok(candle_nn::ops::softmax(&scaled, D::Minus1)?)
}

fn leaky_relu(xs: &Tensor) -> candle_core::Result<Tensor> {
    xs.maximum(&xs.affine(LEAKY_RELU_SLOPE, 0.0)?)
}
