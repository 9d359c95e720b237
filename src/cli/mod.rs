//! CLI Interface: Arguments, line input and terminal output
//!
//! # Components
//! - `args.rs`: clap argument parsing
//! - `input.rs`: Line reading and quit detection
//! - `display.rs`: Prompt and result rendering
//!
//! [`run`] wires them to the loaded model; the binary only parses and dispatches.

pub mod args;
pub mod display;
pub mod input;

pub use args::Args;
pub use display::Display;
pub use input::InputHandler;

use std::io::{self, BufRead, IsTerminal, Write};

use candle_core::Device;
use tracing::info;

use crate::error::Result;
use crate::llm::weights::load_model;
use crate::llm::{LanguageVocab, ModelConfig, Transliterator};
use crate::session::{Session, SessionState};

/// Load the artifacts named by `args` and run the session on stdin/stdout
pub fn run(args: Args) -> Result<SessionState> {
    let stdout = io::stdout();
    let color = !args.no_color && stdout.is_terminal();
    let stdin = io::stdin();
    run_with(&args, stdin.lock(), Display::new(stdout.lock(), color))
}

/// Same as [`run`] over arbitrary input and output
pub fn run_with<R: BufRead, W: Write>(
    args: &Args,
    reader: R,
    mut display: Display<W>,
) -> Result<SessionState> {
    let paths = args.artifact_paths();
    let vocab = LanguageVocab::load(paths.vocab_path(args.lang))?;

    let config = ModelConfig::new(vocab.source.size(), vocab.target.size(), args.cell)
        .with_feature_size(args.feature_size);
    let weights = match &args.weights {
        Some(path) => path.clone(),
        None => paths.weights_path(args.lang, args.cell)?,
    };
    let model = load_model(&weights, config, &Device::Cpu)?;
    info!(language = %args.lang, cell = %args.cell, "model ready");

    display.show_loaded(args.lang)?;
    let transliterator = Transliterator::new(model, vocab);
    let mut input = InputHandler::new(reader);
    Session::new(args.lang, &transliterator).run(&mut input, &mut display)
}
