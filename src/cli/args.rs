//! Command-line arguments
//!
//! Uses clap derive macros. The language code is validated during parsing, so
//! a bad invocation fails before any artifact is touched.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ArtifactPaths, Language};
use crate::llm::model::{CellType, DEFAULT_FEATURE_SIZE};

#[derive(Parser, Debug, Clone)]
#[command(name = "translit")]
#[command(version)]
#[command(about = "Transliterate English spelling into Tamil, Malayalam, Bengali or Hindi script")]
pub struct Args {
    /// Target language code: ta, ml, bn or hi
    #[arg(value_parser = parse_language)]
    pub lang: Language,

    /// Directory holding <code>.json vocabulary artifacts
    #[arg(long, default_value = "vars")]
    pub vars_dir: PathBuf,

    /// Directory holding <code>_<cell> weight files
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,

    /// Weight file to load instead of the one found in --model-dir
    #[arg(long)]
    pub weights: Option<PathBuf>,

    /// Recurrent cell the weights were trained with (gru or lstm)
    #[arg(long, default_value = "gru", value_parser = parse_cell)]
    pub cell: CellType,

    /// Hidden width the weights were trained with
    #[arg(long, default_value_t = DEFAULT_FEATURE_SIZE)]
    pub feature_size: usize,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.vars_dir, &self.model_dir)
    }
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse().map_err(|e: crate::error::ConfigError| e.0)
}

fn parse_cell(s: &str) -> Result<CellType, String> {
    s.parse().map_err(|e: crate::error::ConfigError| e.0)
}
