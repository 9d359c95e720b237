//! Terminal output
//!
//! Features:
//! - Prompt and result lines for the interactive loop
//! - Optional color highlighting via crossterm
//! - Writes to any `Write` so the loop can be driven in tests

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{self, Write};

use crate::config::Language;
use crate::error::TranslitError;

/// Line-oriented display for the interactive session
pub struct Display<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Display<W> {
    pub fn new(out: W, color: bool) -> Self {
        Display { out, color }
    }

    /// Display without escape sequences
    pub fn plain(out: W) -> Self {
        Display::new(out, false)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            queue!(self.out, Print(text))
        }
    }

    /// Startup confirmation and input hint
    pub fn show_loaded(&mut self, lang: Language) -> io::Result<()> {
        self.colored(Color::Green, "Successfully loaded model: ")?;
        queue!(self.out, Print(lang.name()), Print("\n\n"))?;
        queue!(
            self.out,
            Print("Please make sure to transliterate only with English alphabetical characters.\n\n")
        )?;
        self.out.flush()
    }

    /// Prompt for the next word (no newline)
    pub fn show_prompt(&mut self, lang: Language) -> io::Result<()> {
        let prompt = format!(
            "Enter the English word to be transliterated to {}. Enter q to quit: ",
            lang.name()
        );
        self.colored(Color::Cyan, &prompt)?;
        self.out.flush()
    }

    pub fn show_result(&mut self, transliteration: &str) -> io::Result<()> {
        queue!(self.out, Print("The transliteration is: "))?;
        self.colored(Color::Yellow, transliteration)?;
        queue!(self.out, Print("\n\n"))?;
        self.out.flush()
    }

    /// Per-word failure; the session continues
    pub fn show_error(&mut self, word: &str, error: &TranslitError) -> io::Result<()> {
        self.colored(Color::Red, "Could not transliterate ")?;
        queue!(self.out, Print(format!("{:?}: {}\n\n", word, error)))?;
        self.out.flush()
    }

    pub fn show_terminated(&mut self) -> io::Result<()> {
        queue!(self.out, Print("Program terminated.\n\n"))?;
        self.out.flush()
    }
}
