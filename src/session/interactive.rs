//! Prompt → read → transliterate → print loop

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::cli::display::Display;
use crate::cli::input::InputHandler;
use crate::config::Language;
use crate::error::Result;
use crate::llm::generate::{StepModel, Transliterator};
use crate::session::state::SessionState;

/// Interactive loop over one loaded language
pub struct Session<'a, M> {
    lang: Language,
    transliterator: &'a Transliterator<M>,
    state: SessionState,
}

impl<'a, M: StepModel> Session<'a, M> {
    pub fn new(lang: Language, transliterator: &'a Transliterator<M>) -> Self {
        Session {
            lang,
            transliterator,
            state: SessionState::new(),
        }
    }

    /// Run until the quit sentinel is entered.
    ///
    /// Per-word failures are shown and the loop continues; I/O and tensor
    /// failures end the session with an error.
    pub fn run<R: BufRead, W: Write>(
        mut self,
        input: &mut InputHandler<R>,
        display: &mut Display<W>,
    ) -> Result<SessionState> {
        self.state.start();
        loop {
            display.show_prompt(self.lang)?;
            let word = input.read_line()?;
            if InputHandler::<R>::is_quit(word) {
                display.show_terminated()?;
                break;
            }

            match self.transliterator.transliterate(word) {
                Ok(result) => {
                    self.state.record_success();
                    display.show_result(&result)?;
                }
                Err(e) if e.is_recoverable() => {
                    warn!(word, error = %e, "word rejected");
                    self.state.record_rejection(&e);
                    display.show_error(word, &e)?;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            language = %self.lang,
            transliterated = self.state.words_transliterated,
            rejected = self.state.words_rejected,
            unknown_chars = ?self.state.problematic_chars(),
            duration_secs = self.state.duration_secs(),
            "session finished"
        );
        Ok(self.state)
    }
}
