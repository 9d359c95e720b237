//! Session Management: The interactive loop and its counters
//!
//! # Components
//! - `interactive.rs`: Prompt/read/transliterate loop over one language
//! - `state.rs`: SessionState counters reported when the loop ends

pub mod interactive;
pub mod state;

pub use interactive::Session;
pub use state::SessionState;
