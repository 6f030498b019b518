//! Guess source trait and stub implementation.
//!
//! While a round is open, the session exposes a [`RoundPrompt`] -- the
//! photograph and the slider bounds, never the answer -- and awaits a
//! [`PlayerGuess`] in response. The [`GuessSource`] trait abstracts the
//! mechanism by which guesses are obtained: the React frontend, a
//! scripted bot, or a test stub.
//!
//! The [`StubGuessSource`] always returns the no-location default-year
//! guess, which lets the session and engine be exercised end-to-end
//! without a frontend -- every round effectively forfeits its location
//! points.

use timetrek_types::{PlayerGuess, RoundPrompt};

use crate::session::DEFAULT_GUESS_YEAR;

/// Errors that can occur while obtaining a guess.
#[derive(Debug, thiserror::Error)]
pub enum GuessSourceError {
    /// An internal error in the guess source (disconnected frontend,
    /// closed channel, ...).
    #[error("guess source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of player guesses.
///
/// Implementations produce a [`PlayerGuess`] when given the current
/// round's [`RoundPrompt`]. The engine calls [`guess`] once per round
/// while the round is open.
///
/// [`guess`]: GuessSource::guess
pub trait GuessSource {
    /// Produce a guess for the prompted round.
    ///
    /// # Errors
    ///
    /// Returns [`GuessSourceError`] if no guess can be obtained; the
    /// caller decides whether to retry, forfeit, or abort the session.
    fn guess(&mut self, prompt: &RoundPrompt) -> Result<PlayerGuess, GuessSourceError>;
}

/// A stub source that always returns the default guess: no location,
/// default year.
#[derive(Debug, Clone, Default)]
pub struct StubGuessSource;

impl StubGuessSource {
    /// Create a new stub guess source.
    pub const fn new() -> Self {
        Self
    }
}

impl GuessSource for StubGuessSource {
    fn guess(&mut self, _prompt: &RoundPrompt) -> Result<PlayerGuess, GuessSourceError> {
        Ok(PlayerGuess {
            location: None,
            year: DEFAULT_GUESS_YEAR,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_prompt(round: u32) -> RoundPrompt {
        RoundPrompt {
            round,
            total_rounds: 5,
            description: String::from("a grainy photograph"),
            image_url: String::from("https://example.org/photo.jpg"),
            year_min: 1900,
            year_max: 2026,
        }
    }

    #[test]
    fn stub_returns_default_guess() {
        let mut source = StubGuessSource::new();
        let guess = source.guess(&make_prompt(1)).unwrap();
        assert!(guess.location.is_none());
        assert_eq!(guess.year, DEFAULT_GUESS_YEAR);
    }

    #[test]
    fn stub_is_round_independent() {
        let mut source = StubGuessSource::new();
        let first = source.guess(&make_prompt(1)).unwrap();
        let last = source.guess(&make_prompt(5)).unwrap();
        assert_eq!(first, last);
    }
}
