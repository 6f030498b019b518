//! A demo guess source that plays randomly.
//!
//! Produces a uniformly random map pin and a uniformly random year
//! within the prompted slider bounds. Useful for exercising a full
//! session headlessly -- the scores it earns are what a blindfolded
//! player would get.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use timetrek_core::source::{GuessSource, GuessSourceError};
use timetrek_types::{GeoPoint, PlayerGuess, RoundPrompt};

/// Guess source drawing uniformly random guesses.
#[derive(Debug)]
pub struct RandomGuessSource {
    /// RNG behind the guesses.
    rng: StdRng,
}

impl RandomGuessSource {
    /// Create a source seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a source with a fixed seed (reproducible demo runs).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomGuessSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GuessSource for RandomGuessSource {
    fn guess(&mut self, prompt: &RoundPrompt) -> Result<PlayerGuess, GuessSourceError> {
        let lat = self.rng.random_range(-90.0..=90.0);
        let lng = self.rng.random_range(-180.0..=180.0);
        let year = self.rng.random_range(prompt.year_min..=prompt.year_max);
        Ok(PlayerGuess {
            location: Some(GeoPoint { lat, lng }),
            year,
        })
    }
}
