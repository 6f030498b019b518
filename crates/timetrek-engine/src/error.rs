//! Error types for the game engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and session execution.

/// Top-level error for the game engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: timetrek_core::config::ConfigError,
    },

    /// Event catalog loading or sampling failed.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: timetrek_core::catalog::CatalogError,
    },

    /// A session operation failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: timetrek_core::session::SessionError,
    },

    /// The guess source failed.
    #[error("guess source error: {source}")]
    Guess {
        /// The underlying guess source error.
        #[from]
        source: timetrek_core::source::GuessSourceError,
    },
}
