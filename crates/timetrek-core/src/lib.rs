//! Round scoring, session state machine, and round timer for Time Trek.
//!
//! This crate owns the game logic: a pure scoring function, the session
//! lifecycle (`not-started -> in-progress -> round-result ->
//! (in-progress | game-over)`), and the timer-driven forced submission
//! path.
//!
//! # Modules
//!
//! - [`scoring`] -- Pure round scoring: haversine distance, location and
//!   time point components.
//! - [`session`] -- [`GameSession`], the single owner of per-game state,
//!   and its operation surface.
//! - [`timer`] -- Cancellable async countdown driving
//!   [`GameSession::tick_timer`] once per second.
//! - [`catalog`] -- YAML-backed event pool with validated entries and
//!   pseudo-random sampling without replacement.
//! - [`source`] -- [`GuessSource`] trait and [`StubGuessSource`]: the
//!   seam to the external presentation layer.
//! - [`config`] -- Configuration loading from `timetrek-config.yaml`
//!   into strongly-typed structs.
//!
//! [`GameSession`]: session::GameSession
//! [`GameSession::tick_timer`]: session::GameSession::tick_timer
//! [`GuessSource`]: source::GuessSource
//! [`StubGuessSource`]: source::StubGuessSource

pub mod catalog;
pub mod config;
pub mod scoring;
pub mod session;
pub mod source;
pub mod timer;
