//! Shared type definitions for the Time Trek game core.
//!
//! This crate is the single source of truth for the data model shared
//! between the game core and the React presentation layer. Types defined
//! here flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for events and sessions
//! - [`enums`] -- Game mode, distance unit, and session lifecycle state
//! - [`structs`] -- Events, settings, guesses, results, and the
//!   presentation payloads

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DistanceUnit, GameMode, GameStatus};
pub use ids::{EventId, SessionId};
pub use structs::{
    GameSettings, GeoPoint, HistoricalEvent, Place, PlayerGuess, RoundPrompt, RoundResult,
    SessionSnapshot,
};
