//! Core entity structs for the Time Trek game core.
//!
//! Covers the event catalog entry, player-facing settings and guesses,
//! the scored round result, and the presentation payloads
//! ([`RoundPrompt`], [`SessionSnapshot`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DistanceUnit, GameMode, GameStatus};
use crate::ids::{EventId, SessionId};

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A point on the globe in decimal degrees.
///
/// Latitude is in `[-90, 90]`, longitude in `[-180, 180]`. Catalog
/// loading rejects out-of-range coordinates; downstream code may assume
/// both fields are in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Latitude in decimal degrees, north positive.
    pub lat: f64,
    /// Longitude in decimal degrees, east positive.
    pub lng: f64,
}

impl GeoPoint {
    /// Whether both coordinates are inside their valid ranges.
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A named location attached to a historical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Place {
    /// Human-readable place name shown on the result screen.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Place {
    /// The coordinates of this place as a [`GeoPoint`].
    pub const fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

// ---------------------------------------------------------------------------
// Historical event
// ---------------------------------------------------------------------------

/// One entry in the event catalog: a photograph of a historical moment
/// with its ground-truth year and location.
///
/// Events are created by the catalog (file-backed here, a database table
/// in production) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HistoricalEvent {
    /// Stable identifier of the event.
    pub id: EventId,
    /// The year the depicted moment occurred.
    pub year: i32,
    /// Short description shown after the round is scored.
    pub description: String,
    /// URL of the photograph (storage is an external concern).
    pub image_url: String,
    /// Where the depicted moment occurred.
    pub location: Place,
}

// ---------------------------------------------------------------------------
// Settings and guesses
// ---------------------------------------------------------------------------

/// Player-chosen settings for a game session.
///
/// Set once at game start and replaceable between rounds via the
/// settings dialog; replacing settings never resets round progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSettings {
    /// How the session was started (classic, timed, daily, friends).
    pub game_mode: GameMode,
    /// Unit used when presenting distances.
    pub distance_unit: DistanceUnit,
    /// Whether the per-round countdown is active.
    pub timer_enabled: bool,
    /// Countdown length in minutes.
    pub timer_duration: u32,
}

impl GameSettings {
    /// The configured countdown length in seconds.
    pub const fn timer_seconds(&self) -> u32 {
        self.timer_duration.saturating_mul(60)
    }
}

/// The player's claimed location and year for the current round.
///
/// The year always has a value (the session seeds it with the default
/// year); the location may be absent, which is a permitted partial guess
/// scoring zero location points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerGuess {
    /// Map pin placed by the player, if any.
    pub location: Option<GeoPoint>,
    /// Year chosen on the slider.
    pub year: i32,
}

// ---------------------------------------------------------------------------
// Round result
// ---------------------------------------------------------------------------

/// The scored outcome of one round. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoundResult {
    /// The event that was shown.
    pub event: HistoricalEvent,
    /// The guess that was scored.
    pub guess: PlayerGuess,
    /// Great-circle error in kilometers; infinite when no location was
    /// guessed.
    pub distance_error_km: f64,
    /// Absolute year error.
    pub year_error: u32,
    /// Location component, 0 to 5000 points.
    pub location_score: u32,
    /// Year component, 0 to 5000 points.
    pub time_score: u32,
    /// Sum of the two components, 0 to 10000 points.
    pub total_score: u32,
}

// ---------------------------------------------------------------------------
// Presentation payloads
// ---------------------------------------------------------------------------

/// What the player is allowed to see while guessing.
///
/// Deliberately omits the event's year and coordinates -- this is the
/// only event data that crosses to the presentation layer before the
/// round is scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoundPrompt {
    /// Current round number, 1-based.
    pub round: u32,
    /// Total rounds in the session.
    pub total_rounds: u32,
    /// Description of the photograph (used as alt text).
    pub description: String,
    /// URL of the photograph.
    pub image_url: String,
    /// Lowest year selectable on the slider.
    pub year_min: i32,
    /// Highest year selectable on the slider.
    pub year_max: i32,
}

/// Presentation-facing view of the session state.
///
/// Produced on demand by the session; holding a snapshot never grants
/// mutation access to session internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionSnapshot {
    /// Identifier of this session.
    pub session_id: SessionId,
    /// Current lifecycle state.
    pub status: GameStatus,
    /// Active settings.
    pub settings: GameSettings,
    /// Current round number, 1-based.
    pub current_round: u32,
    /// Total rounds in the session.
    pub total_rounds: u32,
    /// Sum of total scores over all scored rounds.
    pub cumulative_score: u32,
    /// The guess in progress, if a round is open.
    pub current_guess: Option<PlayerGuess>,
    /// Wall-clock time the current round's countdown started, if timed.
    pub timer_started_at: Option<DateTime<Utc>>,
    /// Seconds left on the countdown, if timed.
    pub timer_remaining: Option<u32>,
    /// Scored rounds so far, in play order.
    pub results: Vec<RoundResult>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_event() -> HistoricalEvent {
        HistoricalEvent {
            id: EventId(Uuid::nil()),
            year: 1969,
            description: String::from("Apollo 11 lunar landing"),
            image_url: String::from("https://example.org/apollo11.jpg"),
            location: Place {
                name: String::from("Sea of Tranquility (broadcast from Houston)"),
                lat: 29.559_8,
                lng: -95.089_9,
            },
        }
    }

    #[test]
    fn geo_point_range_check() {
        assert!(GeoPoint { lat: 0.0, lng: 0.0 }.in_range());
        assert!(
            GeoPoint {
                lat: -90.0,
                lng: 180.0
            }
            .in_range()
        );
        assert!(
            !GeoPoint {
                lat: 90.5,
                lng: 0.0
            }
            .in_range()
        );
        assert!(
            !GeoPoint {
                lat: 0.0,
                lng: -180.1
            }
            .in_range()
        );
    }

    #[test]
    fn place_exposes_its_point() {
        let event = sample_event();
        let point = event.location.point();
        assert!(point.in_range());
    }

    #[test]
    fn timer_seconds_from_minutes() {
        let settings = GameSettings {
            game_mode: GameMode::Timed,
            distance_unit: DistanceUnit::Km,
            timer_enabled: true,
            timer_duration: 5,
        };
        assert_eq!(settings.timer_seconds(), 300);
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let back: HistoricalEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
