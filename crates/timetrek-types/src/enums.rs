//! Enumeration types for the Time Trek game core.
//!
//! The serde representations match the wire strings the frontend already
//! uses (`"not-started"`, `"km"`, `"classic"`, ...), so snapshots and
//! settings round-trip unchanged through the presentation layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Game mode
// ---------------------------------------------------------------------------

/// How a game session was started.
///
/// The mode does not change the round mechanics; it selects how the
/// event pool is sampled (daily mode draws deterministically from the
/// calendar date) and how the frontend frames the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// A standard five-round game against no clock.
    Classic,
    /// A game with the per-round countdown enabled.
    Timed,
    /// The shared daily challenge: every player gets the same events.
    Daily,
    /// A challenge link shared between friends.
    Friends,
}

// ---------------------------------------------------------------------------
// Distance unit
// ---------------------------------------------------------------------------

/// Kilometers per statute mile.
const KM_PER_MILE: f64 = 1.609_344;

/// Unit used when presenting distances to the player.
///
/// All internal distances are kilometers; conversion happens only at the
/// presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "kebab-case")]
pub enum DistanceUnit {
    /// Kilometers.
    Km,
    /// Statute miles.
    Mi,
}

impl DistanceUnit {
    /// Convert a distance in kilometers into this unit.
    ///
    /// Infinite input (a round with no location guess) stays infinite.
    pub const fn from_km(self, km: f64) -> f64 {
        match self {
            Self::Km => km,
            Self::Mi => km / KM_PER_MILE,
        }
    }

    /// Short unit label for display ("km" / "mi").
    pub const fn label(self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Mi => "mi",
        }
    }
}

// ---------------------------------------------------------------------------
// Game status
// ---------------------------------------------------------------------------

/// Lifecycle state of a game session.
///
/// Transitions: `NotStarted -> InProgress -> RoundResult -> (InProgress |
/// GameOver)`. Both `GameOver` and `NotStarted` are re-enterable: restart
/// re-initializes into `InProgress`, returning home forces `NotStarted`
/// from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    /// No session is active; the home screen is showing.
    NotStarted,
    /// A round is open for guessing.
    InProgress,
    /// The current round has been scored and its result is displayed.
    RoundResult,
    /// All rounds are scored; the final results are displayed.
    GameOver,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&GameStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
        let json = serde_json::to_string(&GameStatus::RoundResult).unwrap();
        assert_eq!(json, "\"round-result\"");
    }

    #[test]
    fn mode_round_trips() {
        for mode in [
            GameMode::Classic,
            GameMode::Timed,
            GameMode::Daily,
            GameMode::Friends,
        ] {
            let json = serde_json::to_string(&mode).unwrap();
            let back: GameMode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, mode);
        }
    }

    #[test]
    fn km_is_identity_conversion() {
        assert_eq!(DistanceUnit::Km.from_km(123.5), 123.5);
    }

    #[test]
    fn miles_conversion() {
        let mi = DistanceUnit::Mi.from_km(KM_PER_MILE);
        assert!((mi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn infinite_distance_stays_infinite() {
        assert!(DistanceUnit::Mi.from_km(f64::INFINITY).is_infinite());
    }
}
