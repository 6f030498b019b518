//! Round scoring: distance error, year error, and point components.
//!
//! Scoring is a pure function of an event and a guess. Both score
//! components are integers in `[0, 5000]`:
//!
//! - The **location score** decays exponentially with great-circle
//!   distance: 5000 points at 0 km, roughly 37% of that at 2000 km,
//!   approaching 0 as the distance grows. A round with no location
//!   guess has infinite distance error and scores 0.
//! - The **time score** is `5000 - 400 * year_error^0.9`, clamped to
//!   `[0, 5000]` and rounded. The sub-linear exponent makes small year
//!   errors cost less per year than large ones; the score floors at 0
//!   from 17 years of error onwards.
//!
//! Coordinates are assumed validated by the catalog. Degenerate input
//! (NaN coordinates) is a data-integrity fault of the event source and
//! propagates into the distance rather than being masked here.

use timetrek_types::{GeoPoint, HistoricalEvent, PlayerGuess, RoundResult};

/// Mean Earth radius in kilometers (sphere model).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Maximum points awarded per score component.
pub const MAX_COMPONENT_SCORE: u32 = 5000;

/// e-folding distance of the location score decay, in kilometers.
const LOCATION_DECAY_KM: f64 = 2000.0;

/// Year penalty coefficient: points lost per unit of the decayed error.
const YEAR_PENALTY_COEFFICIENT: f64 = 400.0;

/// Year penalty exponent. Below 1, so penalty growth is sub-linear.
const YEAR_PENALTY_EXPONENT: f64 = 0.9;

/// Great-circle distance between two points in kilometers.
///
/// Haversine formula on a sphere of radius [`EARTH_RADIUS_KM`]. The
/// intermediate is clamped to 1.0 before `asin` so floating-point drift
/// near antipodal points cannot produce NaN.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Round a raw point value into the `[0, MAX_COMPONENT_SCORE]` range.
///
/// Shared by both components so clamping and rounding behave
/// identically everywhere a score is produced.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_points(raw: f64) -> u32 {
    raw.round().clamp(0.0, f64::from(MAX_COMPONENT_SCORE)) as u32
}

/// Location component for a given distance error in kilometers.
///
/// `5000 * exp(-distance / 2000)`, rounded and clamped. Monotonically
/// decreasing; exactly [`MAX_COMPONENT_SCORE`] at zero distance, and 0
/// for an infinite distance (no location guessed).
fn location_score(distance_km: f64) -> u32 {
    to_points(f64::from(MAX_COMPONENT_SCORE) * (-distance_km / LOCATION_DECAY_KM).exp())
}

/// Time component for a given absolute year error.
///
/// `max(0, round(5000 - min(5000, 400 * year_error^0.9)))`. A zero
/// error scores exactly [`MAX_COMPONENT_SCORE`] (`0^0.9 == 0`).
fn time_score(year_error: u32) -> u32 {
    let penalty = (YEAR_PENALTY_COEFFICIENT
        * f64::from(year_error).powf(YEAR_PENALTY_EXPONENT))
    .min(f64::from(MAX_COMPONENT_SCORE));
    to_points(f64::from(MAX_COMPONENT_SCORE) - penalty)
}

/// Score one round: compute both error terms and both point components
/// for `guess` against `event`.
///
/// Pure and deterministic. A guess without a location produces an
/// infinite distance error and a zero location score through the same
/// formula as the located path -- there is no separate branch to drift.
pub fn score(event: &HistoricalEvent, guess: &PlayerGuess) -> RoundResult {
    let distance_error_km = guess
        .location
        .map_or(f64::INFINITY, |pin| haversine_km(pin, event.location.point()));
    let year_error = event.year.abs_diff(guess.year);

    let location_score = location_score(distance_error_km);
    let time_score = time_score(year_error);

    RoundResult {
        event: event.clone(),
        guess: *guess,
        distance_error_km,
        year_error,
        location_score,
        time_score,
        total_score: location_score.saturating_add(time_score),
    }
}
