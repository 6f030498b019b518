//! Event catalog: the pool of historical events a session draws from.
//!
//! The catalog is loaded from a YAML file before a game starts (the
//! production deployment fills the same pool from a database table).
//! Loading validates every entry -- coordinate ranges, non-empty text
//! fields -- so the session and scoring code downstream can assume
//! well-formed events. Entries without an explicit ID get one assigned.
//!
//! Sampling is a pseudo-random permutation without replacement:
//! [`EventCatalog::draw`] returns `n` distinct events in random order.
//! Daily mode derives the RNG seed from the calendar date, so every
//! player's daily game draws the same events in the same order.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use timetrek_types::{EventId, GameMode, HistoricalEvent, Place};

/// Errors that can occur while loading or sampling the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An entry failed validation.
    #[error("invalid event at index {index}: {reason}")]
    InvalidEvent {
        /// Zero-based position of the entry in the file.
        index: usize,
        /// What is wrong with the entry.
        reason: String,
    },

    /// More events were requested than the pool holds.
    #[error("event pool too small: have {available}, requested {requested}")]
    PoolTooSmall {
        /// Events in the pool.
        available: usize,
        /// Events requested.
        requested: usize,
    },
}

impl From<serde_yml::Error> for CatalogError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// On-disk shape of the catalog file.
#[derive(Debug, Deserialize)]
struct RawCatalog {
    /// The event entries.
    events: Vec<RawEvent>,
}

/// On-disk shape of one event entry. The ID is optional in the file.
#[derive(Debug, Deserialize)]
struct RawEvent {
    /// Explicit ID, if the file carries one.
    #[serde(default)]
    id: Option<Uuid>,
    /// Ground-truth year.
    year: i32,
    /// Description shown after scoring.
    description: String,
    /// Photograph URL.
    image_url: String,
    /// Where the event occurred.
    location: RawPlace,
}

/// On-disk shape of an event location.
#[derive(Debug, Deserialize)]
struct RawPlace {
    /// Place name.
    name: String,
    /// Latitude in decimal degrees.
    lat: f64,
    /// Longitude in decimal degrees.
    lng: f64,
}

/// A validated pool of historical events.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    /// All validated events, in file order.
    events: Vec<HistoricalEvent>,
}

impl EventCatalog {
    /// Load and validate a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read,
    /// [`CatalogError::Yaml`] if the content is not valid YAML, or
    /// [`CatalogError::InvalidEvent`] for the first entry that fails
    /// validation.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&contents)?;
        info!(
            path = %path.display(),
            pool_size = catalog.len(),
            "Event catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] or [`CatalogError::InvalidEvent`]
    /// as for [`from_file`](Self::from_file).
    pub fn parse(yaml: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_yml::from_str(yaml)?;
        let events = raw
            .events
            .into_iter()
            .enumerate()
            .map(|(index, entry)| validate_entry(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { events })
    }

    /// Number of events in the pool.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the pool holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events, in file order.
    pub fn events(&self) -> &[HistoricalEvent] {
        &self.events
    }

    /// Draw `count` distinct events in pseudo-random order.
    ///
    /// Sampling is without replacement: no event appears twice in one
    /// draw. The order is part of the draw -- a session presents the
    /// events exactly as returned here and never re-shuffles.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::PoolTooSmall`] when the pool holds fewer
    /// than `count` events.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<HistoricalEvent>, CatalogError> {
        if self.events.len() < count {
            return Err(CatalogError::PoolTooSmall {
                available: self.events.len(),
                requested: count,
            });
        }
        let picks = index::sample(rng, self.events.len(), count);
        Ok(picks
            .iter()
            .filter_map(|i| self.events.get(i).cloned())
            .collect())
    }
}

/// Validate one raw entry and convert it into a [`HistoricalEvent`],
/// assigning an ID when the file omits one.
fn validate_entry(index: usize, entry: RawEvent) -> Result<HistoricalEvent, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidEvent { index, reason };

    if entry.description.trim().is_empty() {
        return Err(invalid(String::from("description is empty")));
    }
    if entry.image_url.trim().is_empty() {
        return Err(invalid(String::from("image_url is empty")));
    }
    if entry.location.name.trim().is_empty() {
        return Err(invalid(String::from("location name is empty")));
    }

    let place = Place {
        name: entry.location.name,
        lat: entry.location.lat,
        lng: entry.location.lng,
    };
    if !place.point().in_range() {
        return Err(invalid(format!(
            "coordinates out of range: lat {}, lng {}",
            place.lat, place.lng
        )));
    }

    Ok(HistoricalEvent {
        id: entry.id.map_or_else(EventId::new, EventId::from),
        year: entry.year,
        description: entry.description,
        image_url: entry.image_url,
        location: place,
    })
}

/// Seed for a given calendar date, composed as `yyyymmdd`.
///
/// Dates before year 0 clamp to seed 0 (the catalog has no events from
/// antiquity anyway).
pub fn daily_seed(date: NaiveDate) -> u64 {
    let year = u64::try_from(date.year()).unwrap_or(0);
    year.saturating_mul(10_000)
        .saturating_add(u64::from(date.month()).saturating_mul(100))
        .saturating_add(u64::from(date.day()))
}

/// RNG appropriate for the game mode on the given date.
///
/// Daily mode is seeded from the date so every player draws the same
/// events in the same order; all other modes draw from OS entropy.
pub fn rng_for_mode(mode: GameMode, date: NaiveDate) -> StdRng {
    match mode {
        GameMode::Daily => StdRng::seed_from_u64(daily_seed(date)),
        GameMode::Classic | GameMode::Timed | GameMode::Friends => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    const SAMPLE_YAML: &str = r"
events:
  - year: 1969
    description: Apollo 11 lunar landing
    image_url: https://example.org/apollo11.jpg
    location:
      name: Kennedy Space Center, Florida
      lat: 28.5729
      lng: -80.6490
  - id: 0192e7a0-5b7a-7d4e-a357-2a0c6b1fd301
    year: 1989
    description: Fall of the Berlin Wall
    image_url: https://example.org/berlin.jpg
    location:
      name: Berlin, Germany
      lat: 52.5163
      lng: 13.3777
  - year: 1903
    description: First powered flight at Kitty Hawk
    image_url: https://example.org/kittyhawk.jpg
    location:
      name: Kitty Hawk, North Carolina
      lat: 36.0646
      lng: -75.7057
  - year: 1955
    description: Montgomery bus boycott begins
    image_url: https://example.org/montgomery.jpg
    location:
      name: Montgomery, Alabama
      lat: 32.3668
      lng: -86.3000
  - year: 2000
    description: Millennium celebrations at the Eiffel Tower
    image_url: https://example.org/paris2000.jpg
    location:
      name: Paris, France
      lat: 48.8584
      lng: 2.2945
  - year: 1947
    description: Partition of India announced
    image_url: https://example.org/delhi.jpg
    location:
      name: New Delhi, India
      lat: 28.6139
      lng: 77.2090
";

    fn sample_catalog() -> EventCatalog {
        EventCatalog::parse(SAMPLE_YAML).unwrap()
    }

    #[test]
    fn parses_and_counts_events() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 6);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn explicit_id_is_preserved() {
        let catalog = sample_catalog();
        let berlin = catalog
            .events()
            .iter()
            .find(|e| e.year == 1989)
            .unwrap();
        assert_eq!(
            berlin.id.to_string(),
            "0192e7a0-5b7a-7d4e-a357-2a0c6b1fd301"
        );
    }

    #[test]
    fn missing_ids_are_assigned_distinct() {
        let catalog = sample_catalog();
        let ids: BTreeSet<_> = catalog.events().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let yaml = r"
events:
  - year: 1969
    description: bad latitude
    image_url: https://example.org/x.jpg
    location:
      name: Nowhere
      lat: 91.0
      lng: 0.0
";
        let err = EventCatalog::parse(yaml).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidEvent { index: 0, .. }
        ));
    }

    #[test]
    fn empty_description_is_rejected() {
        let yaml = r"
events:
  - year: 1969
    description: '   '
    image_url: https://example.org/x.jpg
    location:
      name: Somewhere
      lat: 0.0
      lng: 0.0
";
        let err = EventCatalog::parse(yaml).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEvent { .. }));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = EventCatalog::parse("events: [not an event]").unwrap_err();
        assert!(matches!(err, CatalogError::Yaml { .. }));
    }

    #[test]
    fn draw_returns_distinct_events() {
        let catalog = sample_catalog();
        let mut rng = StdRng::seed_from_u64(42);
        let drawn = catalog.draw(&mut rng, 5).unwrap();
        assert_eq!(drawn.len(), 5);
        let ids: BTreeSet<_> = drawn.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn draw_rejects_oversized_request() {
        let catalog = sample_catalog();
        let mut rng = StdRng::seed_from_u64(42);
        let err = catalog.draw(&mut rng, 7).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::PoolTooSmall {
                available: 6,
                requested: 7
            }
        ));
    }

    #[test]
    fn equal_seeds_draw_identically() {
        let catalog = sample_catalog();
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let draw_a = catalog.draw(&mut rng_a, 5).unwrap();
        let draw_b = catalog.draw(&mut rng_b, 5).unwrap();
        assert_eq!(draw_a, draw_b);
    }

    #[test]
    fn daily_seed_composes_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(daily_seed(date), 20_260_807);
        let other = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_ne!(daily_seed(date), daily_seed(other));
    }

    #[test]
    fn daily_mode_draws_are_reproducible() {
        let catalog = sample_catalog();
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let mut rng_a = rng_for_mode(GameMode::Daily, date);
        let mut rng_b = rng_for_mode(GameMode::Daily, date);
        let draw_a = catalog.draw(&mut rng_a, 5).unwrap();
        let draw_b = catalog.draw(&mut rng_b, 5).unwrap();
        assert_eq!(draw_a, draw_b);
    }
}
