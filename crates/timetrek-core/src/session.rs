//! Game session state machine.
//!
//! [`GameSession`] is the single owner of all per-game state. Every
//! mutation goes through the operations defined here; no other code
//! writes session fields. The lifecycle is:
//!
//! ```text
//! not-started -> in-progress -> round-result -> (in-progress | game-over)
//! ```
//!
//! `game-over` and `not-started` are both re-enterable: [`start`] is an
//! explicit restart from any state, and [`return_home`] forces
//! `not-started` from any state, discarding round data.
//!
//! Calling an operation from a state that does not permit it returns
//! [`SessionError::InvalidTransition`] -- reported, never a silent
//! no-op, and never corrupting state.
//!
//! # Invariants
//!
//! - `results.len() == current_round - 1` while `in-progress`
//! - `results.len() == current_round` while `round-result`
//! - `current_round` never exceeds [`TOTAL_ROUNDS`]
//! - the event order is fixed at [`start`] and never re-shuffled
//!
//! [`start`]: GameSession::start
//! [`return_home`]: GameSession::return_home

use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info, warn};

use timetrek_types::{
    GameSettings, GameStatus, GeoPoint, HistoricalEvent, PlayerGuess, RoundPrompt, RoundResult,
    SessionId, SessionSnapshot,
};

use crate::scoring;

/// Number of rounds in every game session.
pub const TOTAL_ROUNDS: u32 = 5;

/// Lowest year selectable on the slider, absent configuration.
pub const DEFAULT_YEAR_MIN: i32 = 1900;

/// Year the guess slider is pre-seeded with, absent configuration.
pub const DEFAULT_GUESS_YEAR: i32 = 1962;

/// Errors reported by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An operation was called in a lifecycle state that does not
    /// permit it.
    #[error("operation {operation} is not valid while the session is {status:?}")]
    InvalidTransition {
        /// The operation that was attempted.
        operation: &'static str,
        /// The lifecycle state the session was in.
        status: GameStatus,
    },

    /// Fewer events were supplied than a session needs.
    #[error("not enough events to start a session: have {available}, need {required}")]
    NotEnoughEvents {
        /// Events supplied.
        available: usize,
        /// Events required ([`TOTAL_ROUNDS`]).
        required: usize,
    },

    /// No guess was in progress at submission time. Cannot occur through
    /// the normal lifecycle (starting a round always seeds a guess);
    /// surfaced as a user-facing warning, not a fatal fault.
    #[error("no guess in progress to submit")]
    MissingGuess,

    /// The current round has no event. Cannot occur through the normal
    /// lifecycle ([`GameSession::start`] fixes exactly [`TOTAL_ROUNDS`]
    /// events); guards against corrupted state.
    #[error("no event available for round {round}")]
    MissingEvent {
        /// The round that had no event.
        round: u32,
    },

    /// Year bounds do not satisfy `min <= default <= max`.
    #[error("invalid year bounds: min {min}, default {default}, max {max}")]
    InvalidYearBounds {
        /// Lowest selectable year.
        min: i32,
        /// Pre-seeded guess year.
        default: i32,
        /// Highest selectable year.
        max: i32,
    },
}

/// Year slider bounds and the pre-seeded guess year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    /// Lowest selectable year.
    pub min: i32,
    /// Highest selectable year.
    pub max: i32,
    /// Year every round's guess starts at.
    pub default: i32,
}

impl YearBounds {
    /// Create validated bounds; `min <= default <= max` must hold.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidYearBounds`] otherwise.
    pub const fn new(min: i32, max: i32, default: i32) -> Result<Self, SessionError> {
        if min > default || default > max {
            return Err(SessionError::InvalidYearBounds { min, default, max });
        }
        Ok(Self { min, max, default })
    }

    /// Clamp a year into the selectable range.
    pub const fn clamp(&self, year: i32) -> i32 {
        if year < self.min {
            self.min
        } else if year > self.max {
            self.max
        } else {
            year
        }
    }
}

impl Default for YearBounds {
    /// 1900 through the current calendar year, seeded at 1962 --
    /// matching the frontend's year slider.
    fn default() -> Self {
        Self {
            min: DEFAULT_YEAR_MIN,
            max: Utc::now().year(),
            default: DEFAULT_GUESS_YEAR,
        }
    }
}

/// Outcome of one countdown step (see [`GameSession::tick_timer`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// The countdown is not running: the timer is disabled, no round is
    /// open for guessing, or the round was already submitted. Implicit
    /// pause -- ticking in this state changes nothing.
    Idle,
    /// One second elapsed; this many seconds remain.
    Running {
        /// Seconds left on the countdown.
        remaining: u32,
    },
    /// The countdown hit zero on this tick and the guess was
    /// force-submitted. Reported exactly once per round.
    Expired,
}

/// The owned state of one game: settings, the fixed event order, round
/// progress, the guess in flight, and the countdown fields.
///
/// All fields are private; the methods below are the complete mutation
/// surface.
#[derive(Debug)]
pub struct GameSession {
    /// Identifier regenerated on every [`start`](Self::start).
    id: SessionId,
    /// Year slider bounds.
    bounds: YearBounds,
    /// Active settings.
    settings: GameSettings,
    /// Events for this session, fixed at start, one per round.
    events: Vec<HistoricalEvent>,
    /// Current round number, 1-based, at most [`TOTAL_ROUNDS`].
    current_round: u32,
    /// Scored rounds, append-only.
    round_results: Vec<RoundResult>,
    /// Lifecycle state.
    status: GameStatus,
    /// Guess in flight; `Some` exactly while a round is open.
    current_guess: Option<PlayerGuess>,
    /// Wall-clock time the current round's countdown started.
    timer_started_at: Option<DateTime<Utc>>,
    /// Seconds left on the countdown.
    timer_remaining: Option<u32>,
}

impl GameSession {
    /// Create an idle session (`not-started`) with the given bounds and
    /// initial settings. No events are held until [`start`](Self::start).
    pub fn new(bounds: YearBounds, settings: GameSettings) -> Self {
        Self {
            id: SessionId::new(),
            bounds,
            settings,
            events: Vec::new(),
            current_round: 1,
            round_results: Vec::new(),
            status: GameStatus::NotStarted,
            current_guess: None,
            timer_started_at: None,
            timer_remaining: None,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle operations
    // -----------------------------------------------------------------------

    /// Start (or restart) a game with the given settings and events.
    ///
    /// `events` must hold at least [`TOTAL_ROUNDS`] entries, already
    /// sampled and ordered by the catalog; extras are dropped and the
    /// order is fixed for the whole session. Clears previous results,
    /// seeds the first round's guess with the default year, initializes
    /// the countdown when the settings enable it, and assigns a fresh
    /// session ID.
    ///
    /// Callable from any state -- restarting mid-game is an explicit,
    /// caller-confirmed discard of the game in progress.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEnoughEvents`] when fewer than
    /// [`TOTAL_ROUNDS`] events are supplied.
    pub fn start(
        &mut self,
        settings: GameSettings,
        mut events: Vec<HistoricalEvent>,
    ) -> Result<(), SessionError> {
        let required = usize::try_from(TOTAL_ROUNDS).unwrap_or(usize::MAX);
        if events.len() < required {
            return Err(SessionError::NotEnoughEvents {
                available: events.len(),
                required,
            });
        }
        events.truncate(required);

        self.id = SessionId::new();
        self.settings = settings;
        self.events = events;
        self.current_round = 1;
        self.round_results.clear();
        self.status = GameStatus::InProgress;
        self.current_guess = Some(self.default_guess());
        self.reset_timer_fields();

        info!(
            session_id = %self.id,
            game_mode = ?settings.game_mode,
            timer_enabled = settings.timer_enabled,
            "Game started"
        );
        Ok(())
    }

    /// Place or move the map pin of the guess in flight. The year part
    /// of the guess is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless a round is
    /// open for guessing.
    pub fn set_guess_location(&mut self, lat: f64, lng: f64) -> Result<(), SessionError> {
        self.require_in_progress("set_guess_location")?;
        let guess = self
            .current_guess
            .get_or_insert(PlayerGuess {
                location: None,
                year: self.bounds.default,
            });
        guess.location = Some(GeoPoint { lat, lng });
        debug!(round = self.current_round, lat, lng, "Guess location set");
        Ok(())
    }

    /// Move the year slider of the guess in flight, clamped to the
    /// configured bounds. The location part of the guess is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless a round is
    /// open for guessing.
    pub fn set_guess_year(&mut self, year: i32) -> Result<(), SessionError> {
        self.require_in_progress("set_guess_year")?;
        let clamped = self.bounds.clamp(year);
        let guess = self
            .current_guess
            .get_or_insert(PlayerGuess {
                location: None,
                year: clamped,
            });
        guess.year = clamped;
        debug!(round = self.current_round, year = clamped, "Guess year set");
        Ok(())
    }

    /// Submit the guess in flight and score the round.
    ///
    /// A guess without a location still scores: the location component
    /// is 0 and the distance error is infinite, through the same scoring
    /// path as a complete guess. Appends the result and transitions to
    /// `round-result`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless a round is
    /// open, and [`SessionError::MissingGuess`] if no guess exists
    /// (cannot occur through the normal lifecycle; callers surface it
    /// as a warning).
    pub fn submit_guess(&mut self) -> Result<(), SessionError> {
        self.require_in_progress("submit_guess")?;
        let guess = self.current_guess.ok_or(SessionError::MissingGuess)?;
        if guess.location.is_none() {
            warn!(
                round = self.current_round,
                "No location guessed; only the year will score"
            );
        }
        self.finish_round(guess)
    }

    /// Timer-expiry submission path.
    ///
    /// Produces exactly the result [`submit_guess`](Self::submit_guess)
    /// would for the same guess. Unlike the manual path, a missing guess
    /// falls back to the default guess -- a forced submission must
    /// always produce a result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless a round is
    /// open; a round that was already submitted cannot be submitted
    /// again, which makes a double-fired expiry harmless.
    pub fn force_submit(&mut self) -> Result<(), SessionError> {
        self.require_in_progress("force_submit")?;
        let guess = self.current_guess.unwrap_or_else(|| self.default_guess());
        warn!(
            round = self.current_round,
            "Time expired; guess submitted automatically"
        );
        self.finish_round(guess)
    }

    /// Advance past the displayed round result.
    ///
    /// On the last round transitions to `game-over`; otherwise opens the
    /// next round with a fresh default guess and, when enabled, a fresh
    /// countdown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless a round result
    /// is being displayed.
    pub fn next_round(&mut self) -> Result<(), SessionError> {
        if self.status != GameStatus::RoundResult {
            return Err(SessionError::InvalidTransition {
                operation: "next_round",
                status: self.status,
            });
        }

        if self.current_round >= TOTAL_ROUNDS {
            self.status = GameStatus::GameOver;
            info!(
                session_id = %self.id,
                final_score = self.cumulative_score(),
                "Game over"
            );
            return Ok(());
        }

        self.current_round = self.current_round.saturating_add(1);
        self.current_guess = Some(self.default_guess());
        self.reset_timer_fields();
        self.status = GameStatus::InProgress;
        debug!(round = self.current_round, "Round opened");
        Ok(())
    }

    /// Replace the settings. Allowed in any state; never resets round
    /// progress.
    ///
    /// When the new settings enable the timer, the remaining seconds are
    /// recomputed from the new duration; otherwise both countdown fields
    /// are cleared.
    pub fn update_settings(&mut self, settings: GameSettings) {
        self.settings = settings;
        if settings.timer_enabled {
            self.timer_remaining = Some(settings.timer_seconds());
            if self.status == GameStatus::InProgress && self.timer_started_at.is_none() {
                self.timer_started_at = Some(Utc::now());
            }
        } else {
            self.timer_started_at = None;
            self.timer_remaining = None;
        }
        debug!(timer_enabled = settings.timer_enabled, "Settings updated");
    }

    /// Return to the home screen, discarding the game in progress.
    ///
    /// Forces `not-started` from any state and drops events, results,
    /// and the guess in flight. The destructive confirmation dialog
    /// belongs to the caller, not to this component.
    pub fn return_home(&mut self) {
        self.status = GameStatus::NotStarted;
        self.events.clear();
        self.round_results.clear();
        self.current_round = 1;
        self.current_guess = None;
        self.timer_started_at = None;
        self.timer_remaining = None;
        info!(session_id = %self.id, "Returned home; session discarded");
    }

    // -----------------------------------------------------------------------
    // Countdown
    // -----------------------------------------------------------------------

    /// Advance the countdown by one second.
    ///
    /// Does nothing unless the timer is enabled and a round is open for
    /// guessing -- leaving `in-progress` pauses the countdown
    /// implicitly, so a tick arriving after a manual submission is
    /// [`TimerTick::Idle`], never a second submission. When the
    /// countdown reaches zero, the guess in flight is force-submitted
    /// and [`TimerTick::Expired`] is reported; the state machine
    /// guarantees at most one result per round no matter how many ticks
    /// arrive afterwards.
    pub fn tick_timer(&mut self) -> TimerTick {
        if self.status != GameStatus::InProgress || !self.settings.timer_enabled {
            return TimerTick::Idle;
        }
        let Some(remaining) = self.timer_remaining else {
            return TimerTick::Idle;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            // The in-progress check above makes the expiry path
            // infallible; a failure here means corrupted round state.
            match self.force_submit() {
                Ok(()) => TimerTick::Expired,
                Err(error) => {
                    warn!(%error, "Forced submission failed");
                    TimerTick::Idle
                }
            }
        } else {
            self.timer_remaining = Some(remaining);
            TimerTick::Running { remaining }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Identifier of the current session (regenerated on start).
    pub const fn session_id(&self) -> SessionId {
        self.id
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Active settings.
    pub const fn settings(&self) -> GameSettings {
        self.settings
    }

    /// Year slider bounds.
    pub const fn year_bounds(&self) -> YearBounds {
        self.bounds
    }

    /// Current round number, 1-based.
    pub const fn current_round(&self) -> u32 {
        self.current_round
    }

    /// The guess in flight, if a round is open.
    pub const fn current_guess(&self) -> Option<PlayerGuess> {
        self.current_guess
    }

    /// Seconds left on the countdown, if one is running.
    pub const fn timer_remaining(&self) -> Option<u32> {
        self.timer_remaining
    }

    /// The event of the current round, if a game is underway.
    pub fn current_event(&self) -> Option<&HistoricalEvent> {
        if self.status == GameStatus::NotStarted {
            return None;
        }
        self.events.get(self.round_index())
    }

    /// What the player may see for the current round, if one is open
    /// for guessing. Omits the event's year and coordinates.
    pub fn current_prompt(&self) -> Option<RoundPrompt> {
        if self.status != GameStatus::InProgress {
            return None;
        }
        self.events.get(self.round_index()).map(|event| RoundPrompt {
            round: self.current_round,
            total_rounds: TOTAL_ROUNDS,
            description: event.description.clone(),
            image_url: event.image_url.clone(),
            year_min: self.bounds.min,
            year_max: self.bounds.max,
        })
    }

    /// The most recently scored round, if any.
    pub fn last_result(&self) -> Option<&RoundResult> {
        self.round_results.last()
    }

    /// All scored rounds in play order.
    pub fn results(&self) -> &[RoundResult] {
        &self.round_results
    }

    /// Sum of total scores over all scored rounds.
    pub fn cumulative_score(&self) -> u32 {
        self.round_results
            .iter()
            .fold(0_u32, |sum, result| sum.saturating_add(result.total_score))
    }

    /// Presentation-facing view of the whole session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            status: self.status,
            settings: self.settings,
            current_round: self.current_round,
            total_rounds: TOTAL_ROUNDS,
            cumulative_score: self.cumulative_score(),
            current_guess: self.current_guess,
            timer_started_at: self.timer_started_at,
            timer_remaining: self.timer_remaining,
            results: self.round_results.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// The default guess each round starts with: no pin, default year.
    const fn default_guess(&self) -> PlayerGuess {
        PlayerGuess {
            location: None,
            year: self.bounds.default,
        }
    }

    /// Zero-based index of the current round into the event list.
    fn round_index(&self) -> usize {
        usize::try_from(self.current_round.saturating_sub(1)).unwrap_or(usize::MAX)
    }

    /// Guard: the operation is only valid while a round is open.
    fn require_in_progress(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.status == GameStatus::InProgress {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                operation,
                status: self.status,
            })
        }
    }

    /// Shared tail of the manual and forced submission paths: score the
    /// round, append the result, freeze the countdown, and transition to
    /// `round-result`.
    fn finish_round(&mut self, guess: PlayerGuess) -> Result<(), SessionError> {
        let event = self
            .events
            .get(self.round_index())
            .ok_or(SessionError::MissingEvent {
                round: self.current_round,
            })?;

        let result = scoring::score(event, &guess);
        info!(
            round = self.current_round,
            distance_error_km = result.distance_error_km,
            year_error = result.year_error,
            location_score = result.location_score,
            time_score = result.time_score,
            total_score = result.total_score,
            "Round scored"
        );

        self.round_results.push(result);
        self.current_guess = None;
        self.timer_started_at = None;
        self.timer_remaining = None;
        self.status = GameStatus::RoundResult;
        Ok(())
    }

    /// Initialize or clear the countdown fields per the active settings.
    fn reset_timer_fields(&mut self) {
        if self.settings.timer_enabled {
            self.timer_started_at = Some(Utc::now());
            self.timer_remaining = Some(self.settings.timer_seconds());
        } else {
            self.timer_started_at = None;
            self.timer_remaining = None;
        }
    }
}
