//! Headless game engine binary for Time Trek.
//!
//! This is the entry point that wires the session state machine, the
//! event catalog, the round timer, and a guess source into a complete
//! game run. It loads configuration, draws the session's events, plays
//! every round, and logs the results.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `timetrek-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load and validate the event catalog
//! 4. Draw this session's events (date-seeded in daily mode)
//! 5. Create and start the session
//! 6. Play all rounds against the guess source
//! 7. Log the final score

mod error;
mod random_guess;

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use timetrek_core::catalog::{self, EventCatalog};
use timetrek_core::config::GameConfig;
use timetrek_core::session::{GameSession, TOTAL_ROUNDS};
use timetrek_core::source::GuessSource;
use timetrek_core::timer::RoundTimer;
use timetrek_types::{GameSettings, GameStatus, HistoricalEvent};

use crate::error::EngineError;
use crate::random_guess::RandomGuessSource;

/// Application entry point for the game engine.
///
/// Initializes all subsystems and plays one full session. Returns an
/// error code on failure.
///
/// # Errors
///
/// Returns an error if any initialization step or the session itself
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("timetrek-engine starting");
    let settings = config.game.settings();
    info!(
        game_mode = ?settings.game_mode,
        timer_enabled = settings.timer_enabled,
        timer_duration = settings.timer_duration,
        events_path = config.catalog.events_path,
        "Configuration loaded"
    );

    // 3 + 4. Load the catalog and draw this session's events.
    let events = draw_events(&config, settings)?;

    // 5. Create and start the session.
    let bounds = config.rules.bounds()?;
    let mut session = GameSession::new(bounds, settings);
    session.start(settings, events)?;
    info!(session_id = %session.session_id(), "Session started");
    let session = Arc::new(Mutex::new(session));

    // 6. Play all rounds against the demo guess source.
    //    TIMETREK_SEED makes the run reproducible.
    let mut source = std::env::var("TIMETREK_SEED")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map_or_else(RandomGuessSource::new, RandomGuessSource::seeded);
    let final_score = run_game(&session, &mut source).await?;

    // 7. Log the final score.
    info!(final_score, "Engine run complete");
    Ok(())
}

/// Resolve and load the configuration file.
///
/// `TIMETREK_CONFIG` overrides the default path.
///
/// # Errors
///
/// Returns [`EngineError::Config`] when the file cannot be loaded.
fn load_config() -> Result<GameConfig, EngineError> {
    let path = std::env::var("TIMETREK_CONFIG")
        .unwrap_or_else(|_| String::from("timetrek-config.yaml"));
    GameConfig::from_file(Path::new(&path)).map_err(EngineError::from)
}

/// Load the event catalog and draw one session's worth of events.
///
/// Daily mode seeds the RNG from the calendar date so every player
/// draws the same sequence; other modes draw from OS entropy.
///
/// # Errors
///
/// Returns [`EngineError::Catalog`] when the catalog cannot be loaded
/// or holds fewer events than a session needs.
fn draw_events(
    config: &GameConfig,
    settings: GameSettings,
) -> Result<Vec<HistoricalEvent>, EngineError> {
    let event_catalog = EventCatalog::from_file(Path::new(&config.catalog.events_path))?;
    let mut rng = catalog::rng_for_mode(settings.game_mode, Utc::now().date_naive());
    let rounds = usize::try_from(TOTAL_ROUNDS).unwrap_or(usize::MAX);
    Ok(event_catalog.draw(&mut rng, rounds)?)
}

/// Play every round of a started session, pulling guesses from the
/// source, and return the final cumulative score.
///
/// When the settings enable the timer, a [`RoundTimer`] counts down
/// while the source decides; a guess arriving after a forced submission
/// is dropped for that round. The timer is cancelled before the next
/// round opens so a stale expiry can never fire across rounds.
///
/// # Errors
///
/// Returns [`EngineError`] if the guess source or a session operation
/// fails.
async fn run_game(
    session: &Arc<Mutex<GameSession>>,
    source: &mut dyn GuessSource,
) -> Result<u32, EngineError> {
    loop {
        let (prompt, timed) = {
            let guard = session.lock().await;
            (guard.current_prompt(), guard.settings().timer_enabled)
        };
        let Some(prompt) = prompt else { break };

        // The countdown runs while the source decides.
        let timer = timed.then(|| RoundTimer::spawn(Arc::clone(session)));

        let guess = source.guess(&prompt)?;

        {
            let mut guard = session.lock().await;
            // The timer may have force-submitted while the source was
            // deciding; the guess only lands if the round is still open.
            if guard.status() == GameStatus::InProgress {
                if let Some(pin) = guess.location {
                    guard.set_guess_location(pin.lat, pin.lng)?;
                }
                guard.set_guess_year(guess.year)?;
                guard.submit_guess()?;
            } else {
                warn!(
                    round = prompt.round,
                    "Round was force-submitted before the guess landed"
                );
            }
        }
        if let Some(timer) = timer {
            timer.cancel();
        }

        let mut guard = session.lock().await;
        if let Some(result) = guard.last_result() {
            info!(
                round = prompt.round,
                distance_error_km = result.distance_error_km,
                year_error = result.year_error,
                location_score = result.location_score,
                time_score = result.time_score,
                total_score = result.total_score,
                "Round finished"
            );
        }
        guard.next_round()?;
    }

    let guard = session.lock().await;
    Ok(guard.cumulative_score())
}
