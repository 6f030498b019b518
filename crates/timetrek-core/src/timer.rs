//! Async driver for the per-round countdown.
//!
//! [`RoundTimer`] owns a tokio task that ticks the session once per
//! wall-clock second via [`GameSession::tick_timer`]. The session's
//! state machine holds the actual countdown and the at-most-one
//! forced-submission guarantee; this task only supplies the seconds.
//!
//! One timer is spawned per round. The task stops on its own when the
//! countdown expires or when the session leaves the guessing phase
//! (manual submission), and it can be cancelled eagerly via
//! [`RoundTimer::cancel`]. Restarting or navigating home must cancel
//! the pending timer so a stale expiry can never fire into a new
//! session; dropping the handle also aborts the task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::{GameSession, TimerTick};

/// Handle to the countdown task of one round.
#[derive(Debug)]
pub struct RoundTimer {
    /// Set by [`cancel`](Self::cancel); checked before every tick.
    cancelled: Arc<AtomicBool>,
    /// The ticking task.
    handle: JoinHandle<()>,
}

impl RoundTimer {
    /// Spawn the countdown task for the session's current round.
    ///
    /// The task sleeps one second, then ticks the session, repeating
    /// until the countdown expires, the session leaves the guessing
    /// phase, or the timer is cancelled. Spawning on an untimed session
    /// is harmless: the first tick reports idle and the task stops.
    pub fn spawn(session: Arc<Mutex<GameSession>>) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if flag.load(Ordering::Acquire) {
                    debug!("Round timer cancelled");
                    break;
                }

                let mut guard = session.lock().await;
                match guard.tick_timer() {
                    TimerTick::Running { remaining } => {
                        debug!(remaining, "Round timer tick");
                    }
                    TimerTick::Expired => {
                        info!("Round timer expired");
                        break;
                    }
                    TimerTick::Idle => {
                        // The round was submitted (or the timer turned
                        // off) while we slept; nothing left to count.
                        debug!("Round timer idle; stopping");
                        break;
                    }
                }
            }
        });

        Self { cancelled, handle }
    }

    /// Stop the countdown without ticking again.
    ///
    /// Safe to call at any time, including after the task has already
    /// stopped on its own.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.handle.abort();
    }

    /// Whether the ticking task has stopped (expired, idled, or
    /// cancelled).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RoundTimer {
    /// A dropped handle must not leave a live task that could force a
    /// stale submission.
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.handle.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use timetrek_types::{
        DistanceUnit, EventId, GameMode, GameSettings, GameStatus, HistoricalEvent, Place,
    };

    use super::*;
    use crate::session::YearBounds;

    fn make_events() -> Vec<HistoricalEvent> {
        (0..5)
            .map(|i: i32| HistoricalEvent {
                id: EventId::new(),
                year: 1950_i32.checked_add(i).unwrap(),
                description: format!("event {i}"),
                image_url: format!("https://example.org/{i}.jpg"),
                location: Place {
                    name: format!("place {i}"),
                    lat: 10.0,
                    lng: 20.0,
                },
            })
            .collect()
    }

    fn timed_settings(minutes: u32) -> GameSettings {
        GameSettings {
            game_mode: GameMode::Timed,
            distance_unit: DistanceUnit::Km,
            timer_enabled: true,
            timer_duration: minutes,
        }
    }

    fn timed_session(minutes: u32) -> Arc<Mutex<GameSession>> {
        let bounds = YearBounds::new(1900, 2026, 1962).unwrap();
        let mut session = GameSession::new(bounds, timed_settings(minutes));
        session
            .start(timed_settings(minutes), make_events())
            .unwrap();
        Arc::new(Mutex::new(session))
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_forces_submission_once() {
        let session = timed_session(1);
        let timer = RoundTimer::spawn(Arc::clone(&session));

        // Well past the 60-second countdown; virtual time auto-advances.
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert!(timer.is_finished());
        let guard = session.lock().await;
        assert_eq!(guard.status(), GameStatus::RoundResult);
        assert_eq!(guard.results().len(), 1);
        assert!(
            guard
                .last_result()
                .unwrap()
                .distance_error_km
                .is_infinite()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_forced_submission() {
        let session = timed_session(1);
        let timer = RoundTimer::spawn(Arc::clone(&session));

        tokio::time::sleep(Duration::from_secs(10)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(120)).await;

        let guard = session.lock().await;
        assert_eq!(guard.status(), GameStatus::InProgress);
        assert!(guard.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_submission_stops_the_task() {
        let session = timed_session(5);
        let timer = RoundTimer::spawn(Arc::clone(&session));

        tokio::time::sleep(Duration::from_secs(3)).await;
        {
            let mut guard = session.lock().await;
            guard.submit_guess().unwrap();
        }
        // The next tick observes the result state and stops; no second
        // result appears no matter how long we wait.
        tokio::time::sleep(Duration::from_secs(600)).await;

        assert!(timer.is_finished());
        let guard = session.lock().await;
        assert_eq!(guard.results().len(), 1);
        assert_eq!(guard.status(), GameStatus::RoundResult);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_cannot_fire_into_new_round() {
        let session = timed_session(1);
        let timer = RoundTimer::spawn(Arc::clone(&session));

        {
            let mut guard = session.lock().await;
            guard.submit_guess().unwrap();
        }
        // Cancel the old round's timer before opening the next round,
        // as the engine does.
        timer.cancel();
        {
            let mut guard = session.lock().await;
            guard.next_round().unwrap();
        }

        tokio::time::sleep(Duration::from_secs(600)).await;

        let guard = session.lock().await;
        // Round two is still open: the old timer never touched it.
        assert_eq!(guard.status(), GameStatus::InProgress);
        assert_eq!(guard.current_round(), 2);
        assert_eq!(guard.results().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn untimed_session_task_stops_immediately() {
        let bounds = YearBounds::new(1900, 2026, 1962).unwrap();
        let settings = GameSettings {
            game_mode: GameMode::Classic,
            distance_unit: DistanceUnit::Km,
            timer_enabled: false,
            timer_duration: 5,
        };
        let mut session = GameSession::new(bounds, settings);
        session.start(settings, make_events()).unwrap();
        let session = Arc::new(Mutex::new(session));

        let timer = RoundTimer::spawn(Arc::clone(&session));
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(timer.is_finished());
        let guard = session.lock().await;
        assert_eq!(guard.status(), GameStatus::InProgress);
    }
}
