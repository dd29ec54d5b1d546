//! Question countdown
//!
//! A [`QuestionTimer`] runs one countdown at a time on the Tokio runtime.
//! While running it reports the remaining time every period and, once the
//! time is up, either reports expiry (strict timeout) or a final zero tick.
//!
//! The timer never touches game state. It only calls the notification
//! callback it was started with, and only while holding the lock on the
//! "current countdown" slot after checking that its own generation is still
//! the one stored there. Starting a new countdown or cancelling replaces
//! that slot under the same lock, so once [`QuestionTimer::cancel`] returns
//! no notification of the cancelled countdown can be delivered anymore.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Identity of one countdown
///
/// Generations are unique per timer and increase with every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

/// Notifications emitted by a running countdown
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerNotification {
    /// Time left on the countdown
    Tick {
        /// The countdown that produced this tick
        generation: Generation,
        /// Time remaining, decreasing down to zero
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        remaining: Duration,
        /// Full duration of the countdown
        #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
        total: Duration,
    },
    /// The countdown ran out under strict timeout
    Expired {
        /// The countdown that expired
        generation: Generation,
    },
}

impl TimerNotification {
    /// The countdown this notification belongs to
    pub fn generation(&self) -> Generation {
        match self {
            Self::Tick { generation, .. } | Self::Expired { generation } => *generation,
        }
    }
}

/// The countdown currently allowed to notify
#[derive(Debug)]
struct Live {
    generation: Generation,
    token: CancellationToken,
}

type Slot = Arc<Mutex<Option<Live>>>;

fn lock(slot: &Mutex<Option<Live>>) -> MutexGuard<'_, Option<Live>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A cancellable, periodically notifying countdown
#[derive(Debug)]
pub struct QuestionTimer {
    /// The live countdown, if any
    current: Slot,
    /// Last generation handed out
    last_generation: u64,
    /// Interval between two ticks
    period: Duration,
}

impl Default for QuestionTimer {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::constants::timer::PERIOD_MILLIS))
    }
}

impl QuestionTimer {
    /// Creates an idle timer ticking every `period`
    pub fn new(period: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            last_generation: 0,
            period,
        }
    }

    /// Starts a countdown of `total`, replacing any countdown still running
    ///
    /// `notify` is called from the countdown task for every tick and for the
    /// final notification. It runs under the timer lock and must not block.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn start<F>(&mut self, total: Duration, strict_timeout: bool, notify: F) -> Generation
    where
        F: Fn(TimerNotification) + Send + 'static,
    {
        self.last_generation += 1;
        let generation = Generation(self.last_generation);
        let token = CancellationToken::new();

        if let Some(previous) = lock(&self.current).replace(Live {
            generation,
            token: token.clone(),
        }) {
            previous.token.cancel();
        }

        let slot = Arc::clone(&self.current);
        let period = self.period;
        let deadline = Instant::now() + total;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => return,
                    _ = interval.tick() => {}
                }

                let remaining = deadline.saturating_duration_since(Instant::now());

                let mut current = lock(&slot);
                if current.as_ref().is_none_or(|live| live.generation != generation) {
                    return;
                }

                if remaining.is_zero() {
                    *current = None;
                    if strict_timeout {
                        notify(TimerNotification::Expired { generation });
                    } else {
                        notify(TimerNotification::Tick {
                            generation,
                            remaining: Duration::ZERO,
                            total,
                        });
                    }
                    return;
                }

                notify(TimerNotification::Tick {
                    generation,
                    remaining,
                    total,
                });
            }
        });

        generation
    }

    /// Stops the running countdown
    ///
    /// Safe to call at any time and any number of times. After it returns,
    /// the cancelled countdown delivers no further notifications.
    pub fn cancel(&self) {
        if let Some(live) = lock(&self.current).take() {
            live.token.cancel();
        }
    }

    /// The generation of the running countdown
    pub fn current(&self) -> Option<Generation> {
        lock(&self.current).as_ref().map(|live| live.generation)
    }

    /// Whether a countdown is running
    pub fn is_running(&self) -> bool {
        self.current().is_some()
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
