//! Global download pacing
//!
//! One clock is shared by every worker, regardless of host. Both ends of a
//! download are paced: starts are released one interval apart, and completed
//! downloads are stamped no closer than one interval to each other, so a slow
//! download that started early cannot finish alongside a fast one that started
//! later.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Clock {
    /// Stamp of the most recent completed download
    last_download: Option<Instant>,

    /// Earliest instant the next caller may start
    next_slot: Option<Instant>,
}

/// Enforces a minimum interval between downloads
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    clock: Mutex<Clock>,
}

impl RateLimiter {
    /// Creates a limiter spacing downloads `interval` apart
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            clock: Mutex::new(Clock::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Suspends until a new download may start
    ///
    /// The start instant is `max(now, last_download + interval, next_slot)`.
    /// It is reserved before sleeping, so the next caller waits at least one
    /// interval beyond it.
    pub async fn wait(&self) {
        let start = {
            let mut clock = self.clock.lock().await;
            let now = Instant::now();

            let mut start = now;
            if let Some(last) = clock.last_download {
                start = start.max(last + self.interval);
            }
            if let Some(slot) = clock.next_slot {
                start = start.max(slot);
            }

            clock.next_slot = Some(start + self.interval);
            start
        };

        if start > Instant::now() {
            tracing::trace!("Rate limiter delaying download by {:?}", start - Instant::now());
            tokio::time::sleep_until(start).await;
        }
    }

    /// Records that a download finished writing and returns its stamp
    ///
    /// If the previous completion was less than one interval ago, this waits
    /// until the interval has passed before stamping. The lock is held while
    /// waiting so concurrent completions are stamped one at a time.
    pub async fn record_download(&self) -> Instant {
        let mut clock = self.clock.lock().await;

        if let Some(last) = clock.last_download {
            let earliest = last + self.interval;
            if earliest > Instant::now() {
                tracing::trace!(
                    "Rate limiter holding completion for {:?}",
                    earliest - Instant::now()
                );
                tokio::time::sleep_until(earliest).await;
            }
        }

        let stamp = Instant::now();
        clock.last_download = Some(stamp);

        let after_stamp = stamp + self.interval;
        clock.next_slot = Some(clock.next_slot.map_or(after_stamp, |slot| slot.max(after_stamp)));

        stamp
    }
}
