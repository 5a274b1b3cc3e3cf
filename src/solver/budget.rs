//! Wall-clock budget shared by the solvers.

use std::time::{Duration, Instant};

/// A running stopwatch with a time limit.
///
/// Solvers poll [`is_exhausted`](Self::is_exhausted) at every loop iteration
/// and wind down on their own; nothing is interrupted from outside.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    started: Instant,
    limit: Duration,
    stopped: Option<Duration>,
}

impl Budget {
    /// Starts a budget of `limit`.
    pub fn start(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
            stopped: None,
        }
    }

    /// Time since the start, frozen once stopped.
    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.started.elapsed())
    }

    /// Whether the limit has been reached. A zero limit is exhausted from
    /// the start.
    pub fn is_exhausted(&self) -> bool {
        self.elapsed() >= self.limit
    }

    /// Time left before the limit, zero once exhausted.
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    /// The configured limit.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Freezes the stopwatch and returns the final elapsed time.
    pub fn stop(&mut self) -> Duration {
        let elapsed = self.elapsed();
        self.stopped = Some(elapsed);
        elapsed
    }
}
