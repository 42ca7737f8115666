use std::time::{Duration, Instant};

/// Rate limiter: lets an action through at most once per `interval`.
#[derive(Clone, Debug)]
pub struct Debounce {
    interval: Duration,
    last: Option<Instant>,
}

impl Debounce {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` and starts a new interval if the previous one has elapsed at `now`.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Runs `f` if the interval has elapsed. Returns whether it ran.
    pub fn run(&mut self, f: impl FnOnce()) -> bool {
        let ready = self.ready(Instant::now());
        if ready {
            f();
        }
        ready
    }
}
