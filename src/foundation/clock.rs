use std::{
    cell::Cell,
    time::{Duration, Instant},
};

/// Wall-clock source for frame pacing and progress reports.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    fn sleep(&self, dur: Duration);
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Deterministic clock: time only moves on `sleep` or `advance`.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dur: Duration) {
        self.now.set(self.now.get() + dur);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, dur: Duration) {
        self.advance(dur);
    }
}

/// `MM:SS` rendering used in progress and summary messages.
pub fn format_mmss(dur: Duration) -> String {
    let secs = dur.as_secs_f64().max(0.0);
    format!("{:0>2.0}:{:0>2.0}", (secs / 60.0).floor(), (secs % 60.0).floor())
}
