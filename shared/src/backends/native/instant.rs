use std::time::Duration;

/// Monotonic point in time, used to measure permission rate windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant {
    inner: std::time::Instant,
}

impl Instant {
    pub fn now() -> Self {
        Self {
            inner: std::time::Instant::now(),
        }
    }

    /// Time elapsed from `earlier` until `self`, saturating at zero.
    pub fn duration_since(&self, earlier: &Instant) -> Duration {
        self.inner.saturating_duration_since(earlier.inner)
    }

    pub fn add_duration(&mut self, duration: Duration) {
        self.inner += duration;
    }
}
