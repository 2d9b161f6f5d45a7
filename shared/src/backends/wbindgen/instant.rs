use std::time::Duration;

/// Monotonic point in time, used to measure permission rate windows.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Instant {
    inner_millis: f64,
}

impl Instant {
    pub fn now() -> Self {
        Self {
            inner_millis: js_sys::Date::now(),
        }
    }

    /// Time elapsed from `earlier` until `self`, saturating at zero.
    pub fn duration_since(&self, earlier: &Instant) -> Duration {
        let millis = (self.inner_millis - earlier.inner_millis).max(0.0);
        Duration::from_secs_f64(millis / 1000.0)
    }

    pub fn add_duration(&mut self, duration: Duration) {
        self.inner_millis += duration.as_secs_f64() * 1000.0;
    }
}
