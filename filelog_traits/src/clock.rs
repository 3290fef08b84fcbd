use chrono::{DateTime, Local};

/// Timestamp layout used for every log record: `YYYY-MM-DD HH:MM:SS.mmm`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Wall-clock abstraction for log timestamps.
///
/// - now(): current local date and time
/// - timestamp(): `now()` rendered with [`TIMESTAMP_FORMAT`]
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Current time with millisecond precision, milliseconds zero-padded to 3 digits.
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Default clock backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl LocalClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for LocalClock {
    #[inline]
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

pub mod test_clock {
    use super::*;
    use chrono::TimeDelta;
    use std::sync::{Arc, Mutex};

    /// Deterministic clock whose time only moves when told to.
    ///
    /// now() = origin + offset
    #[derive(Debug, Clone)]
    pub struct TestClock {
        origin: DateTime<Local>,
        offset: Arc<Mutex<TimeDelta>>,
    }

    impl TestClock {
        /// Clock frozen at `origin`.
        pub fn at(origin: DateTime<Local>) -> Self {
            Self {
                origin,
                offset: Arc::new(Mutex::new(TimeDelta::zero())),
            }
        }

        /// Advance the clock by the given number of milliseconds.
        pub fn advance_ms(&self, ms: i64) {
            if let Ok(mut off) = self.offset.lock() {
                *off += TimeDelta::milliseconds(ms);
            }
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Local> {
            let off = self
                .offset
                .lock()
                .map(|g| *g)
                .unwrap_or_else(|_| TimeDelta::zero());
            self.origin + off
        }
    }

}
