use chrono::{Local, NaiveDateTime, SubsecRound};

/// Source of "now" for entry and exit stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, truncated to whole seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-util"))]
mod manual {
    use super::Clock;
    use chrono::{Duration, NaiveDateTime, SubsecRound};
    use std::sync::Mutex;

    /// Clock that only moves when told to. Used to simulate elapsed parking time.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<NaiveDateTime>,
    }

    impl ManualClock {
        pub fn new(start: NaiveDateTime) -> Self {
            Self {
                now: Mutex::new(start.trunc_subsecs(0)),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
            *now += by;
        }

        pub fn set(&self, at: NaiveDateTime) {
            let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
            *now = at.trunc_subsecs(0);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> NaiveDateTime {
            *self.now.lock().unwrap_or_else(|e| e.into_inner())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_manual_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let clock = ManualClock::new(start);

        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));
    }

    #[test]
    fn test_system_clock_has_no_subseconds() {
        use chrono::Timelike;
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }
}
