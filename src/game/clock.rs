use chrono::{DateTime, Local, NaiveDate};

/// Wall-clock source for record timestamps and the daily challenge.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn timestamp_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    /// Clock that only moves when told to.
    pub(crate) struct ManualClock {
        now: Cell<DateTime<Local>>,
    }

    impl ManualClock {
        pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32) -> Self {
            let now = Local
                .with_ymd_and_hms(year, month, day, hour, 0, 0)
                .earliest()
                .expect("valid local time");
            Self {
                now: Cell::new(now),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            self.now.get()
        }
    }

    #[test]
    fn test_today_follows_local_date() {
        let clock = ManualClock::at(2026, 10, 18, 23);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        clock.advance(Duration::hours(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }
}
