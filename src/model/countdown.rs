use std::time::Duration;

use serde_with::serde_as;
use serde_with::DurationSeconds;

const TICK: Duration = Duration::from_secs(1);

/// Whole-second countdown for a session's time limit.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Countdown {
    #[serde_as(as = "DurationSeconds<u64>")]
    pub limit: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub remaining: Duration,
}

impl Countdown {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn time_spent(&self) -> Duration {
        self.limit.saturating_sub(self.remaining)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining.as_secs()
    }

    pub fn ticked(&self) -> Countdown {
        self.penalized(TICK)
    }

    pub fn penalized(&self, penalty: Duration) -> Countdown {
        let mut new_state = *self;
        new_state.remaining = self.remaining.saturating_sub(penalty);
        new_state
    }
}
