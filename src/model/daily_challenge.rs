use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Once-per-day completion flag. A record only counts on the calendar day it
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub date: NaiveDate,
    pub completed: bool,
}

impl DailyChallenge {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            date: today,
            completed: false,
        }
    }

    /// The challenge in effect today: the stored record if it is dated
    /// today, otherwise a new incomplete one.
    pub fn for_today(stored: Option<DailyChallenge>, today: NaiveDate) -> Self {
        match stored {
            Some(challenge) if challenge.date == today => challenge,
            _ => Self::fresh(today),
        }
    }

    pub fn is_completed_on(&self, today: NaiveDate) -> bool {
        self.date == today && self.completed
    }

    pub fn completed_on(today: NaiveDate) -> Self {
        Self {
            date: today,
            completed: true,
        }
    }
}
