const STEP_TENTHS: u32 = 2;

/// Score multiplier earned by consecutive matches. Kept as a streak count so
/// the value never accumulates floating point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboMultiplier {
    streak: u32,
}

impl ComboMultiplier {
    /// 1.0 with no streak, +0.2 per consecutive match.
    pub fn value(&self) -> f64 {
        f64::from(10 + STEP_TENTHS * self.streak) / 10.0
    }

    pub fn bumped(&self) -> ComboMultiplier {
        ComboMultiplier {
            streak: self.streak + 1,
        }
    }

    pub fn reset(&self) -> ComboMultiplier {
        ComboMultiplier::default()
    }
}

impl std::fmt::Display for ComboMultiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{:.1}", self.value())
    }
}
