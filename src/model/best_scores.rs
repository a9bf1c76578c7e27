use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Difficulty;

/// Highest score reached per difficulty. A difficulty without an entry has
/// never been won. Stored maps may hold `null` for unset entries; those load
/// as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Difficulty, Option<u32>>")]
pub struct BestScores(BTreeMap<Difficulty, u32>);

impl From<BTreeMap<Difficulty, Option<u32>>> for BestScores {
    fn from(raw: BTreeMap<Difficulty, Option<u32>>) -> Self {
        BestScores(
            raw.into_iter()
                .filter_map(|(difficulty, score)| score.map(|s| (difficulty, s)))
                .collect(),
        )
    }
}

impl BestScores {
    pub fn get(&self, difficulty: Difficulty) -> Option<u32> {
        self.0.get(&difficulty).copied()
    }

    /// Stores `score` if it beats the current best (or there is none).
    /// Returns whether it was stored.
    pub fn offer(&mut self, difficulty: Difficulty, score: u32) -> bool {
        match self.0.get(&difficulty) {
            Some(best) if *best >= score => false,
            _ => {
                self.0.insert(difficulty, score);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_score_is_always_best() {
        let mut best = BestScores::default();
        assert_eq!(best.get(Difficulty::Easy), None);
        assert!(best.offer(Difficulty::Easy, 12));
        assert_eq!(best.get(Difficulty::Easy), Some(12));
    }

    #[test]
    fn test_only_strictly_greater_replaces() {
        let mut best = BestScores::default();
        best.offer(Difficulty::Medium, 80);
        assert!(!best.offer(Difficulty::Medium, 80));
        assert!(!best.offer(Difficulty::Medium, 79));
        assert!(best.offer(Difficulty::Medium, 81));
        assert_eq!(best.get(Difficulty::Medium), Some(81));
        assert_eq!(best.get(Difficulty::Hard), None);
    }

    #[test]
    fn test_null_entries_load_as_unset() {
        let best: BestScores =
            serde_json::from_str(r#"{"easy":null,"medium":140,"hard":null}"#).unwrap();
        assert_eq!(best.get(Difficulty::Easy), None);
        assert_eq!(best.get(Difficulty::Medium), Some(140));
        assert_eq!(serde_json::to_string(&best).unwrap(), r#"{"medium":140}"#);
    }
}
