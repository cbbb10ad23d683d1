//! Results ranking
//!
//! Racers that never finished are timed with [`DNF_TIME`], a sentinel larger
//! than any reachable race time, so ordering stays a plain total sort.

use serde::{Deserialize, Serialize};

/// Sentinel finish time for "did not finish" (seconds)
pub const DNF_TIME: f32 = f32::MAX;

/// One row of the results table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    /// Finish time in seconds, or [`DNF_TIME`]
    pub time: f32,
    /// Registration index of the racer (player is 0)
    pub racer: usize,
    pub is_player: bool,
}

impl RankingEntry {
    pub fn is_dnf(&self) -> bool {
        self.time >= DNF_TIME
    }
}

/// Sort entries ascending by time.
///
/// The sort is stable over registration order, so equal times favour the
/// racer registered first.
pub fn rank(mut entries: Vec<RankingEntry>) -> Vec<RankingEntry> {
    entries.sort_by_key(|e| e.racer);
    entries.sort_by(|a, b| a.time.total_cmp(&b.time));
    entries
}

/// 1-based place of the player, if present
pub fn player_place(ranking: &[RankingEntry]) -> Option<usize> {
    ranking.iter().position(|e| e.is_player).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, time: f32, racer: usize) -> RankingEntry {
        RankingEntry {
            name: name.to_string(),
            time,
            racer,
            is_player: racer == 0,
        }
    }

    #[test]
    fn test_ascending() {
        let r = rank(vec![entry("You", 30.0, 0), entry("Bot 1", 25.0, 1), entry("Bot 2", 40.0, 2)]);
        let names: Vec<_> = r.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Bot 1", "You", "Bot 2"]);
        assert_eq!(player_place(&r), Some(2));
    }

    #[test]
    fn test_tie_favors_first_registered() {
        let r = rank(vec![entry("Bot 1", 20.0, 1), entry("You", 20.0, 0)]);
        assert_eq!(r[0].name, "You");
        assert_eq!(player_place(&r), Some(1));
    }

    #[test]
    fn test_dnf_last() {
        let r = rank(vec![entry("You", DNF_TIME, 0), entry("Bot 1", 299.0, 1)]);
        assert_eq!(r[1].name, "You");
        assert!(r[1].is_dnf());
        assert!(!r[0].is_dnf());
    }

    #[test]
    fn test_deterministic() {
        let input = vec![entry("A", 10.0, 0), entry("B", 10.0, 1), entry("C", 10.0, 2)];
        assert_eq!(rank(input.clone()), rank(input));
    }
}
