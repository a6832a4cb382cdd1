//! Rank bands derived from total XP

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankId {
    Novice,
    Adventurer,
    Daredevil,
    Legend,
    Mythic,
}

impl RankId {
    /// XP bonus as an integer percentage (110 = x1.1)
    pub fn xp_multiplier_percent(&self) -> u64 {
        match self {
            RankId::Novice => 100,
            RankId::Adventurer => 110,
            RankId::Daredevil => 120,
            RankId::Legend => 130,
            RankId::Mythic => 150,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub id: RankId,
    pub name: &'static str,
    pub min_xp: u64,
}

impl Rank {
    pub fn xp_multiplier_percent(&self) -> u64 {
        self.id.xp_multiplier_percent()
    }
}

/// Ordered by `min_xp` ascending
pub const RANKS: [Rank; 5] = [
    Rank { id: RankId::Novice, name: "Novice", min_xp: 0 },
    Rank { id: RankId::Adventurer, name: "Adventurer", min_xp: 500 },
    Rank { id: RankId::Daredevil, name: "Daredevil", min_xp: 1_500 },
    Rank { id: RankId::Legend, name: "Legend", min_xp: 4_000 },
    Rank { id: RankId::Mythic, name: "Mythic", min_xp: 10_000 },
];

/// Highest rank whose `min_xp` is not above `xp`
pub fn rank_for_xp(xp: u64) -> &'static Rank {
    RANKS
        .iter()
        .rev()
        .find(|rank| rank.min_xp <= xp)
        .unwrap_or(&RANKS[0])
}

/// The rank after the current one, if any
pub fn next_rank(xp: u64) -> Option<&'static Rank> {
    RANKS.iter().find(|rank| rank.min_xp > xp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_lookup() {
        assert_eq!(rank_for_xp(0).id, RankId::Novice);
        assert_eq!(rank_for_xp(499).id, RankId::Novice);
        assert_eq!(rank_for_xp(500).id, RankId::Adventurer);
        assert_eq!(rank_for_xp(3_999).id, RankId::Daredevil);
        assert_eq!(rank_for_xp(4_000).id, RankId::Legend);
        assert_eq!(rank_for_xp(u64::MAX).id, RankId::Mythic);
    }

    #[test]
    fn test_ranks_sorted_and_multipliers_ascend() {
        for pair in RANKS.windows(2) {
            assert!(pair[0].min_xp < pair[1].min_xp);
            assert!(pair[0].xp_multiplier_percent() < pair[1].xp_multiplier_percent());
        }
    }

    #[test]
    fn test_next_rank() {
        assert_eq!(next_rank(0).map(|r| r.id), Some(RankId::Adventurer));
        assert_eq!(next_rank(10_000), None);
    }
}
