//! Reward tables and XP multiplier stacking

use crate::models::Difficulty;
use crate::ranks::Rank;

/// Photo tasks earn x1.5
pub const PHOTO_MULTIPLIER_PERCENT: u64 = 150;
/// Active boost window doubles XP
pub const BOOST_MULTIPLIER: u64 = 2;

pub fn base_points(difficulty: Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 25,
        Difficulty::Hard => 50,
    }
}

pub fn base_xp(difficulty: Difficulty) -> u64 {
    match difficulty {
        Difficulty::Easy => 20,
        Difficulty::Medium => 40,
        Difficulty::Hard => 80,
    }
}

/// Lookup by name; unknown names use the easy tier
pub fn base_points_for(name: &str) -> u64 {
    base_points(Difficulty::parse(name))
}

pub fn base_xp_for(name: &str) -> u64 {
    base_xp(Difficulty::parse(name))
}

fn apply_percent(value: u64, percent: u64) -> u64 {
    value.saturating_mul(percent) / 100
}

/// Each stage of the XP calculation, floored after every multiplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XpBreakdown {
    pub base: u64,
    pub after_rank: u64,
    pub after_photo: u64,
    pub total: u64,
}

/// Stack multipliers in fixed order: rank, photo, boost
pub fn stack_xp(base: u64, rank: &Rank, is_photo: bool, boost_active: bool) -> XpBreakdown {
    let after_rank = apply_percent(base, rank.xp_multiplier_percent());
    let after_photo = if is_photo {
        apply_percent(after_rank, PHOTO_MULTIPLIER_PERCENT)
    } else {
        after_rank
    };
    let total = if boost_active {
        after_photo.saturating_mul(BOOST_MULTIPLIER)
    } else {
        after_photo
    };
    XpBreakdown { base, after_rank, after_photo, total }
}
