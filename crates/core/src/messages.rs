//! Effect signals sent from the engine to the presentation layer

use serde::{Deserialize, Serialize};

use crate::models::TaskKind;
use crate::ranks::RankId;
use crate::shop::ShopEffect;

/// Discrete events the front end turns into toasts and animations.
/// The engine never waits on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEffect {
    /// A selected task was revealed
    TaskRevealed { task_id: String, kind: TaskKind, is_photo: bool },

    /// The chosen category has nothing left for this kind
    EmptyPool { category: String, kind: TaskKind },

    XpGained { amount: u64 },

    PointsGained { amount: u64 },

    LevelUp { level: u32 },

    RankUp { from: RankId, to: RankId },

    QuestCompleted { quest_id: String, title: String },

    ChallengeCompleted { challenge_id: String, title: String },

    AchievementUnlocked { badge: String, name: String },

    /// A skip was paid for with a token
    SkipTokenUsed { remaining: u32 },

    /// A timed dare ran out
    TimeUp { task_id: String },

    RewardClaimed { source_id: String, points: u64, xp: u64 },

    ItemPurchased { item_id: String, price: u64 },

    /// What a mystery box turned into
    SurpriseRevealed { effect: ShopEffect },

    QuestsRefreshed { added: Vec<String>, removed: Vec<String> },

    ChallengesRefreshed { date: String },

    TaskShared { task_id: String },
}

impl GameEffect {
    /// Short human-readable notification text
    pub fn describe(&self) -> String {
        match self {
            GameEffect::TaskRevealed { kind, is_photo, .. } => {
                if *is_photo {
                    "Photo dare!".to_string()
                } else {
                    format!("{}!", kind.label())
                }
            }
            GameEffect::EmptyPool { category, kind } => {
                format!("No {} tasks left in {}", kind.label().to_lowercase(), category)
            }
            GameEffect::XpGained { amount } => format!("+{} XP", amount),
            GameEffect::PointsGained { amount } => format!("+{} points", amount),
            GameEffect::LevelUp { level } => format!("Level up! You reached level {}", level),
            GameEffect::RankUp { to, .. } => format!("Rank up! You are now {:?}", to),
            GameEffect::QuestCompleted { title, .. } => format!("Quest complete: {}", title),
            GameEffect::ChallengeCompleted { title, .. } => format!("Challenge complete: {}", title),
            GameEffect::AchievementUnlocked { name, .. } => format!("Achievement unlocked: {}", name),
            GameEffect::SkipTokenUsed { remaining } => {
                format!("Skip token used ({} left)", remaining)
            }
            GameEffect::TimeUp { .. } => "Time's up!".to_string(),
            GameEffect::RewardClaimed { points, xp, .. } => {
                format!("Reward claimed: +{} points, +{} XP", points, xp)
            }
            GameEffect::ItemPurchased { item_id, price } => {
                format!("Bought {} for {} points", item_id, price)
            }
            GameEffect::SurpriseRevealed { effect } => format!("Surprise: {}", effect.describe()),
            GameEffect::QuestsRefreshed { added, .. } => format!("{} new quest(s)", added.len()),
            GameEffect::ChallengesRefreshed { .. } => "New daily challenges!".to_string(),
            GameEffect::TaskShared { .. } => "Task copied to clipboard".to_string(),
        }
    }
}
