//! Shared data models used by the engine and the front end

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::level::level_for_xp;

/// Game difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse a difficulty name. Anything unrecognised is treated as `Easy`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        Difficulty::parse(&value)
    }
}

/// Prompt type of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskKind {
    Truth,
    Dare,
}

impl TaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Truth => "Truth",
            TaskKind::Dare => "Dare",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Truth => write!(f, "TRUTH"),
            TaskKind::Dare => write!(f, "DARE"),
        }
    }
}

/// Numeric shapes a stored counter may take. Integers are tried first so
/// values above 2^53 keep their exact value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accepts any JSON number or null. Negative, non-finite and null values become 0.
fn non_negative<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Unsigned(v)) => v,
        Some(RawCount::Signed(_)) | None => 0,
        Some(RawCount::Float(v)) if v.is_finite() && v > 0.0 => v.floor() as u64,
        Some(RawCount::Float(_)) => 0,
    })
}

fn non_negative_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    non_negative(deserializer).map(|v| v.min(u32::MAX as u64) as u32)
}

fn non_negative_usize<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    non_negative(deserializer).map(|v| usize::try_from(v).unwrap_or(usize::MAX))
}

/// Player progression statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    #[serde(deserialize_with = "non_negative")]
    pub points: u64,
    #[serde(deserialize_with = "non_negative")]
    pub xp: u64,
    /// Always derived from `xp`; see [`PlayerStats::with_xp`]
    #[serde(deserialize_with = "non_negative_u32")]
    pub level: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub current_streak: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub max_streak: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub tasks_completed: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub truths_answered: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub dares_completed: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub hard_tasks_completed: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub photo_tasks_completed: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub shared_tasks: u32,
    #[serde(deserialize_with = "non_negative_u32")]
    pub skip_tokens: u32,
    pub xp_boost_end_time: Option<DateTime<Utc>>,
    pub badges: BTreeSet<String>,
    pub completed_quests: BTreeSet<String>,
    pub active_quests: BTreeSet<String>,
    #[serde(deserialize_with = "non_negative_u32")]
    pub penalties: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            points: 0,
            xp: 0,
            level: 1,
            current_streak: 0,
            max_streak: 0,
            tasks_completed: 0,
            truths_answered: 0,
            dares_completed: 0,
            hard_tasks_completed: 0,
            photo_tasks_completed: 0,
            shared_tasks: 0,
            skip_tokens: 0,
            xp_boost_end_time: None,
            badges: BTreeSet::new(),
            completed_quests: BTreeSet::new(),
            active_quests: BTreeSet::new(),
            penalties: 0,
        }
    }
}

impl PlayerStats {
    /// Replace XP and re-derive the level from it
    pub fn with_xp(mut self, xp: u64) -> Self {
        self.xp = xp;
        self.level = level_for_xp(xp);
        self
    }

    pub fn is_boost_active(&self, now: DateTime<Utc>) -> bool {
        self.xp_boost_end_time.is_some_and(|end| now < end)
    }

    /// Remaining boost time in whole seconds, if a boost is running
    pub fn boost_seconds_left(&self, now: DateTime<Utc>) -> Option<i64> {
        self.xp_boost_end_time
            .filter(|end| now < *end)
            .map(|end| (end - now).num_seconds())
    }
}

/// Quest category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestType {
    DailyPersonal,
    WeeklyPersonal,
    CommunityGoal,
    EventThemed,
}

impl QuestType {
    pub fn slug(&self) -> &'static str {
        match self {
            QuestType::DailyPersonal => "daily",
            QuestType::WeeklyPersonal => "weekly",
            QuestType::CommunityGoal => "community",
            QuestType::EventThemed => "event",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestType::DailyPersonal => "Daily",
            QuestType::WeeklyPersonal => "Weekly",
            QuestType::CommunityGoal => "Community",
            QuestType::EventThemed => "Event",
        }
    }
}

/// Stable tag that decides how a quest reacts to task outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKey {
    TruthMilestone,
    DareMilestone,
    StreakLength,
    CommunityGoal,
    HardTasks,
    PhotoTasks,
}

/// Non-point item granted by a quest reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemGrant {
    SkipTokens { count: u32 },
}

/// Temporary XP boost granted by a reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostReward {
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestReward {
    pub points: Option<u64>,
    pub xp: Option<u64>,
    pub badge: Option<String>,
    pub items: Vec<ItemGrant>,
    pub boost: Option<BoostReward>,
    pub claimed: bool,
}

/// A goal with progress tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub key: QuestKey,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "non_negative_usize")]
    pub tier: usize,
    #[serde(deserialize_with = "non_negative_u32")]
    pub target_value: u32,
    #[serde(default, deserialize_with = "non_negative_u32")]
    pub current_progress: u32,
    #[serde(default)]
    pub reward: QuestReward,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_completed: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Quest {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_date
    }

    pub fn progress_fraction(&self) -> f32 {
        if self.target_value == 0 {
            return 1.0;
        }
        (self.current_progress.min(self.target_value) as f32 / self.target_value as f32).clamp(0.0, 1.0)
    }

    pub fn can_claim(&self) -> bool {
        self.is_completed && !self.reward.claimed
    }
}

/// Stable tag for daily challenge matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKey {
    StreakRun,
    PhotoShots,
    CategoryExplorer,
    HardHitter,
}

/// A challenge scoped to one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
    pub id: String,
    pub key: ChallengeKey,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "non_negative_usize")]
    pub tier: usize,
    #[serde(deserialize_with = "non_negative_u32")]
    pub target_value: u32,
    #[serde(default, deserialize_with = "non_negative_u32")]
    pub current_progress: u32,
    #[serde(default)]
    pub reward: QuestReward,
    #[serde(default)]
    pub is_completed: bool,
    /// Categories completed today, used by the explorer challenge
    #[serde(default)]
    pub seen_categories: BTreeSet<String>,
    pub date: NaiveDate,
}

impl DailyChallenge {
    pub fn progress_fraction(&self) -> f32 {
        if self.target_value == 0 {
            return 1.0;
        }
        (self.current_progress.min(self.target_value) as f32 / self.target_value as f32).clamp(0.0, 1.0)
    }

    pub fn can_claim(&self) -> bool {
        self.is_completed && !self.reward.claimed
    }
}

/// The persisted game state blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub difficulty: Difficulty,
    pub player_stats: PlayerStats,
    pub last_task_timestamp: Option<DateTime<Utc>>,
    pub selected_category: String,
    pub available_quests: Vec<Quest>,
    pub community_quests: Vec<Quest>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            player_stats: PlayerStats::default(),
            last_task_timestamp: None,
            selected_category: String::new(),
            available_quests: Vec::new(),
            community_quests: Vec::new(),
        }
    }
}

impl GameState {
    /// Iterate over personal and community quests together
    pub fn all_quests(&self) -> impl Iterator<Item = &Quest> {
        self.available_quests.iter().chain(self.community_quests.iter())
    }
}

/// A task presented to the player and waiting for a resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTask {
    pub id: String,
    pub kind: TaskKind,
    pub text: String,
    pub category: String,
    pub is_photo: bool,
    pub difficulty: Difficulty,
    pub presented_at: DateTime<Utc>,
    /// Countdown length for timed dares
    pub timer_seconds: Option<u32>,
}

/// One resolved task, kept for the in-session history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub task_id: String,
    pub kind: TaskKind,
    pub text: String,
    pub category: String,
    pub completed: bool,
    pub used_skip_token: bool,
    pub timed_out: bool,
    pub points_gained: u64,
    pub xp_gained: u64,
    pub total_xp: u64,
    pub resolved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_difficulty_falls_back_to_easy() {
        let d: Difficulty = serde_json::from_str("\"nightmare\"").unwrap();
        assert_eq!(d, Difficulty::Easy);
        let d: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn test_player_stats_missing_fields_use_defaults() {
        let stats: PlayerStats = serde_json::from_str(r#"{"points": 40, "xp": 250}"#).unwrap();
        assert_eq!(stats.points, 40);
        assert_eq!(stats.xp, 250);
        assert_eq!(stats.skip_tokens, 0);
        assert!(stats.badges.is_empty());
        assert!(stats.xp_boost_end_time.is_none());
    }

    #[test]
    fn test_negative_counters_clamp_to_zero() {
        let stats: PlayerStats =
            serde_json::from_str(r#"{"points": -5, "xp": -100.5, "currentStreak": 3}"#).unwrap();
        assert_eq!(stats.points, 0);
        assert_eq!(stats.xp, 0);
        assert_eq!(stats.current_streak, 3);
    }

    #[test]
    fn test_null_counters_and_bad_level_are_tolerated() {
        let stats: PlayerStats =
            serde_json::from_str(r#"{"points": 500, "xp": 900, "level": -1, "penalties": null}"#).unwrap();
        assert_eq!(stats.points, 500);
        assert_eq!(stats.xp, 900);
        assert_eq!(stats.level, 0);
        assert_eq!(stats.penalties, 0);
    }

    #[test]
    fn test_large_points_survive_exactly() {
        let stats = PlayerStats { points: 9_007_199_254_740_993, ..PlayerStats::default() };
        let json = serde_json::to_string(&stats).unwrap();
        let back: PlayerStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points, 9_007_199_254_740_993);
    }

    #[test]
    fn test_quest_progress_fields_clamp() {
        let quest: Quest = serde_json::from_str(
            r#"{"id": "q", "type": "DAILY_PERSONAL", "key": "truth_milestone", "title": "T",
                "description": "D", "tier": -2, "targetValue": 5.0, "currentProgress": -3,
                "startDate": "2024-03-01T00:00:00Z", "endDate": "2024-03-02T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(quest.tier, 0);
        assert_eq!(quest.target_value, 5);
        assert_eq!(quest.current_progress, 0);
    }

    #[test]
    fn test_player_stats_round_trip() {
        let mut stats = PlayerStats::default().with_xp(1234);
        stats.points = 77;
        stats.current_streak = 4;
        stats.max_streak = 9;
        stats.skip_tokens = 2;
        stats.badges.insert("first_task".to_string());
        stats.active_quests.insert("daily_1_abc".to_string());
        stats.xp_boost_end_time = Some(DateTime::from_timestamp(1_700_000_000, 0).unwrap());

        let json = serde_json::to_string(&stats).unwrap();
        let back: PlayerStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_with_xp_derives_level() {
        let stats = PlayerStats::default().with_xp(400);
        assert_eq!(stats.level, 3);
    }
}
