//! Quest templates, generation, expiry and progress rules

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::models::{BoostReward, Difficulty, ItemGrant, Quest, QuestKey, QuestReward, QuestType, TaskKind};

/// A quest blueprint. The tier arrays are parallel: index `i` of each belongs together.
#[derive(Debug, Clone, Copy)]
pub struct QuestTemplate {
    pub quest_type: QuestType,
    pub key: QuestKey,
    pub title: &'static str,
    /// `{target}` is replaced with the tier's target value
    pub description: &'static str,
    pub targets: &'static [u32],
    pub reward_points: &'static [u64],
    pub reward_xp: &'static [u64],
    /// Skip tokens granted per tier (0 = none)
    pub reward_skip_tokens: &'static [u32],
    /// Boost minutes granted per tier (0 = none)
    pub reward_boost_minutes: &'static [u32],
    pub badge: Option<&'static str>,
}

impl QuestTemplate {
    pub fn tiers(&self) -> usize {
        self.targets.len()
    }
}

pub const QUEST_TEMPLATES: &[QuestTemplate] = &[
    QuestTemplate {
        quest_type: QuestType::DailyPersonal,
        key: QuestKey::TruthMilestone,
        title: "Truth Seeker",
        description: "Answer {target} truths today",
        targets: &[3, 5, 8],
        reward_points: &[30, 50, 80],
        reward_xp: &[50, 90, 150],
        reward_skip_tokens: &[0, 0, 1],
        reward_boost_minutes: &[0, 0, 0],
        badge: None,
    },
    QuestTemplate {
        quest_type: QuestType::DailyPersonal,
        key: QuestKey::DareMilestone,
        title: "Daring Spirit",
        description: "Complete {target} dares today",
        targets: &[2, 4, 6],
        reward_points: &[40, 70, 110],
        reward_xp: &[60, 110, 180],
        reward_skip_tokens: &[0, 0, 1],
        reward_boost_minutes: &[0, 0, 0],
        badge: None,
    },
    QuestTemplate {
        quest_type: QuestType::WeeklyPersonal,
        key: QuestKey::StreakLength,
        title: "Unbreakable",
        description: "Reach a streak of {target} tasks",
        targets: &[5, 10, 15],
        reward_points: &[100, 200, 350],
        reward_xp: &[150, 300, 500],
        reward_skip_tokens: &[0, 0, 0],
        reward_boost_minutes: &[10, 15, 30],
        badge: None,
    },
    QuestTemplate {
        quest_type: QuestType::WeeklyPersonal,
        key: QuestKey::HardTasks,
        title: "Hardcore",
        description: "Complete {target} hard tasks this week",
        targets: &[3, 6, 10],
        reward_points: &[120, 220, 400],
        reward_xp: &[200, 350, 600],
        reward_skip_tokens: &[1, 1, 2],
        reward_boost_minutes: &[0, 0, 0],
        badge: None,
    },
    QuestTemplate {
        quest_type: QuestType::EventThemed,
        key: QuestKey::PhotoTasks,
        title: "Snapshot Fever",
        description: "Complete {target} photo dares during the event",
        targets: &[1, 3, 5],
        reward_points: &[50, 120, 200],
        reward_xp: &[80, 180, 300],
        reward_skip_tokens: &[0, 1, 1],
        reward_boost_minutes: &[0, 0, 15],
        badge: Some("shutterbug"),
    },
    QuestTemplate {
        quest_type: QuestType::CommunityGoal,
        key: QuestKey::CommunityGoal,
        title: "Party Together",
        description: "Complete {target} tasks as a group this week",
        targets: &[50, 100, 200],
        reward_points: &[150, 300, 600],
        reward_xp: &[200, 400, 800],
        reward_skip_tokens: &[1, 2, 3],
        reward_boost_minutes: &[0, 0, 0],
        badge: Some("community_hero"),
    },
];

/// Quest types kept in `availableQuests`, one live quest each
pub const PERSONAL_QUEST_TYPES: [QuestType; 3] = [
    QuestType::DailyPersonal,
    QuestType::WeeklyPersonal,
    QuestType::EventThemed,
];

pub fn lifetime(quest_type: QuestType) -> Duration {
    match quest_type {
        QuestType::DailyPersonal => Duration::hours(24),
        QuestType::WeeklyPersonal | QuestType::CommunityGoal => Duration::days(7),
        QuestType::EventThemed => Duration::days(3),
    }
}

pub fn templates_for(quest_type: QuestType) -> impl Iterator<Item = &'static QuestTemplate> {
    QUEST_TEMPLATES.iter().filter(move |t| t.quest_type == quest_type)
}

fn tier_value<T: Copy + Default>(values: &[T], tier: usize) -> T {
    values.get(tier).copied().unwrap_or_default()
}

/// Build the reward for a tier; absent entries become zero/none
pub fn reward_for_tier(template: &QuestTemplate, tier: usize) -> QuestReward {
    let points = tier_value(template.reward_points, tier);
    let xp = tier_value(template.reward_xp, tier);
    let skip_tokens = tier_value(template.reward_skip_tokens, tier);
    let boost_minutes = tier_value(template.reward_boost_minutes, tier);

    QuestReward {
        points: (points > 0).then_some(points),
        xp: (xp > 0).then_some(xp),
        badge: template.badge.map(str::to_string),
        items: if skip_tokens > 0 {
            vec![ItemGrant::SkipTokens { count: skip_tokens }]
        } else {
            Vec::new()
        },
        boost: (boost_minutes > 0).then_some(BoostReward { duration_minutes: boost_minutes }),
        claimed: false,
    }
}

/// Unique id: type, creation millis and a random suffix
pub fn generate_id<R: Rng + ?Sized>(prefix: &str, now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..6).map(|_| rng.sample(Alphanumeric) as char).collect();
    format!("{}_{}_{}", prefix, now.timestamp_millis(), suffix.to_lowercase())
}

/// Instantiate a template at a uniformly random tier
pub fn generate_quest<R: Rng + ?Sized>(template: &QuestTemplate, now: DateTime<Utc>, rng: &mut R) -> Quest {
    let tier = if template.tiers() > 1 { rng.gen_range(0..template.tiers()) } else { 0 };
    let target_value = tier_value(template.targets, tier).max(1);

    Quest {
        id: generate_id(template.quest_type.slug(), now, rng),
        quest_type: template.quest_type,
        key: template.key,
        title: template.title.to_string(),
        description: template.description.replace("{target}", &target_value.to_string()),
        tier,
        target_value,
        current_progress: 0,
        reward: reward_for_tier(template, tier),
        is_active: true,
        is_completed: false,
        start_date: now,
        end_date: now + lifetime(template.quest_type),
    }
}

/// Pick a random template of the given type and instantiate it
pub fn generate_for_type<R: Rng + ?Sized>(quest_type: QuestType, now: DateTime<Utc>, rng: &mut R) -> Option<Quest> {
    let candidates: Vec<&QuestTemplate> = templates_for(quest_type).collect();
    if candidates.is_empty() {
        return None;
    }
    let template = candidates[rng.gen_range(0..candidates.len())];
    Some(generate_quest(template, now, rng))
}

/// Outcome of a quest refresh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestRefresh {
    pub quests: Vec<Quest>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl QuestRefresh {
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Drop expired quests and backfill every required type that has no live quest.
/// Live quests keep their position and content.
pub fn refresh_quests<R: Rng + ?Sized>(
    current: &[Quest],
    required: &[QuestType],
    now: DateTime<Utc>,
    rng: &mut R,
) -> QuestRefresh {
    let mut refresh = QuestRefresh::default();

    for quest in current {
        if quest.is_expired(now) {
            refresh.removed.push(quest.id.clone());
        } else {
            refresh.quests.push(quest.clone());
        }
    }

    for quest_type in required {
        let has_live = refresh.quests.iter().any(|q| q.quest_type == *quest_type);
        if has_live {
            continue;
        }
        if let Some(quest) = generate_for_type(*quest_type, now, rng) {
            refresh.added.push(quest.id.clone());
            refresh.quests.push(quest);
        }
    }

    refresh
}

/// What the progression engine tells quests about a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestSignal {
    pub completed: bool,
    pub kind: TaskKind,
    pub difficulty: Difficulty,
    pub is_photo: bool,
    pub new_streak: u32,
}

/// New progress for a quest under `signal`, or `None` if it does not react
pub fn next_progress(quest: &Quest, signal: &QuestSignal) -> Option<u32> {
    let bump = quest.current_progress.saturating_add(1);
    match quest.key {
        QuestKey::TruthMilestone => (signal.completed && signal.kind == TaskKind::Truth).then_some(bump),
        QuestKey::DareMilestone => (signal.completed && signal.kind == TaskKind::Dare).then_some(bump),
        QuestKey::StreakLength => Some(signal.new_streak),
        QuestKey::CommunityGoal => signal.completed.then_some(bump),
        QuestKey::HardTasks => {
            (signal.completed && signal.difficulty == Difficulty::Hard).then_some(bump)
        }
        QuestKey::PhotoTasks => (signal.completed && signal.is_photo).then_some(bump),
    }
}

/// Advance every live, incomplete quest. Returns the updated list and the ids
/// that crossed into completion during this call.
pub fn advance_quests(quests: &[Quest], signal: &QuestSignal, now: DateTime<Utc>) -> (Vec<Quest>, Vec<String>) {
    let mut completed_now = Vec::new();
    let updated = quests
        .iter()
        .map(|quest| {
            if quest.is_completed || !quest.is_active || quest.is_expired(now) {
                return quest.clone();
            }
            let mut quest = quest.clone();
            if let Some(progress) = next_progress(&quest, signal) {
                if progress != quest.current_progress {
                    quest.current_progress = progress;
                    if progress >= quest.target_value {
                        quest.is_completed = true;
                        completed_now.push(quest.id.clone());
                    }
                }
            }
            quest
        })
        .collect();
    (updated, completed_now)
}
