//! Achievement badges unlocked by stat thresholds

use crate::messages::GameEffect;
use crate::models::PlayerStats;

#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: fn(&PlayerStats) -> bool,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_task",
        name: "Ice Breaker",
        description: "Complete your first task",
        unlocked: |s| s.tasks_completed >= 1,
    },
    Achievement {
        id: "tasks_10",
        name: "Warming Up",
        description: "Complete 10 tasks",
        unlocked: |s| s.tasks_completed >= 10,
    },
    Achievement {
        id: "tasks_50",
        name: "Party Veteran",
        description: "Complete 50 tasks",
        unlocked: |s| s.tasks_completed >= 50,
    },
    Achievement {
        id: "truth_teller",
        name: "Truth Teller",
        description: "Answer 25 truths",
        unlocked: |s| s.truths_answered >= 25,
    },
    Achievement {
        id: "dare_master",
        name: "Dare Master",
        description: "Complete 25 dares",
        unlocked: |s| s.dares_completed >= 25,
    },
    Achievement {
        id: "streak_5",
        name: "Hot Streak",
        description: "Reach a streak of 5",
        unlocked: |s| s.max_streak >= 5,
    },
    Achievement {
        id: "streak_10",
        name: "On Fire",
        description: "Reach a streak of 10",
        unlocked: |s| s.max_streak >= 10,
    },
    Achievement {
        id: "hardcore",
        name: "Hardcore",
        description: "Complete 10 hard tasks",
        unlocked: |s| s.hard_tasks_completed >= 10,
    },
    Achievement {
        id: "social",
        name: "Social Butterfly",
        description: "Share a task",
        unlocked: |s| s.shared_tasks >= 1,
    },
    Achievement {
        id: "photographer",
        name: "Photographer",
        description: "Complete 5 photo dares",
        unlocked: |s| s.photo_tasks_completed >= 5,
    },
    Achievement {
        id: "level_5",
        name: "Rising Star",
        description: "Reach level 5",
        unlocked: |s| s.level >= 5,
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Grant every achievement whose condition now holds and that the player
/// does not have yet. Returns the effects to show.
pub fn award_new(stats: &mut PlayerStats) -> Vec<GameEffect> {
    let mut effects = Vec::new();
    for achievement in ACHIEVEMENTS {
        if stats.badges.contains(achievement.id) || !(achievement.unlocked)(stats) {
            continue;
        }
        stats.badges.insert(achievement.id.to_string());
        tracing::info!("Achievement unlocked: {}", achievement.id);
        effects.push(GameEffect::AchievementUnlocked {
            badge: achievement.id.to_string(),
            name: achievement.name.to_string(),
        });
    }
    effects
}

/// Display name for a badge id, including quest-only badges
pub fn badge_name(id: &str) -> String {
    match find(id) {
        Some(a) => a.name.to_string(),
        None => id.replace('_', " "),
    }
}
