//! Progression engine
//!
//! Turns one task resolution into the next game state. Nothing here mutates
//! its inputs: the caller gets a complete [`Progression`] and swaps it in.
//!
//! XP for a normal completion is computed as
//! `base -> x rank bonus -> x1.5 photo -> x2 boost`, flooring after each stage.
//! A skip paid with a token grants the base rewards without any multiplier,
//! keeps the streak as it is and leaves quests alone.

use chrono::{DateTime, Utc};

use crate::achievements;
use crate::challenges::{advance_challenges, ChallengeSignal};
use crate::level::level_for_xp;
use crate::messages::GameEffect;
use crate::models::{DailyChallenge, Difficulty, GameState, PlayerStats, TaskKind};
use crate::quests::{advance_quests, QuestSignal};
use crate::ranks::rank_for_xp;
use crate::rewards::{base_points, base_xp, stack_xp, XpBreakdown};

/// How a presented task was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub completed: bool,
    pub kind: TaskKind,
    pub is_photo: bool,
    pub difficulty: Difficulty,
    pub category: String,
    /// The dare countdown ran out; counts as a failure and never uses a token
    pub timed_out: bool,
}

impl TaskOutcome {
    pub fn completed(kind: TaskKind, difficulty: Difficulty) -> Self {
        Self {
            completed: true,
            kind,
            is_photo: false,
            difficulty,
            category: String::new(),
            timed_out: false,
        }
    }

    pub fn skipped(kind: TaskKind, difficulty: Difficulty) -> Self {
        Self { completed: false, ..Self::completed(kind, difficulty) }
    }

    pub fn photo(mut self) -> Self {
        self.is_photo = true;
        self
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn timed_out(mut self) -> Self {
        self.completed = false;
        self.timed_out = true;
        self
    }
}

/// Which rule path the engine took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    Completed,
    Failed,
    SkipToken,
}

/// The full next state after one resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub state: GameState,
    pub challenges: Vec<DailyChallenge>,
    pub effects: Vec<GameEffect>,
    pub path: ResolutionPath,
    pub points_gained: u64,
    pub xp: XpBreakdown,
}

/// Compute the next state for a task resolution at `now`
pub fn resolve_task(
    state: &GameState,
    challenges: &[DailyChallenge],
    outcome: &TaskOutcome,
    now: DateTime<Utc>,
) -> Progression {
    let stats = &state.player_stats;
    if !outcome.completed && !outcome.timed_out && stats.skip_tokens > 0 {
        return resolve_with_skip_token(state, challenges, outcome, now);
    }

    let old_rank = rank_for_xp(stats.xp);
    let old_level = stats.level;

    let new_streak = if outcome.completed { stats.current_streak.saturating_add(1) } else { 0 };
    let points = if outcome.completed { base_points(outcome.difficulty) } else { 0 };
    let raw_xp = if outcome.completed { base_xp(outcome.difficulty) } else { 0 };
    let xp = stack_xp(
        raw_xp,
        old_rank,
        outcome.is_photo && outcome.completed,
        stats.is_boost_active(now),
    );

    let mut next: PlayerStats = stats.clone().with_xp(stats.xp.saturating_add(xp.total));
    next.points = next.points.saturating_add(points);
    next.current_streak = new_streak;
    next.max_streak = next.max_streak.max(new_streak);
    if outcome.completed {
        next.tasks_completed = next.tasks_completed.saturating_add(1);
        match outcome.kind {
            TaskKind::Truth => next.truths_answered = next.truths_answered.saturating_add(1),
            TaskKind::Dare => next.dares_completed = next.dares_completed.saturating_add(1),
        }
        if outcome.difficulty == Difficulty::Hard {
            next.hard_tasks_completed = next.hard_tasks_completed.saturating_add(1);
        }
        if outcome.is_photo {
            next.photo_tasks_completed = next.photo_tasks_completed.saturating_add(1);
        }
    }
    if outcome.timed_out {
        next.penalties = next.penalties.saturating_add(1);
    }

    let mut effects = Vec::new();
    if points > 0 {
        effects.push(GameEffect::PointsGained { amount: points });
    }
    if xp.total > 0 {
        effects.push(GameEffect::XpGained { amount: xp.total });
    }
    push_level_and_rank(&mut effects, old_level, next.level, stats.xp, next.xp);

    let quest_signal = QuestSignal {
        completed: outcome.completed,
        kind: outcome.kind,
        difficulty: outcome.difficulty,
        is_photo: outcome.is_photo,
        new_streak,
    };
    let (available_quests, done_personal) = advance_quests(&state.available_quests, &quest_signal, now);
    let (community_quests, done_community) = advance_quests(&state.community_quests, &quest_signal, now);
    for quest in available_quests.iter().chain(community_quests.iter()) {
        if done_personal.contains(&quest.id) || done_community.contains(&quest.id) {
            tracing::info!("Quest completed: {} ({})", quest.title, quest.id);
            effects.push(GameEffect::QuestCompleted {
                quest_id: quest.id.clone(),
                title: quest.title.clone(),
            });
        }
    }

    let challenge_signal = ChallengeSignal {
        completed: outcome.completed,
        difficulty: outcome.difficulty,
        is_photo: outcome.is_photo,
        new_streak,
        category: &outcome.category,
    };
    let (challenges, done_challenges) = advance_challenges(challenges, &challenge_signal);
    for challenge in challenges.iter().filter(|c| done_challenges.contains(&c.id)) {
        tracing::info!("Daily challenge completed: {}", challenge.id);
        effects.push(GameEffect::ChallengeCompleted {
            challenge_id: challenge.id.clone(),
            title: challenge.title.clone(),
        });
    }

    effects.extend(achievements::award_new(&mut next));

    tracing::debug!(
        "Resolved {} (completed={}, timed_out={}): +{} points, +{} xp, streak {}",
        outcome.kind,
        outcome.completed,
        outcome.timed_out,
        points,
        xp.total,
        new_streak
    );

    Progression {
        state: GameState {
            player_stats: next,
            last_task_timestamp: Some(now),
            available_quests,
            community_quests,
            ..state.clone()
        },
        challenges,
        effects,
        path: if outcome.completed { ResolutionPath::Completed } else { ResolutionPath::Failed },
        points_gained: points,
        xp,
    }
}

fn resolve_with_skip_token(
    state: &GameState,
    challenges: &[DailyChallenge],
    outcome: &TaskOutcome,
    now: DateTime<Utc>,
) -> Progression {
    let stats = &state.player_stats;
    let points = base_points(outcome.difficulty);
    let raw_xp = base_xp(outcome.difficulty);

    let mut next = stats.clone().with_xp(stats.xp.saturating_add(raw_xp));
    next.skip_tokens -= 1;
    next.points = next.points.saturating_add(points);
    next.tasks_completed = next.tasks_completed.saturating_add(1);

    let mut effects = vec![
        GameEffect::SkipTokenUsed { remaining: next.skip_tokens },
        GameEffect::PointsGained { amount: points },
        GameEffect::XpGained { amount: raw_xp },
    ];
    push_level_and_rank(&mut effects, stats.level, next.level, stats.xp, next.xp);
    effects.extend(achievements::award_new(&mut next));

    tracing::debug!("Skip token used, {} left", next.skip_tokens);

    Progression {
        state: GameState {
            player_stats: next,
            last_task_timestamp: Some(now),
            ..state.clone()
        },
        challenges: challenges.to_vec(),
        effects,
        path: ResolutionPath::SkipToken,
        points_gained: points,
        xp: XpBreakdown { base: raw_xp, after_rank: raw_xp, after_photo: raw_xp, total: raw_xp },
    }
}

fn push_level_and_rank(effects: &mut Vec<GameEffect>, old_level: u32, new_level: u32, old_xp: u64, new_xp: u64) {
    if new_level > old_level {
        effects.push(GameEffect::LevelUp { level: new_level });
    }
    let (from, to) = (rank_for_xp(old_xp), rank_for_xp(new_xp));
    if from.id != to.id {
        tracing::info!("Rank up: {:?} -> {:?}", from.id, to.id);
        effects.push(GameEffect::RankUp { from: from.id, to: to.id });
    }
}

/// Level consistency check used after loading persisted stats
pub fn normalize_stats(stats: &PlayerStats) -> PlayerStats {
    let mut next = stats.clone();
    next.level = level_for_xp(next.xp);
    next.max_streak = next.max_streak.max(next.current_streak);
    next
}
