//! Session controller
//!
//! Owns the game state, daily challenges, resolved-task ids, history, the
//! pending task and both timers. Every action validates first and then swaps
//! in whole new values, so a failed action leaves the session untouched.
//!
//! Timers are cooperative: the host calls [`GameSession::poll`] from its event
//! loop. Starting a new selection bumps a generation counter; any reveal that
//! belongs to an older generation is dropped.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::categories::{find_category, Category};
use crate::challenges::{format_date, generate_daily_set, needs_regeneration};
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::messages::GameEffect;
use crate::models::{
    DailyChallenge, Difficulty, GameState, HistoryEntry, ItemGrant, PendingTask, PlayerStats, QuestReward,
    QuestType,
};
use crate::progression::{resolve_task, ResolutionPath, TaskOutcome};
use crate::quests::{refresh_quests, PERSONAL_QUEST_TYPES};
use crate::ranks::rank_for_xp;
use crate::selector::{select_task, SelectionMode};
use crate::shop::{self, extend_boost};
use crate::storage::{PersistedSession, Storage};
use crate::achievements;

/// Handle for one selection request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledReveal {
    ticket: SelectionTicket,
    mode: SelectionMode,
    due: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Countdown {
    task_id: String,
    deadline: DateTime<Utc>,
}

/// Result of claiming a quest or challenge reward
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    Granted { points: u64, xp: u64 },
    /// Already claimed earlier; nothing changed
    AlreadyClaimed,
}

pub struct GameSession<C: Clock, R: Rng> {
    config: GameConfig,
    categories: Vec<Category>,
    clock: C,
    rng: R,
    state: GameState,
    challenges: Vec<DailyChallenge>,
    challenges_date: Option<String>,
    completed_tasks: BTreeSet<String>,
    history: Vec<HistoryEntry>,
    pending: Option<PendingTask>,
    generation: u64,
    scheduled: Option<ScheduledReveal>,
    countdown: Option<Countdown>,
}

impl<C: Clock, R: Rng> GameSession<C, R> {
    /// Fresh session with default stats
    pub fn new(config: GameConfig, categories: Vec<Category>, clock: C, rng: R) -> Self {
        let state = Self::initial_state(&config, &categories);
        let mut session = Self::from_parts(config, categories, clock, rng, PersistedSession {
            game: state,
            ..PersistedSession::default()
        });
        session.refresh();
        session
    }

    /// Session restored from `storage`; corrupt entries fall back to defaults
    pub fn restore<S: Storage + ?Sized>(
        config: GameConfig,
        categories: Vec<Category>,
        clock: C,
        rng: R,
        storage: &mut S,
    ) -> Self {
        let had_state = storage.get(crate::storage::GAME_STATE_KEY).is_some();
        let mut persisted = PersistedSession::load(storage);
        if !had_state || persisted.game == GameState::default() {
            persisted.game = Self::initial_state(&config, &categories);
        }
        if find_category(&categories, &persisted.game.selected_category).is_err() {
            persisted.game.selected_category = Self::default_category(&config, &categories);
        }
        let mut session = Self::from_parts(config, categories, clock, rng, persisted);
        session.refresh();
        tracing::info!(
            "Session restored: level {}, {} points, {} resolved tasks",
            session.state.player_stats.level,
            session.state.player_stats.points,
            session.completed_tasks.len()
        );
        session
    }

    fn from_parts(config: GameConfig, categories: Vec<Category>, clock: C, rng: R, persisted: PersistedSession) -> Self {
        Self {
            config,
            categories,
            clock,
            rng,
            state: persisted.game,
            challenges: persisted.challenges,
            challenges_date: persisted.challenges_date,
            completed_tasks: persisted.completed_tasks.into_iter().collect(),
            history: Vec::new(),
            pending: None,
            generation: 0,
            scheduled: None,
            countdown: None,
        }
    }

    fn default_category(config: &GameConfig, categories: &[Category]) -> String {
        if find_category(categories, &config.game.default_category).is_ok() {
            config.game.default_category.clone()
        } else {
            categories.first().map(|c| c.id.clone()).unwrap_or_default()
        }
    }

    fn initial_state(config: &GameConfig, categories: &[Category]) -> GameState {
        GameState {
            difficulty: config.game.default_difficulty,
            player_stats: PlayerStats {
                skip_tokens: config.game.starting_skip_tokens,
                ..PlayerStats::default()
            },
            selected_category: Self::default_category(config, categories),
            ..GameState::default()
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.state.player_stats
    }

    pub fn challenges(&self) -> &[DailyChallenge] {
        &self.challenges
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn pending_task(&self) -> Option<&PendingTask> {
        self.pending.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn is_deliberating(&self) -> bool {
        self.scheduled.is_some()
    }

    pub fn is_resolved(&self, task_id: &str) -> bool {
        self.completed_tasks.contains(task_id)
    }

    /// Seconds left on the running dare countdown
    pub fn countdown_remaining(&self) -> Option<i64> {
        self.countdown
            .as_ref()
            .map(|c| (c.deadline - self.clock.now()).num_seconds().max(0))
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn snapshot(&self) -> PersistedSession {
        PersistedSession {
            game: self.state.clone(),
            completed_tasks: self.completed_tasks.iter().cloned().collect(),
            challenges: self.challenges.clone(),
            challenges_date: self.challenges_date.clone(),
        }
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<()> {
        self.snapshot().save(storage)
    }

    // ========================================================================
    // Quests and challenges upkeep
    // ========================================================================

    /// Replace expired quests, backfill missing types, and roll daily
    /// challenges over when the calendar day changed
    pub fn refresh(&mut self) -> Vec<GameEffect> {
        let now = self.clock.now();
        let mut effects = Vec::new();

        let personal = refresh_quests(&self.state.available_quests, &PERSONAL_QUEST_TYPES, now, &mut self.rng);
        let community = refresh_quests(&self.state.community_quests, &[QuestType::CommunityGoal], now, &mut self.rng);

        if personal.changed() || community.changed() {
            let mut added = personal.added.clone();
            added.extend(community.added.iter().cloned());
            let mut removed = personal.removed.clone();
            removed.extend(community.removed.iter().cloned());
            tracing::info!("Quests refreshed: {} added, {} removed", added.len(), removed.len());

            let mut next = self.state.clone();
            next.available_quests = personal.quests;
            next.community_quests = community.quests;
            next.player_stats.active_quests = next.all_quests().map(|q| q.id.clone()).collect();
            self.state = next;
            effects.push(GameEffect::QuestsRefreshed { added, removed });
        }

        let today = self.clock.today();
        if needs_regeneration(self.challenges_date.as_deref(), today) {
            let date = format_date(today);
            tracing::info!("Generating daily challenges for {}", date);
            self.challenges = generate_daily_set(today, &mut self.rng);
            self.challenges_date = Some(date.clone());
            effects.push(GameEffect::ChallengesRefreshed { date });
        }

        effects
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state = GameState { difficulty, ..self.state.clone() };
    }

    pub fn select_category(&mut self, category_id: &str) -> Result<()> {
        find_category(&self.categories, category_id)?;
        self.state = GameState {
            selected_category: category_id.to_string(),
            ..self.state.clone()
        };
        Ok(())
    }

    // ========================================================================
    // Task lifecycle
    // ========================================================================

    /// Start a selection. Cancels the countdown and any earlier selection.
    pub fn begin_selection(&mut self, mode: SelectionMode) -> SelectionTicket {
        self.generation += 1;
        let ticket = SelectionTicket { generation: self.generation };
        let delay = i64::try_from(self.config.timers.deliberation_ms)
            .ok()
            .and_then(Duration::try_milliseconds);
        let due = later(self.clock.now(), delay);
        self.countdown = None;
        self.pending = None;
        self.scheduled = Some(ScheduledReveal { ticket, mode, due });
        tracing::debug!("Selection {} scheduled ({:?})", ticket.generation, mode);
        ticket
    }

    /// Reveal the task for `ticket` now. Superseded tickets yield `Ok(None)`.
    pub fn reveal(&mut self, ticket: SelectionTicket) -> Result<Option<&PendingTask>> {
        let scheduled = match self.scheduled {
            Some(s) if s.ticket == ticket => s,
            _ => {
                tracing::debug!("Ignoring stale selection {}", ticket.generation);
                return Ok(None);
            }
        };
        self.scheduled = None;

        let now = self.clock.now();
        let category = find_category(&self.categories, &self.state.selected_category)?;
        let task = select_task(category, scheduled.mode, self.state.difficulty, &self.config, now, &mut self.rng)?;

        self.countdown = task.timer_seconds.map(|secs| Countdown {
            task_id: task.id.clone(),
            deadline: later(now, Duration::try_seconds(secs as i64)),
        });
        tracing::debug!("Revealed {} task {}", task.kind, task.id);
        self.pending = Some(task);
        Ok(self.pending.as_ref())
    }

    /// Drive timers. Fires a due reveal and expires an elapsed countdown.
    pub fn poll(&mut self) -> Vec<GameEffect> {
        let now = self.clock.now();
        let mut effects = Vec::new();

        if let Some(scheduled) = self.scheduled.filter(|s| now >= s.due) {
            match self.reveal(scheduled.ticket) {
                Ok(Some(task)) => effects.push(GameEffect::TaskRevealed {
                    task_id: task.id.clone(),
                    kind: task.kind,
                    is_photo: task.is_photo,
                }),
                Ok(None) => {}
                Err(GameError::EmptyPool { category, kind }) => {
                    effects.push(GameEffect::EmptyPool { category, kind });
                }
                Err(e) => tracing::warn!("Selection failed: {}", e),
            }
        }

        let expired = self
            .countdown
            .as_ref()
            .filter(|c| now >= c.deadline)
            .map(|c| c.task_id.clone());
        if let Some(task_id) = expired {
            tracing::info!("Countdown expired for {}", task_id);
            effects.push(GameEffect::TimeUp { task_id: task_id.clone() });
            match self.finish(&task_id, false, true) {
                Ok(more) => effects.extend(more),
                Err(e) => tracing::warn!("Timeout resolution failed: {}", e),
            }
        }

        effects.extend(self.refresh());
        effects
    }

    /// Resolve the presented task as completed or skipped
    pub fn resolve(&mut self, task_id: &str, completed: bool) -> Result<Vec<GameEffect>> {
        self.finish(task_id, completed, false)
    }

    /// Skip the presented task (uses a skip token if one is available)
    pub fn skip(&mut self) -> Result<Vec<GameEffect>> {
        let task_id = self.pending.as_ref().map(|t| t.id.clone()).ok_or(GameError::NoPendingTask)?;
        self.finish(&task_id, false, false)
    }

    fn finish(&mut self, task_id: &str, completed: bool, timed_out: bool) -> Result<Vec<GameEffect>> {
        if self.completed_tasks.contains(task_id) {
            return Err(GameError::DuplicateResolution(task_id.to_string()));
        }
        let task = self.pending.as_ref().ok_or(GameError::NoPendingTask)?;
        if task.id != task_id {
            return Err(GameError::TaskMismatch(task_id.to_string()));
        }

        let outcome = TaskOutcome {
            completed,
            kind: task.kind,
            is_photo: task.is_photo,
            // Rewards follow the difficulty in force at resolution time
            difficulty: self.state.difficulty,
            category: task.category.clone(),
            timed_out,
        };
        let now = self.clock.now();
        let progression = resolve_task(&self.state, &self.challenges, &outcome, now);

        let entry = HistoryEntry {
            task_id: task.id.clone(),
            kind: task.kind,
            text: task.text.clone(),
            category: task.category.clone(),
            completed,
            used_skip_token: progression.path == ResolutionPath::SkipToken,
            timed_out,
            points_gained: progression.points_gained,
            xp_gained: progression.xp.total,
            total_xp: progression.state.player_stats.xp,
            resolved_at: now,
        };

        self.state = progression.state;
        self.challenges = progression.challenges;
        self.completed_tasks.insert(task_id.to_string());
        self.history.push(entry);
        let limit = self.config.game.history_limit.max(1);
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
        self.pending = None;
        self.countdown = None;

        Ok(progression.effects)
    }

    /// Record that the current (or last) task was shared
    pub fn record_share(&mut self) -> Vec<GameEffect> {
        let task_id = self
            .pending
            .as_ref()
            .map(|t| t.id.clone())
            .or_else(|| self.history.last().map(|h| h.task_id.clone()))
            .unwrap_or_default();

        let mut stats = self.state.player_stats.clone();
        stats.shared_tasks = stats.shared_tasks.saturating_add(1);
        let mut effects = vec![GameEffect::TaskShared { task_id }];
        effects.extend(achievements::award_new(&mut stats));
        self.state = GameState { player_stats: stats, ..self.state.clone() };
        effects
    }

    // ========================================================================
    // Shop and rewards
    // ========================================================================

    pub fn purchase(&mut self, item_id: &str) -> Result<Vec<GameEffect>> {
        let now = self.clock.now();
        let purchase = shop::purchase(&self.state.player_stats, item_id, now, &mut self.rng)?;
        self.state = GameState { player_stats: purchase.stats, ..self.state.clone() };
        Ok(purchase.effects)
    }

    pub fn claim_quest(&mut self, quest_id: &str) -> Result<(ClaimOutcome, Vec<GameEffect>)> {
        let now = self.clock.now();
        let mut next = self.state.clone();
        let quest = next
            .available_quests
            .iter_mut()
            .chain(next.community_quests.iter_mut())
            .find(|q| q.id == quest_id)
            .ok_or_else(|| GameError::UnknownQuest(quest_id.to_string()))?;

        if !quest.is_completed {
            return Err(GameError::QuestNotCompleted(quest_id.to_string()));
        }
        if quest.reward.claimed {
            return Ok((ClaimOutcome::AlreadyClaimed, Vec::new()));
        }
        quest.reward.claimed = true;
        let reward = quest.reward.clone();

        let (stats, outcome, effects) = grant_reward(&next.player_stats, quest_id, &reward, now);
        next.player_stats = stats;
        next.player_stats.completed_quests.insert(quest_id.to_string());
        self.state = next;
        Ok((outcome, effects))
    }

    pub fn claim_challenge(&mut self, challenge_id: &str) -> Result<(ClaimOutcome, Vec<GameEffect>)> {
        let now = self.clock.now();
        let mut challenges = self.challenges.clone();
        let challenge = challenges
            .iter_mut()
            .find(|c| c.id == challenge_id)
            .ok_or_else(|| GameError::UnknownChallenge(challenge_id.to_string()))?;

        if !challenge.is_completed {
            return Err(GameError::QuestNotCompleted(challenge_id.to_string()));
        }
        if challenge.reward.claimed {
            return Ok((ClaimOutcome::AlreadyClaimed, Vec::new()));
        }
        challenge.reward.claimed = true;
        let reward = challenge.reward.clone();

        let (stats, outcome, effects) = grant_reward(&self.state.player_stats, challenge_id, &reward, now);
        self.state = GameState { player_stats: stats, ..self.state.clone() };
        self.challenges = challenges;
        Ok((outcome, effects))
    }

    /// Wipe progress and start over with defaults
    pub fn reset(&mut self) -> Vec<GameEffect> {
        tracing::info!("Resetting game state");
        self.state = Self::initial_state(&self.config, &self.categories);
        self.challenges = Vec::new();
        self.challenges_date = None;
        self.completed_tasks.clear();
        self.history.clear();
        self.pending = None;
        self.scheduled = None;
        self.countdown = None;
        self.generation += 1;
        self.refresh()
    }
}

/// `now + delay`, saturating at the far future when the delay is out of range
fn later(now: DateTime<Utc>, delay: Option<Duration>) -> DateTime<Utc> {
    delay
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Apply a claimed reward to a copy of `stats`. Reward XP is added as-is.
fn grant_reward(
    stats: &PlayerStats,
    source_id: &str,
    reward: &QuestReward,
    now: DateTime<Utc>,
) -> (PlayerStats, ClaimOutcome, Vec<GameEffect>) {
    let points = reward.points.unwrap_or(0);
    let xp = reward.xp.unwrap_or(0);
    let old_rank = rank_for_xp(stats.xp);

    let mut next = stats.clone().with_xp(stats.xp.saturating_add(xp));
    next.points = next.points.saturating_add(points);
    if let Some(badge) = &reward.badge {
        next.badges.insert(badge.clone());
    }
    for item in &reward.items {
        match item {
            ItemGrant::SkipTokens { count } => {
                next.skip_tokens = next.skip_tokens.saturating_add(*count);
            }
        }
    }
    if let Some(boost) = reward.boost {
        extend_boost(&mut next, boost.duration_minutes, now);
    }

    let mut effects = vec![GameEffect::RewardClaimed {
        source_id: source_id.to_string(),
        points,
        xp,
    }];
    if let Some(badge) = &reward.badge {
        effects.push(GameEffect::AchievementUnlocked {
            badge: badge.clone(),
            name: achievements::badge_name(badge),
        });
    }
    if next.level > stats.level {
        effects.push(GameEffect::LevelUp { level: next.level });
    }
    let new_rank = rank_for_xp(next.xp);
    if new_rank.id != old_rank.id {
        effects.push(GameEffect::RankUp { from: old_rank.id, to: new_rank.id });
    }
    effects.extend(achievements::award_new(&mut next));
    tracing::info!("Reward claimed for {}: +{} points, +{} xp", source_id, points, xp);

    (next, ClaimOutcome::Granted { points, xp }, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::TaskKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: "classic".to_string(),
                name: "Classic".to_string(),
                truths: vec!["Tell a secret".to_string()],
                actions: vec!["Do a dance".to_string()],
            },
            Category {
                id: "empty".to_string(),
                name: "Empty".to_string(),
                truths: Vec::new(),
                actions: Vec::new(),
            },
        ]
    }

    fn config() -> GameConfig {
        let mut config = GameConfig::default();
        config.selector.photo_probability = 0.0;
        config
    }

    fn session(clock: &FixedClock) -> GameSession<&FixedClock, StdRng> {
        GameSession::new(config(), categories(), clock, StdRng::seed_from_u64(99))
    }

    fn reveal(session: &mut GameSession<&FixedClock, StdRng>, kind: TaskKind) -> PendingTask {
        let ticket = session.begin_selection(SelectionMode::Manual(kind));
        session.reveal(ticket).unwrap().cloned().unwrap()
    }

    #[test]
    fn test_new_session_has_quests_and_challenges() {
        let clock = FixedClock::new(start());
        let s = session(&clock);
        assert_eq!(s.state().available_quests.len(), 3);
        assert_eq!(s.state().community_quests.len(), 1);
        assert_eq!(s.stats().active_quests.len(), 4);
        assert_eq!(s.challenges().len(), 4);
        assert_eq!(s.stats().skip_tokens, 1);
        assert_eq!(s.state().selected_category, "classic");
    }

    #[test]
    fn test_resolve_updates_state_and_history() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        s.set_difficulty(Difficulty::Medium);
        let task = reveal(&mut s, TaskKind::Truth);
        s.resolve(&task.id, true).unwrap();
        assert_eq!(s.stats().points, 25);
        assert_eq!(s.stats().xp, 40);
        assert_eq!(s.history().len(), 1);
        assert!(s.pending_task().is_none());
        assert!(s.is_resolved(&task.id));
    }

    #[test]
    fn test_duplicate_resolution_rejected() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let task = reveal(&mut s, TaskKind::Truth);
        s.resolve(&task.id, true).unwrap();
        let before = s.state().clone();
        assert_eq!(
            s.resolve(&task.id, true).unwrap_err(),
            GameError::DuplicateResolution(task.id.clone())
        );
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn test_empty_pool_sets_nothing() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        s.select_category("empty").unwrap();
        let before = s.state().clone();
        let ticket = s.begin_selection(SelectionMode::Random);
        assert!(matches!(s.reveal(ticket), Err(GameError::EmptyPool { .. })));
        assert!(s.pending_task().is_none());
        assert!(s.history().is_empty());
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let old = s.begin_selection(SelectionMode::Manual(TaskKind::Truth));
        let new = s.begin_selection(SelectionMode::Manual(TaskKind::Dare));
        assert!(s.reveal(old).unwrap().is_none());
        let task = s.reveal(new).unwrap().cloned().unwrap();
        assert_eq!(task.kind, TaskKind::Dare);
    }

    #[test]
    fn test_unbounded_deliberation_never_reveals() {
        let clock = FixedClock::new(start());
        let mut config = config();
        config.timers.deliberation_ms = u64::MAX;
        let mut s = GameSession::new(config, categories(), &clock, StdRng::seed_from_u64(5));
        s.begin_selection(SelectionMode::Random);
        clock.advance(Duration::days(365));
        assert!(s.poll().iter().all(|e| !matches!(e, GameEffect::TaskRevealed { .. })));
        assert!(s.is_deliberating());
    }

    #[test]
    fn test_rewards_use_difficulty_at_resolution() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        s.set_difficulty(Difficulty::Easy);
        let task = reveal(&mut s, TaskKind::Truth);
        s.set_difficulty(Difficulty::Hard);
        let points_before = s.stats().points;
        s.resolve(&task.id, true).unwrap();
        assert_eq!(s.stats().points - points_before, 50);
        assert_eq!(s.stats().hard_tasks_completed, 1);
    }

    #[test]
    fn test_poll_reveals_after_deliberation() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        s.begin_selection(SelectionMode::Manual(TaskKind::Truth));
        assert!(s.poll().iter().all(|e| !matches!(e, GameEffect::TaskRevealed { .. })));
        assert!(s.is_deliberating());

        clock.advance(Duration::milliseconds(1_500));
        let effects = s.poll();
        assert!(effects.iter().any(|e| matches!(e, GameEffect::TaskRevealed { .. })));
        assert!(s.pending_task().is_some());
        assert!(!s.is_deliberating());
    }

    #[test]
    fn test_countdown_timeout_penalises() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let task = reveal(&mut s, TaskKind::Dare);
        assert_eq!(s.countdown_remaining(), Some(60));

        clock.advance(Duration::seconds(61));
        let effects = s.poll();
        assert!(effects.contains(&GameEffect::TimeUp { task_id: task.id.clone() }));
        assert_eq!(s.stats().penalties, 1);
        assert_eq!(s.stats().skip_tokens, 1);
        assert!(s.pending_task().is_none());
        assert!(s.countdown_remaining().is_none());
    }

    #[test]
    fn test_new_selection_cancels_countdown() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        reveal(&mut s, TaskKind::Dare);
        s.begin_selection(SelectionMode::Manual(TaskKind::Truth));
        clock.advance(Duration::seconds(120));
        let effects = s.poll();
        assert!(!effects.iter().any(|e| matches!(e, GameEffect::TimeUp { .. })));
        assert_eq!(s.stats().penalties, 0);
    }

    #[test]
    fn test_skip_uses_token_then_breaks_streak() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let task = reveal(&mut s, TaskKind::Truth);
        s.resolve(&task.id, true).unwrap();
        assert_eq!(s.stats().current_streak, 1);

        clock.advance(Duration::seconds(1));
        reveal(&mut s, TaskKind::Truth);
        s.skip().unwrap();
        assert_eq!(s.stats().skip_tokens, 0);
        assert_eq!(s.stats().current_streak, 1);

        clock.advance(Duration::seconds(1));
        reveal(&mut s, TaskKind::Truth);
        s.skip().unwrap();
        assert_eq!(s.stats().current_streak, 0);
        assert_eq!(s.stats().max_streak, 1);
    }

    #[test]
    fn test_skip_without_pending_task() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        assert_eq!(s.skip().unwrap_err(), GameError::NoPendingTask);
    }

    #[test]
    fn test_purchase_with_insufficient_funds() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let before = s.state().clone();
        assert!(matches!(s.purchase("skip_token"), Err(GameError::InsufficientFunds { .. })));
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn test_claim_quest_is_idempotent() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let quest_id = s.state().available_quests[0].id.clone();

        assert_eq!(
            s.claim_quest(&quest_id).unwrap_err(),
            GameError::QuestNotCompleted(quest_id.clone())
        );

        let mut state = s.state().clone();
        let target = state.available_quests[0].target_value;
        state.available_quests[0].current_progress = target;
        state.available_quests[0].is_completed = true;
        s.state = state;
        let reward = s.state().available_quests[0].reward.clone();
        let points_before = s.stats().points;

        let (first, _) = s.claim_quest(&quest_id).unwrap();
        assert!(matches!(first, ClaimOutcome::Granted { .. }));
        let after_first = s.stats().clone();
        assert_eq!(after_first.points, points_before + reward.points.unwrap_or(0));
        assert!(after_first.completed_quests.contains(&quest_id));

        let (second, effects) = s.claim_quest(&quest_id).unwrap();
        assert_eq!(second, ClaimOutcome::AlreadyClaimed);
        assert!(effects.is_empty());
        assert_eq!(s.stats(), &after_first);
    }

    #[test]
    fn test_unknown_quest_and_challenge() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        assert!(matches!(s.claim_quest("nope"), Err(GameError::UnknownQuest(_))));
        assert!(matches!(s.claim_challenge("nope"), Err(GameError::UnknownChallenge(_))));
    }

    #[test]
    fn test_challenges_roll_over_next_day() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let first_date = s.snapshot().challenges_date.clone();
        clock.advance(Duration::hours(1));
        let effects = s.refresh();
        assert!(!effects.iter().any(|e| matches!(e, GameEffect::ChallengesRefreshed { .. })));

        clock.advance(Duration::days(1));
        let effects = s.refresh();
        assert!(effects.iter().any(|e| matches!(e, GameEffect::ChallengesRefreshed { .. })));
        assert_ne!(s.snapshot().challenges_date, first_date);
        assert!(s.challenges().iter().all(|c| c.current_progress == 0));
    }

    #[test]
    fn test_share_counts() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let effects = s.record_share();
        assert_eq!(s.stats().shared_tasks, 1);
        assert!(s.stats().badges.contains("social"));
        assert!(effects.iter().any(|e| matches!(e, GameEffect::TaskShared { .. })));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        let task = reveal(&mut s, TaskKind::Truth);
        s.resolve(&task.id, true).unwrap();
        s.reset();
        assert_eq!(s.stats().xp, 0);
        assert_eq!(s.stats().skip_tokens, 1);
        assert!(s.history().is_empty());
        assert!(!s.is_resolved(&task.id));
        assert_eq!(s.challenges().len(), 4);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let clock = FixedClock::new(start());
        let mut s = session(&clock);
        assert_eq!(
            s.select_category("missing").unwrap_err(),
            GameError::UnknownCategory("missing".to_string())
        );
        assert_eq!(s.state().selected_category, "classic");
    }
}
