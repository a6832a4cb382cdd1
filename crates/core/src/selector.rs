//! Task selection: weighted prompt type, uniform task pick, photo overlay

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::categories::Category;
use crate::config::{GameConfig, SelectorConfig};
use crate::error::{GameError, Result};
use crate::models::{Difficulty, PendingTask, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Biased coin: TRUTH with `truth_probability`
    Random,
    /// Player picked the kind; no bias
    Manual(TaskKind),
}

pub fn choose_kind<R: Rng + ?Sized>(mode: SelectionMode, config: &SelectorConfig, rng: &mut R) -> TaskKind {
    match mode {
        SelectionMode::Manual(kind) => kind,
        SelectionMode::Random => {
            if rng.gen_bool(config.truth_probability.clamp(0.0, 1.0)) {
                TaskKind::Truth
            } else {
                TaskKind::Dare
            }
        }
    }
}

/// Id used to reject double resolution of the same presented task
pub fn task_id(kind: TaskKind, text: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}-{}", kind, text, at.timestamp_millis())
}

/// Pick a task from `category`. Fails with `EmptyPool` when there is nothing
/// to pick; nothing is produced in that case.
pub fn select_task<R: Rng + ?Sized>(
    category: &Category,
    mode: SelectionMode,
    difficulty: Difficulty,
    config: &GameConfig,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<PendingTask> {
    let kind = choose_kind(mode, &config.selector, rng);
    let pool = category.pool(kind);
    if pool.is_empty() {
        tracing::warn!("Empty {} pool in category {}", kind, category.id);
        return Err(GameError::EmptyPool {
            category: category.id.clone(),
            kind,
        });
    }

    let base_text = &pool[rng.gen_range(0..pool.len())];
    let is_photo = kind == TaskKind::Dare && rng.gen_bool(config.selector.photo_probability.clamp(0.0, 1.0));
    let text = if is_photo {
        format!("{}{}", config.selector.photo_prefix, base_text)
    } else {
        base_text.clone()
    };
    let timer_seconds = (kind == TaskKind::Dare && !is_photo && config.timers.dare_seconds > 0)
        .then_some(config.timers.dare_seconds);

    Ok(PendingTask {
        id: task_id(kind, &text, now),
        kind,
        text,
        category: category.id.clone(),
        is_photo,
        difficulty,
        presented_at: now,
        timer_seconds,
    })
}
