//! Persistence codec over a string key-value store (browser localStorage)

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GameError, Result};
use crate::models::{DailyChallenge, GameState};
use crate::progression::normalize_stats;

pub const GAME_STATE_KEY: &str = "truthordare_game_state";
pub const COMPLETED_TASKS_KEY: &str = "truthordare_completed_tasks";
pub const DAILY_CHALLENGES_KEY: &str = "truthordare_daily_challenges";
pub const DAILY_CHALLENGES_DATE_KEY: &str = "truthordare_daily_challenges_date";

/// Minimal key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and non-browser hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Everything the game keeps between visits
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistedSession {
    pub game: GameState,
    pub completed_tasks: Vec<String>,
    pub challenges: Vec<DailyChallenge>,
    pub challenges_date: Option<String>,
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| GameError::MalformedPersistedState {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| GameError::Storage(format!("{}: {}", key, e)))
}

/// Read and decode `key`. A corrupt entry is removed and reported as `None`.
fn load_entry<S: Storage + ?Sized, T: DeserializeOwned>(storage: &mut S, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match decode(key, &raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Discarding stored value: {}", e);
            storage.remove(key);
            None
        }
    }
}

impl PersistedSession {
    /// Load all entries, falling back to defaults for anything missing or corrupt
    pub fn load<S: Storage + ?Sized>(storage: &mut S) -> Self {
        let mut game: GameState = load_entry(storage, GAME_STATE_KEY).unwrap_or_default();
        game.player_stats = normalize_stats(&game.player_stats);

        let completed_tasks = load_entry(storage, COMPLETED_TASKS_KEY).unwrap_or_default();

        let challenges: Option<Vec<DailyChallenge>> = load_entry(storage, DAILY_CHALLENGES_KEY);
        // A date without its challenge blob would suppress regeneration
        let challenges_date = match challenges {
            Some(_) => storage.get(DAILY_CHALLENGES_DATE_KEY),
            None => None,
        };

        Self {
            game,
            completed_tasks,
            challenges: challenges.unwrap_or_default(),
            challenges_date,
        }
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<()> {
        storage.set(GAME_STATE_KEY, &encode(GAME_STATE_KEY, &self.game)?)?;
        storage.set(COMPLETED_TASKS_KEY, &encode(COMPLETED_TASKS_KEY, &self.completed_tasks)?)?;
        storage.set(DAILY_CHALLENGES_KEY, &encode(DAILY_CHALLENGES_KEY, &self.challenges)?)?;
        match &self.challenges_date {
            Some(date) => storage.set(DAILY_CHALLENGES_DATE_KEY, date)?,
            None => storage.remove(DAILY_CHALLENGES_DATE_KEY),
        }
        Ok(())
    }

    pub fn clear<S: Storage + ?Sized>(storage: &mut S) {
        for key in [GAME_STATE_KEY, COMPLETED_TASKS_KEY, DAILY_CHALLENGES_KEY, DAILY_CHALLENGES_DATE_KEY] {
            storage.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, PlayerStats};

    #[test]
    fn test_empty_storage_gives_defaults() {
        let mut storage = MemoryStorage::new();
        let session = PersistedSession::load(&mut storage);
        assert_eq!(session, PersistedSession::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut session = PersistedSession::default();
        session.game.difficulty = Difficulty::Hard;
        session.game.selected_category = "party".to_string();
        session.game.player_stats = PlayerStats { points: 80, skip_tokens: 3, ..PlayerStats::default() }.with_xp(650);
        session.game.player_stats.badges.insert("first_task".to_string());
        session.completed_tasks = vec!["TRUTH-a-1".to_string()];
        session.challenges_date = Some("2024-03-01".to_string());

        session.save(&mut storage).unwrap();
        let loaded = PersistedSession::load(&mut storage);
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_corrupt_game_state_falls_back_and_is_removed() {
        let mut storage = MemoryStorage::new();
        storage.set(GAME_STATE_KEY, "{not json").unwrap();
        storage.set(COMPLETED_TASKS_KEY, r#"["a","b"]"#).unwrap();

        let loaded = PersistedSession::load(&mut storage);
        assert_eq!(loaded.game, GameState::default());
        assert_eq!(loaded.completed_tasks, vec!["a", "b"]);
        assert!(storage.get(GAME_STATE_KEY).is_none());
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = decode::<GameState>(GAME_STATE_KEY, r#"{"playerStats": "lots"}"#).unwrap_err();
        assert!(matches!(err, GameError::MalformedPersistedState { key, .. } if key == GAME_STATE_KEY));
    }

    #[test]
    fn test_stored_level_is_rederived() {
        let mut storage = MemoryStorage::new();
        storage
            .set(GAME_STATE_KEY, r#"{"difficulty":"medium","playerStats":{"xp":900,"level":42}}"#)
            .unwrap();
        let loaded = PersistedSession::load(&mut storage);
        assert_eq!(loaded.game.player_stats.level, 4);
        assert_eq!(loaded.game.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_bad_level_keeps_saved_progress() {
        let mut storage = MemoryStorage::new();
        storage
            .set(GAME_STATE_KEY, r#"{"difficulty":"hard","playerStats":{"points":500,"xp":900,"level":-1}}"#)
            .unwrap();
        let loaded = PersistedSession::load(&mut storage);
        assert_eq!(loaded.game.player_stats.points, 500);
        assert_eq!(loaded.game.player_stats.xp, 900);
        assert_eq!(loaded.game.player_stats.level, 4);
        assert_eq!(loaded.game.difficulty, Difficulty::Hard);
        assert!(storage.get(GAME_STATE_KEY).is_some());
    }

    #[test]
    fn test_null_counter_keeps_saved_progress() {
        let mut storage = MemoryStorage::new();
        storage
            .set(GAME_STATE_KEY, r#"{"playerStats":{"points":500,"xp":900,"penalties":null}}"#)
            .unwrap();
        let loaded = PersistedSession::load(&mut storage);
        assert_eq!(loaded.game.player_stats.points, 500);
        assert_eq!(loaded.game.player_stats.penalties, 0);
    }

    #[test]
    fn test_negative_quest_progress_keeps_saved_progress() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                GAME_STATE_KEY,
                r#"{"playerStats":{"points":70},"availableQuests":[{"id":"q1","type":"WEEKLY_PERSONAL",
                    "key":"hard_tasks","title":"Hardcore","description":"d","targetValue":-4,
                    "currentProgress":-1,"startDate":"2024-03-01T00:00:00Z","endDate":"2024-03-08T00:00:00Z"}]}"#,
            )
            .unwrap();
        let loaded = PersistedSession::load(&mut storage);
        assert_eq!(loaded.game.player_stats.points, 70);
        let quest = &loaded.game.available_quests[0];
        assert_eq!(quest.current_progress, 0);
        assert_eq!(quest.target_value, 0);
    }

    #[test]
    fn test_large_points_round_trip_through_storage() {
        let mut storage = MemoryStorage::new();
        let mut session = PersistedSession::default();
        session.game.player_stats.points = 9_007_199_254_740_993;
        session.save(&mut storage).unwrap();
        assert_eq!(PersistedSession::load(&mut storage).game.player_stats.points, 9_007_199_254_740_993);
    }

    #[test]
    fn test_date_without_challenges_is_ignored() {
        let mut storage = MemoryStorage::new();
        storage.set(DAILY_CHALLENGES_DATE_KEY, "2024-03-01").unwrap();
        let loaded = PersistedSession::load(&mut storage);
        assert!(loaded.challenges_date.is_none());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut storage = MemoryStorage::new();
        let session = PersistedSession {
            challenges_date: Some("2024-03-01".to_string()),
            ..PersistedSession::default()
        };
        session.save(&mut storage).unwrap();
        assert_eq!(storage.len(), 4);
        PersistedSession::clear(&mut storage);
        assert!(storage.is_empty());
    }
}
