//! Error types for the game engine

use thiserror::Error;

use crate::models::TaskKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("No {kind} tasks left in category '{category}'")]
    EmptyPool { category: String, kind: TaskKind },
    
    #[error("Not enough points: costs {price}, you have {available}")]
    InsufficientFunds { price: u64, available: u64 },
    
    #[error("Task already resolved: {0}")]
    DuplicateResolution(String),
    
    #[error("Malformed persisted state under '{key}': {reason}")]
    MalformedPersistedState { key: String, reason: String },
    
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    
    #[error("Unknown shop item: {0}")]
    UnknownItem(String),
    
    #[error("Unknown quest: {0}")]
    UnknownQuest(String),
    
    #[error("Unknown challenge: {0}")]
    UnknownChallenge(String),
    
    #[error("Quest not completed yet: {0}")]
    QuestNotCompleted(String),
    
    #[error("No task is waiting to be resolved")]
    NoPendingTask,
    
    #[error("Task {0} is not the task currently presented")]
    TaskMismatch(String),
    
    #[error("Configuration error: {0}")]
    Config(String),
    
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
