//! Core game engine for Truth or Dare
//! 
//! This crate contains:
//! - Data models shared between the engine and the browser front end
//! - Level curve, rank table and reward tables
//! - Quest, daily challenge and achievement rules
//! - The progression engine and task selector
//! - Effect messages emitted to the presentation layer
//! - Persistence codec, configuration and the session controller
//! - Shared UI components (with `ui` feature)

pub mod models;
pub mod messages;
pub mod error;
pub mod config;
pub mod clock;
pub mod categories;
pub mod level;
pub mod ranks;
pub mod rewards;
pub mod quests;
pub mod challenges;
pub mod achievements;
pub mod progression;
pub mod selector;
pub mod shop;
pub mod storage;
pub mod session;

#[cfg(feature = "ui")]
pub mod ui;

pub use models::*;
pub use messages::*;
pub use error::*;
pub use config::GameConfig;
pub use clock::{Clock, FixedClock, SystemClock};
pub use session::{ClaimOutcome, GameSession, SelectionTicket};
pub use selector::SelectionMode;
pub use storage::{MemoryStorage, Storage};

#[cfg(feature = "ui")]
pub use ui::*;
