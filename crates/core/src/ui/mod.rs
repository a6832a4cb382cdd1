//! Shared UI components
//! 
//! Platform-agnostic egui rendering of player stats, quests, challenges and
//! the shop. Panels never mutate game state; they return a [`PanelAction`]
//! for the host to apply through the session.

mod stats_panel;
mod quests_panel;

pub use stats_panel::*;
pub use quests_panel::*;

/// A request raised by a panel widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    ClaimQuest(String),
    ClaimChallenge(String),
    Buy(&'static str),
}
