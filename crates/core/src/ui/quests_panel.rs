//! Quest, daily challenge and shop panels

use chrono::{DateTime, Utc};
use egui::{self, Color32, RichText, Ui};
use egui_phosphor::regular;

use super::PanelAction;
use crate::shop::SHOP_ITEMS;
use crate::{DailyChallenge, GameState, PlayerStats, Quest, QuestReward};

const DONE_COLOR: Color32 = Color32::from_rgb(80, 200, 80);

fn reward_summary(reward: &QuestReward) -> String {
    let mut parts = Vec::new();
    if let Some(points) = reward.points {
        parts.push(format!("{} pts", points));
    }
    if let Some(xp) = reward.xp {
        parts.push(format!("{} XP", xp));
    }
    for item in &reward.items {
        match item {
            crate::ItemGrant::SkipTokens { count } => parts.push(format!("{} skip", count)),
        }
    }
    if let Some(boost) = reward.boost {
        parts.push(format!("{}m 2x XP", boost.duration_minutes));
    }
    if reward.badge.is_some() {
        parts.push("badge".to_string());
    }
    parts.join(" · ")
}

fn time_left(end: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let left = end - now;
    if left.num_days() >= 1 {
        format!("{}d left", left.num_days())
    } else if left.num_hours() >= 1 {
        format!("{}h left", left.num_hours())
    } else {
        format!("{}m left", left.num_minutes().max(0))
    }
}

/// One progress row with an optional claim button. Returns true if claim was clicked.
fn progress_row(
    ui: &mut Ui,
    title: &str,
    description: &str,
    progress: (u32, u32),
    fraction: f32,
    reward: &QuestReward,
    completed: bool,
    footer: Option<String>,
) -> bool {
    let mut clicked = false;
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let icon = if completed { regular::CHECK_CIRCLE } else { regular::TARGET };
                ui.label(RichText::new(format!("{} {}", icon, title)).strong());
                if let Some(footer) = &footer {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(footer).small().weak());
                    });
                }
            });
            ui.label(description);
            ui.add(
                egui::ProgressBar::new(fraction)
                    .text(format!("{} / {}", progress.0.min(progress.1), progress.1)),
            );
            ui.horizontal(|ui| {
                ui.label(RichText::new(reward_summary(reward)).small());
                if reward.claimed {
                    ui.colored_label(DONE_COLOR, "Claimed");
                } else if completed && ui.button(format!("{} Claim", regular::GIFT)).clicked() {
                    clicked = true;
                }
            });
        });
    clicked
}

fn render_quest(ui: &mut Ui, quest: &Quest, now: DateTime<Utc>) -> Option<PanelAction> {
    let title = format!("[{}] {}", quest.quest_type.label(), quest.title);
    let clicked = progress_row(
        ui,
        &title,
        &quest.description,
        (quest.current_progress, quest.target_value),
        quest.progress_fraction(),
        &quest.reward,
        quest.is_completed,
        Some(time_left(quest.end_date, now)),
    );
    clicked.then(|| PanelAction::ClaimQuest(quest.id.clone()))
}

/// Personal and community quests
pub fn render_quests(ui: &mut Ui, state: &GameState, now: DateTime<Utc>) -> Option<PanelAction> {
    let mut action = None;
    ui.heading(format!("{} Quests", regular::SCROLL));
    ui.separator();
    for quest in state.available_quests.iter().filter(|q| !q.is_expired(now)) {
        action = action.or(render_quest(ui, quest, now));
        ui.add_space(4.0);
    }

    ui.add_space(8.0);
    ui.heading(format!("{} Community", regular::USERS_THREE));
    ui.separator();
    for quest in state.community_quests.iter().filter(|q| !q.is_expired(now)) {
        action = action.or(render_quest(ui, quest, now));
    }
    action
}

pub fn render_challenges(ui: &mut Ui, challenges: &[DailyChallenge]) -> Option<PanelAction> {
    let mut action = None;
    ui.heading(format!("{} Daily Challenges", regular::CALENDAR_CHECK));
    ui.separator();
    if challenges.is_empty() {
        ui.label(RichText::new("Check back tomorrow").weak());
    }
    for challenge in challenges {
        let clicked = progress_row(
            ui,
            &challenge.title,
            &challenge.description,
            (challenge.current_progress, challenge.target_value),
            challenge.progress_fraction(),
            &challenge.reward,
            challenge.is_completed,
            None,
        );
        if clicked {
            action = Some(PanelAction::ClaimChallenge(challenge.id.clone()));
        }
        ui.add_space(4.0);
    }
    action
}

/// Shop catalogue; items the player cannot afford are disabled
pub fn render_shop(ui: &mut Ui, stats: &PlayerStats) -> Option<PanelAction> {
    let mut action = None;
    ui.label(format!("{} {} points available", regular::COINS, stats.points));
    ui.separator();
    egui::Grid::new("shop_items")
        .num_columns(3)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            for item in SHOP_ITEMS {
                ui.vertical(|ui| {
                    ui.label(RichText::new(item.name).strong());
                    ui.label(RichText::new(item.description).small().weak());
                });
                ui.label(format!("{} pts", item.price));
                let affordable = stats.points >= item.price;
                if ui
                    .add_enabled(affordable, egui::Button::new(format!("{} Buy", regular::SHOPPING_CART)))
                    .clicked()
                {
                    action = Some(PanelAction::Buy(item.id));
                }
                ui.end_row();
            }
        });
    action
}
