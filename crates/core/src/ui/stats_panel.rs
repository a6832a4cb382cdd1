//! Stats panel - level, rank, counters, XP history, badges

use chrono::{DateTime, Utc};
use egui::{self, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};
use egui_phosphor::regular;

use crate::achievements::badge_name;
use crate::level::{progress_percent, xp_to_next_level};
use crate::ranks::{next_rank, rank_for_xp};
use crate::{HistoryEntry, PlayerStats};

const XP_LINE_COLOR: Color32 = Color32::from_rgb(100, 180, 255);
const STREAK_COLOR: Color32 = Color32::from_rgb(255, 140, 0);
const BOOST_COLOR: Color32 = Color32::from_rgb(120, 220, 120);

/// Configuration for how the stats panel should render
#[derive(Clone, Copy)]
pub struct StatsPanelConfig {
    /// Fixed height for plots (None = use view_aspect)
    pub plot_height: Option<f32>,
    /// Whether to allow plot interaction (drag/zoom/scroll)
    pub allow_plot_interaction: bool,
}

impl Default for StatsPanelConfig {
    fn default() -> Self {
        Self {
            plot_height: None,
            allow_plot_interaction: true,
        }
    }
}

impl StatsPanelConfig {
    /// Compact, non-interactive plots for the browser sidebar
    pub fn compact() -> Self {
        Self {
            plot_height: Some(120.0),
            allow_plot_interaction: false,
        }
    }
}

// ============================================================================
// Rendering Functions
// ============================================================================

/// Render the complete stats panel content
pub fn render_stats_content(
    ui: &mut Ui,
    stats: &PlayerStats,
    history: &[HistoryEntry],
    now: DateTime<Utc>,
    config: &StatsPanelConfig,
) {
    render_level_progress(ui, stats, now);
    ui.add_space(16.0);
    render_counters(ui, stats);
    ui.add_space(16.0);
    render_xp_history(ui, history, config);
    ui.add_space(16.0);
    render_badges(ui, stats);
}

/// Level bar, rank and boost indicator
pub fn render_level_progress(ui: &mut Ui, stats: &PlayerStats, now: DateTime<Utc>) {
    let rank = rank_for_xp(stats.xp);
    ui.horizontal(|ui| {
        ui.heading(format!("Level {}", stats.level));
        ui.label(RichText::new(format!("{} {}", regular::CROWN, rank.name)).strong());
    });

    let fraction = progress_percent(stats.xp, stats.level) / 100.0;
    ui.add(
        egui::ProgressBar::new(fraction)
            .text(format!("{} XP to next level", xp_to_next_level(stats.xp)))
            .show_percentage(),
    );

    if let Some(next) = next_rank(stats.xp) {
        ui.label(
            RichText::new(format!("{} XP until {}", next.min_xp - stats.xp, next.name))
                .small()
                .weak(),
        );
    }

    if let Some(secs) = stats.boost_seconds_left(now) {
        ui.colored_label(
            BOOST_COLOR,
            format!("{} Double XP: {}:{:02} left", regular::LIGHTNING, secs / 60, secs % 60),
        );
    }
}

/// Breakdown of counters in a two-column grid
pub fn render_counters(ui: &mut Ui, stats: &PlayerStats) {
    ui.heading("Stats");
    ui.separator();

    egui::Grid::new("player_counters")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            let rows: [(&str, String); 10] = [
                ("Points", stats.points.to_string()),
                ("Total XP", stats.xp.to_string()),
                ("Tasks completed", stats.tasks_completed.to_string()),
                ("Truths answered", stats.truths_answered.to_string()),
                ("Dares completed", stats.dares_completed.to_string()),
                ("Hard tasks", stats.hard_tasks_completed.to_string()),
                ("Photo dares", stats.photo_tasks_completed.to_string()),
                ("Shared", stats.shared_tasks.to_string()),
                ("Skip tokens", stats.skip_tokens.to_string()),
                ("Penalties", stats.penalties.to_string()),
            ];
            for (label, value) in rows {
                ui.label(label);
                ui.label(RichText::new(value).strong());
                ui.end_row();
            }
            ui.label("Streak");
            ui.label(
                RichText::new(format!(
                    "{} {} (best {})",
                    regular::FIRE,
                    stats.current_streak,
                    stats.max_streak
                ))
                .color(STREAK_COLOR),
            );
            ui.end_row();
        });
}

/// Total XP after each resolved task this session
pub fn render_xp_history(ui: &mut Ui, history: &[HistoryEntry], config: &StatsPanelConfig) {
    ui.heading("XP This Session");
    ui.separator();

    // Always create PlotPoints - use default if empty (required for WASM rendering)
    let points: PlotPoints = if history.is_empty() {
        PlotPoints::default()
    } else {
        history
            .iter()
            .enumerate()
            .map(|(i, h)| [i as f64, h.total_xp as f64])
            .collect()
    };

    let line = Line::new("Total XP", points).color(XP_LINE_COLOR);

    let mut plot = Plot::new("xp_history").auto_bounds(egui::Vec2b::new(true, true));
    if let Some(height) = config.plot_height {
        plot = plot.height(height).width(ui.available_width());
    } else {
        plot = plot.view_aspect(2.0);
    }
    if !config.allow_plot_interaction {
        plot = plot.allow_drag(false).allow_zoom(false).allow_scroll(false);
    }
    plot.show(ui, |plot_ui| {
        plot_ui.line(line);
    });

    if history.is_empty() {
        ui.label("No tasks played yet this session.");
    }
}

pub fn render_badges(ui: &mut Ui, stats: &PlayerStats) {
    ui.heading(format!("{} Badges", regular::MEDAL));
    ui.separator();
    if stats.badges.is_empty() {
        ui.label(RichText::new("None yet").weak());
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for badge in &stats.badges {
            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .corner_radius(4.0)
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.label(badge_name(badge));
                });
        }
    });
}
