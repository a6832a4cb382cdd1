//! UI panel rendering for TruthOrDareApp

use eframe::egui;
use egui_phosphor::regular;
use truthordare_core::ranks::rank_for_xp;
use truthordare_core::{
    render_challenges, render_quests, render_shop, render_stats_content, Difficulty, SelectionMode,
    StatsPanelConfig, TaskKind,
};

use crate::app::TruthOrDareApp;

const TRUTH_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 180, 255);
const DARE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 110, 90);
const BOOST_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 220, 120);

impl TruthOrDareApp {
    // ========================================================================
    // Top Panel
    // ========================================================================

    pub fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Truth or Dare");
                ui.separator();

                let stats = self.session.stats();
                ui.label(format!("{} Lv {}", regular::STAR, stats.level));
                ui.label(format!("{} {}", regular::CROWN, rank_for_xp(stats.xp).name));
                ui.label(format!("{} {}", regular::COINS, stats.points));
                ui.label(format!("{} {}", regular::FIRE, stats.current_streak));
                ui.label(format!("{} {}", regular::TICKET, stats.skip_tokens));
                if stats.is_boost_active(self.session.now()) {
                    ui.colored_label(BOOST_COLOR, format!("{} 2x XP", regular::LIGHTNING));
                }
                ui.separator();

                if ui.button(format!("{} Shop", regular::SHOPPING_CART)).clicked() {
                    self.show_shop = !self.show_shop;
                }
                if ui.button(format!("{} Settings", regular::GEAR)).clicked() {
                    self.show_settings = !self.show_settings;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if self.show_stats_panel { regular::SIDEBAR_SIMPLE } else { regular::CHART_BAR };
                    if ui.button(icon).on_hover_text("Toggle stats panel").clicked() {
                        self.show_stats_panel = !self.show_stats_panel;
                    }
                    ui.label(&self.status);
                });
            });
        });
    }

    // ========================================================================
    // Side Panel
    // ========================================================================

    pub fn render_stats_panel(&mut self, ctx: &egui::Context) {
        if !self.show_stats_panel {
            return;
        }
        let mut action = None;
        egui::SidePanel::right("stats_panel")
            .min_width(280.0)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let now = self.session.now();
                    render_stats_content(
                        ui,
                        self.session.stats(),
                        self.session.history(),
                        now,
                        &StatsPanelConfig::compact(),
                    );
                    ui.add_space(16.0);
                    let claimed_challenge = render_challenges(ui, self.session.challenges());
                    ui.add_space(16.0);
                    let claimed_quest = render_quests(ui, self.session.state(), now);
                    action = claimed_challenge.or(claimed_quest);
                });
            });
        if let Some(action) = action {
            self.handle_panel_action(action);
        }
    }

    // ========================================================================
    // Task Card
    // ========================================================================

    pub fn render_task_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                let deliberating = self.session.is_deliberating();

                ui.horizontal(|ui| {
                    let enabled = !deliberating;
                    if ui
                        .add_enabled(enabled, egui::Button::new(format!("{} Random", regular::SHUFFLE)))
                        .clicked()
                    {
                        self.draw(SelectionMode::Random);
                    }
                    if ui
                        .add_enabled(enabled, egui::Button::new(truth_caption()))
                        .clicked()
                    {
                        self.draw(SelectionMode::Manual(TaskKind::Truth));
                    }
                    if ui
                        .add_enabled(enabled, egui::Button::new(dare_caption()))
                        .clicked()
                    {
                        self.draw(SelectionMode::Manual(TaskKind::Dare));
                    }
                });
                ui.add_space(32.0);

                if deliberating {
                    ui.spinner();
                    ui.label("Choosing...");
                    return;
                }

                let Some(task) = self.session.pending_task().cloned() else {
                    ui.label(egui::RichText::new("Pick Truth, Dare or Random to start").weak());
                    return;
                };

                let color = match task.kind {
                    TaskKind::Truth => TRUTH_COLOR,
                    TaskKind::Dare => DARE_COLOR,
                };
                ui.label(egui::RichText::new(task.kind.to_string()).size(28.0).strong().color(color));
                ui.add_space(12.0);
                ui.label(egui::RichText::new(&task.text).size(22.0));
                ui.add_space(12.0);

                if let Some(secs) = self.session.countdown_remaining() {
                    let color = if secs <= 10 { DARE_COLOR } else { ui.visuals().text_color() };
                    ui.label(
                        egui::RichText::new(format!("{} {}s", regular::TIMER, secs))
                            .size(20.0)
                            .color(color),
                    );
                }
                if task.is_photo {
                    ui.label(format!("{} Photo dare: bonus XP", regular::CAMERA));
                }
                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    if ui.button(format!("{} Done", regular::CHECK)).clicked() {
                        self.complete_current();
                    }
                    let skip_label = if self.session.stats().skip_tokens > 0 {
                        format!("{} Skip (use token)", regular::SKIP_FORWARD)
                    } else {
                        format!("{} Skip", regular::SKIP_FORWARD)
                    };
                    if ui.button(skip_label).clicked() {
                        self.skip_current();
                    }
                    if ui.button(format!("{} Share", regular::SHARE_NETWORK)).clicked() {
                        self.share_current(ui.ctx());
                    }
                });
            });
        });
    }

    // ========================================================================
    // Windows
    // ========================================================================

    pub fn render_shop_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_shop;
        let mut action = None;
        egui::Window::new(format!("{} Shop", regular::SHOPPING_CART))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                action = render_shop(ui, self.session.stats());
            });
        self.show_shop = open;
        if let Some(action) = action {
            self.handle_panel_action(action);
        }
    }

    pub fn render_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut reset = false;
        egui::Window::new(format!("{} Settings", regular::GEAR))
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label("Difficulty");
                let current = self.session.state().difficulty;
                ui.horizontal(|ui| {
                    for difficulty in Difficulty::ALL {
                        if ui.selectable_label(current == difficulty, difficulty.label()).clicked() {
                            self.session.set_difficulty(difficulty);
                            self.persist();
                        }
                    }
                });

                ui.add_space(8.0);
                ui.label("Category");
                let selected = self.session.state().selected_category.clone();
                let choices: Vec<(String, String)> = self
                    .session
                    .categories()
                    .iter()
                    .map(|c| (c.id.clone(), c.name.clone()))
                    .collect();
                egui::ComboBox::from_id_salt("category_select")
                    .selected_text(
                        choices
                            .iter()
                            .find(|(id, _)| *id == selected)
                            .map(|(_, name)| name.as_str())
                            .unwrap_or("-"),
                    )
                    .show_ui(ui, |ui| {
                        for (id, name) in &choices {
                            if ui.selectable_label(*id == selected, name).clicked() {
                                match self.session.select_category(id) {
                                    Ok(()) => self.persist(),
                                    Err(e) => self.status = e.to_string(),
                                }
                            }
                        }
                    });

                ui.add_space(16.0);
                ui.separator();
                if self.confirm_reset {
                    ui.label("Erase all progress?");
                    ui.horizontal(|ui| {
                        if ui.button("Yes, reset").clicked() {
                            reset = true;
                        }
                        if ui.button("Cancel").clicked() {
                            self.confirm_reset = false;
                        }
                    });
                } else if ui.button(format!("{} Reset progress", regular::TRASH)).clicked() {
                    self.confirm_reset = true;
                }
            });
        self.show_settings = open;
        if reset {
            self.confirm_reset = false;
            self.reset();
        }
    }

    pub fn render_toasts(&mut self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::LEFT_BOTTOM, [12.0, -12.0])
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(&toast.text);
                    });
                }
            });
    }
}

fn truth_caption() -> egui::RichText {
    egui::RichText::new(format!("{} Truth", regular::CHAT_CIRCLE)).color(TRUTH_COLOR)
}

fn dare_caption() -> egui::RichText {
    egui::RichText::new(format!("{} Dare", regular::LIGHTNING)).color(DARE_COLOR)
}
