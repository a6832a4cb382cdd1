//! WASM App state and event loop

use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use truthordare_core::categories::embedded_categories;
use truthordare_core::{
    ClaimOutcome, GameConfig, GameEffect, GameSession, PanelAction, Result, SelectionMode, SystemClock,
};

use crate::storage::LocalStore;

/// Seconds a toast stays on screen
const TOAST_SECONDS: f64 = 4.0;
const MAX_TOASTS: usize = 5;

// ============================================================================
// Types
// ============================================================================

pub struct Toast {
    pub text: String,
    pub expires_at: f64,
}

// ============================================================================
// Main App
// ============================================================================

pub struct TruthOrDareApp {
    pub(crate) session: GameSession<SystemClock, StdRng>,
    pub(crate) store: LocalStore,

    // UI state
    pub(crate) status: String,
    pub(crate) toasts: Vec<Toast>,
    pub(crate) pending_effects: Vec<GameEffect>,
    pub(crate) show_stats_panel: bool,
    pub(crate) show_shop: bool,
    pub(crate) show_settings: bool,
    pub(crate) confirm_reset: bool,
}

impl TruthOrDareApp {
    pub fn new() -> Self {
        let mut store = LocalStore;
        let session = GameSession::restore(
            GameConfig::embedded(),
            embedded_categories(),
            SystemClock,
            StdRng::from_entropy(),
            &mut store,
        );

        // Check viewport width to decide if stats panel should start open
        let viewport_width = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(1200.0);

        let mut app = Self {
            session,
            store,
            status: "Ready".to_string(),
            toasts: Vec::new(),
            pending_effects: Vec::new(),
            show_stats_panel: viewport_width > 800.0,
            show_shop: false,
            show_settings: false,
            confirm_reset: false,
        };
        app.persist();
        app
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub(crate) fn persist(&mut self) {
        if let Err(e) = self.session.save(&mut self.store) {
            tracing::warn!("Could not save progress: {}", e);
            self.status = format!("Progress not saved: {}", e);
        }
    }

    /// Queue effects for display and save the new state
    fn apply(&mut self, effects: Vec<GameEffect>) {
        let changed = !effects.is_empty();
        self.pending_effects.extend(effects);
        if changed {
            self.persist();
        }
    }

    fn apply_result(&mut self, result: Result<Vec<GameEffect>>) {
        match result {
            Ok(effects) => {
                self.pending_effects.extend(effects);
                self.persist();
            }
            Err(e) => {
                tracing::warn!("Action rejected: {}", e);
                self.status = e.to_string();
            }
        }
    }

    pub(crate) fn draw(&mut self, mode: SelectionMode) {
        self.session.begin_selection(mode);
        self.status = "Choosing...".to_string();
    }

    pub(crate) fn complete_current(&mut self) {
        let Some(task_id) = self.session.pending_task().map(|t| t.id.clone()) else {
            return;
        };
        let result = self.session.resolve(&task_id, true);
        self.status = "Nice one!".to_string();
        self.apply_result(result);
    }

    pub(crate) fn skip_current(&mut self) {
        let result = self.session.skip();
        self.status = "Skipped".to_string();
        self.apply_result(result);
    }

    pub(crate) fn share_current(&mut self, ctx: &egui::Context) {
        if let Some(task) = self.session.pending_task() {
            ctx.copy_text(format!("Truth or Dare - {}: {}", task.kind.label(), task.text));
        }
        let effects = self.session.record_share();
        self.status = "Copied to clipboard".to_string();
        self.apply(effects);
    }

    pub(crate) fn handle_panel_action(&mut self, action: PanelAction) {
        let result = match action {
            PanelAction::ClaimQuest(id) => self.session.claim_quest(&id).map(|r| self.claim_status(r)),
            PanelAction::ClaimChallenge(id) => self.session.claim_challenge(&id).map(|r| self.claim_status(r)),
            PanelAction::Buy(item) => self.session.purchase(item),
        };
        self.apply_result(result);
    }

    fn claim_status(&mut self, (outcome, effects): (ClaimOutcome, Vec<GameEffect>)) -> Vec<GameEffect> {
        if outcome == ClaimOutcome::AlreadyClaimed {
            self.status = "Reward already claimed".to_string();
        }
        effects
    }

    pub(crate) fn reset(&mut self) {
        let effects = self.session.reset();
        self.toasts.clear();
        self.pending_effects = effects;
        self.status = "Progress reset".to_string();
        self.persist();
    }

    // ========================================================================
    // Toasts
    // ========================================================================

    fn flush_toasts(&mut self, now: f64) {
        for effect in self.pending_effects.drain(..) {
            if matches!(effect, GameEffect::XpGained { .. } | GameEffect::PointsGained { .. }) {
                continue;
            }
            self.toasts.push(Toast {
                text: effect.describe(),
                expires_at: now + TOAST_SECONDS,
            });
        }
        self.toasts.retain(|t| t.expires_at > now);
        if self.toasts.len() > MAX_TOASTS {
            let excess = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..excess);
        }
    }
}

// ============================================================================
// eframe::App Implementation
// ============================================================================

impl eframe::App for TruthOrDareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let effects = self.session.poll();
        if effects.iter().any(|e| matches!(e, GameEffect::TaskRevealed { .. } | GameEffect::EmptyPool { .. })) {
            self.status = "Your turn".to_string();
        }
        self.apply(effects);
        self.flush_toasts(ctx.input(|i| i.time));

        // Timers and toasts need a steady tick while something is running
        if self.session.is_deliberating() || self.session.countdown_remaining().is_some() || !self.toasts.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        }

        // Render panels (implemented in panels.rs)
        self.render_top_panel(ctx);
        self.render_stats_panel(ctx);
        self.render_task_panel(ctx);
        self.render_shop_window(ctx);
        self.render_settings_window(ctx);
        self.render_toasts(ctx);
    }
}
