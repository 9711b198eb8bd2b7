use std::time::Duration;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::decor::AnimationState;
use crate::state::AppState;
use crate::ui::{panels, views};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DrugDashboardApp {
    pub state: AppState,
}

impl DrugDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DrugDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.animation.poll();
        if matches!(self.state.animation, AnimationState::Pending(_)) {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new("Drug Analytics Portal · Powered by Rust & egui")
                        .small()
                        .color(Color32::from_rgb(107, 114, 128)),
                );
            });
        });

        // ---- Left side panel: logo and top drugs ----
        egui::SidePanel::left("drug_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: hero, search, sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::hero(ui, &self.state);
            panels::search_panel(ui, &mut self.state);
            ui.separator();
            panels::section_picker(ui, &mut self.state);
            ui.add_space(6.0);
            views::section_view(ui, &self.state);
        });
    }
}
