use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::DrugRecord;
use crate::state::{AppState, Section};

// ---------------------------------------------------------------------------
// Left side panel – branding and most listed drugs
// ---------------------------------------------------------------------------

/// Render the left sidebar.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    // ---- Logo (centered) ----
    if let Some(bytes) = &state.logo {
        let logo = egui::ImageSource::Bytes {
            uri: "bytes://drugs.png".into(),
            bytes: egui::load::Bytes::Shared(bytes.clone()),
        };
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(logo)
                    .max_width(ui.available_width() * 0.9)
                    .max_height(200.0)
                    .corner_radius(4.0),
            );
        });
        ui.add_space(4.0);
    }

    let drugs = &state.views.sidebar_drugs;
    ui.heading(format!("Top {} Drugs", state.config.sidebar_drugs));
    ui.separator();

    if drugs.is_empty() {
        ui.label("No drugs in the dataset.");
        return;
    }

    ScrollArea::vertical()
        .id_salt("sidebar_drugs")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for drug in drugs {
                ui.label(format!("• {}", drug.label))
                    .on_hover_text(format!("{} rows", drug.count));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!("{} drug records loaded", state.dataset.len()));
        if state.is_searching() {
            ui.label(format!("{} matching", state.match_count()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Hero banner
// ---------------------------------------------------------------------------

pub fn hero(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(
            RichText::new("💊 Welcome to Drug Analytics Portal")
                .size(28.0)
                .color(Color32::from_rgb(30, 58, 138)),
        );
        ui.label(
            RichText::new("Insights on drug reviews, ratings, side effects and medical conditions")
                .color(Color32::from_rgb(107, 114, 128)),
        );
        if let Some(anim) = state.animation.descriptor() {
            ui.small(format!(
                "🎞 {} · {}×{} · {} layers · {:.1}s",
                anim.name.as_deref().unwrap_or("animation"),
                anim.width,
                anim.height,
                anim.layers.len(),
                anim.duration_secs()
            ));
        }
    });
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Search box plus one card per matching record.
pub fn search_panel(ui: &mut Ui, state: &mut AppState) {
    ui.strong("🔎 Search for a Drug");
    let mut query = state.search_query.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut query)
            .hint_text("Type a drug name or condition")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.set_search_query(query);
    }

    if !state.is_searching() {
        return;
    }

    if state.match_count() == 0 {
        ui.label(format!("No drug or condition matches \"{}\".", state.search_query));
        return;
    }

    ScrollArea::vertical()
        .id_salt("search_results")
        .max_height(280.0)
        .show(ui, |ui: &mut Ui| {
            for record in state.search_results() {
                drug_card(ui, record);
            }
        });
}

fn drug_card(ui: &mut Ui, record: &DrugRecord) {
    let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(
            RichText::new(format!("💊 {}", na(&record.drug_name)))
                .strong()
                .size(18.0)
                .color(Color32::from_rgb(37, 99, 235)),
        );
        ui.label(format!("Generic Name: {}", na(&record.generic_name)));
        ui.label(format!("Medical Condition: {}", na(&record.medical_condition)));
        ui.label(format!("CSA Schedule: {}", na(&record.csa)));
        ui.horizontal(|ui: &mut Ui| {
            if let Some(url) = record.drug_web_link() {
                ui.hyperlink_to("🔗 Drug Info", url);
            }
            if let Some(url) = record.condition_web_link() {
                ui.hyperlink_to("🌐 Condition Info", url);
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Section picker
// ---------------------------------------------------------------------------

pub fn section_picker(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("📂 Go to Section");
        egui::ComboBox::from_id_salt("section")
            .selected_text(state.section.label())
            .width(260.0)
            .show_ui(ui, |ui: &mut Ui| {
                for section in Section::ALL {
                    ui.selectable_value(&mut state.section, section, section.label());
                }
            });
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open drug dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are already logged and shown in the status bar.
        let _ = state.open_path(&path);
    }
}
