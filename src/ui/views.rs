use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{COOLWARM, MAGMA};
use crate::data::model::{DrugDataset, ALL_COLUMNS};
use crate::data::stats::ReviewedDrug;
use crate::state::{AppState, Section};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Selected section (central panel, below search)
// ---------------------------------------------------------------------------

pub fn section_view(ui: &mut Ui, state: &AppState) {
    ui.heading(state.section.label());
    ui.separator();

    let views = &state.views;
    match state.section {
        Section::DatasetOverview => dataset_table(ui, &state.dataset),
        Section::RatingsOverview => plot::rating_histogram(ui, &views.histogram),
        Section::TopReviewedDrugs => match &views.top_reviewed {
            Ok(drugs) => reviewed_cards(ui, drugs),
            Err(msg) => empty_state(ui, msg),
        },
        Section::CommonSideEffects => plot::ranked_bars(
            ui,
            "side_effects",
            "Most Reported Side Effects",
            &views.top_side_effects,
            COOLWARM,
        ),
        Section::FrequentConditions => plot::ranked_bars(
            ui,
            "conditions",
            "Most Treated Conditions",
            &views.top_conditions,
            MAGMA,
        ),
    }
}

fn empty_state(ui: &mut Ui, msg: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(format!("Nothing to show: {msg}")).italics());
    });
}

// ---------------------------------------------------------------------------
// Full table
// ---------------------------------------------------------------------------

fn dataset_table(ui: &mut Ui, dataset: &DrugDataset) {
    if dataset.is_empty() {
        empty_state(ui, "dataset has no rows");
        return;
    }

    let row_height = egui::TextStyle::Body.resolve(ui.style()).size + 6.0;

    ScrollArea::horizontal().id_salt("dataset_table").show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(80.0).clip(true), ALL_COLUMNS.len())
            .header(row_height, |mut header| {
                for col in ALL_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(row_height, dataset.len(), |mut row| {
                    let record = &dataset.records[row.index()];
                    for col in ALL_COLUMNS {
                        row.col(|ui: &mut Ui| {
                            ui.label(record.cell(col).to_string());
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Most reviewed drugs
// ---------------------------------------------------------------------------

fn reviewed_cards(ui: &mut Ui, drugs: &[ReviewedDrug]) {
    ScrollArea::vertical()
        .id_salt("reviewed_cards")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for drug in drugs {
                egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label(
                            RichText::new(format!("💊 {}", drug.drug_name))
                                .strong()
                                .size(18.0)
                                .color(Color32::from_rgb(37, 99, 235)),
                        );
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                            ui.label(format!("{} reviews", drug.total_reviews));
                        });
                    });
                    ui.label(preview_text(drug));
                });
            }
        });
}

/// Side-effect preview line for a card. Missing previews read `N/A` with no ellipsis.
fn preview_text(drug: &ReviewedDrug) -> String {
    match &drug.side_effects_preview {
        Some(preview) => format!("{preview}..."),
        None => "N/A".to_string(),
    }
}
