use std::path::Path;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::error::DashboardResult;
use crate::data::filter::search_indices;
use crate::data::loader::load_file;
use crate::data::model::{DrugDataset, DrugRecord};
use crate::data::stats::{
    rating_histogram, top_conditions, top_drug_names, top_reviewed_drugs, top_side_effects,
    RankedCount, RatingHistogram, ReviewedDrug,
};
use crate::decor::AnimationState;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The five views offered by the section picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    DatasetOverview,
    RatingsOverview,
    TopReviewedDrugs,
    CommonSideEffects,
    FrequentConditions,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::DatasetOverview,
        Section::RatingsOverview,
        Section::TopReviewedDrugs,
        Section::CommonSideEffects,
        Section::FrequentConditions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::DatasetOverview => "📄 Dataset Overview",
            Section::RatingsOverview => "⭐ Ratings Overview",
            Section::TopReviewedDrugs => "💊 Top Reviewed Drugs",
            Section::CommonSideEffects => "⚠ Common Side Effects",
            Section::FrequentConditions => "🩺 Frequent Medical Conditions",
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Everything the sections render, computed once per dataset.
#[derive(Debug, Clone)]
pub struct DatasetViews {
    pub histogram: RatingHistogram,
    /// `Err` holds the empty-state message.
    pub top_reviewed: Result<Vec<ReviewedDrug>, String>,
    pub top_side_effects: Vec<RankedCount>,
    pub top_conditions: Vec<RankedCount>,
    pub sidebar_drugs: Vec<RankedCount>,
}

impl DatasetViews {
    pub fn compute(dataset: &DrugDataset, config: &DashboardConfig) -> Self {
        Self {
            histogram: rating_histogram(dataset, config.histogram_buckets),
            top_reviewed: top_reviewed_drugs(dataset, config.top_reviewed, config.preview_chars)
                .map_err(|e| e.to_string()),
            top_side_effects: top_side_effects(dataset, config.top_side_effects),
            top_conditions: top_conditions(dataset, config.top_conditions),
            sidebar_drugs: top_drug_names(dataset, config.sidebar_drugs),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset, shared read-only with every view.
    pub dataset: Arc<DrugDataset>,

    /// Derived views for `dataset`.
    pub views: DatasetViews,

    /// Current search box text.
    pub search_query: String,

    /// Indices into `dataset` matching `search_query`, kept in sync by
    /// `set_search_query` and `set_dataset`.
    search_hits: Vec<usize>,

    /// Selected section.
    pub section: Section,

    /// Sidebar logo bytes, `None` when unavailable.
    pub logo: Option<Arc<[u8]>>,

    pub animation: AnimationState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        config: DashboardConfig,
        dataset: DrugDataset,
        logo: Option<Arc<[u8]>>,
        animation: AnimationState,
    ) -> Self {
        let views = DatasetViews::compute(&dataset, &config);
        Self {
            config,
            dataset: Arc::new(dataset),
            views,
            search_query: String::new(),
            search_hits: Vec::new(),
            section: Section::default(),
            logo,
            animation,
            status_message: None,
        }
    }

    /// Replace the dataset and recompute every derived view.
    pub fn set_dataset(&mut self, dataset: DrugDataset) {
        self.views = DatasetViews::compute(&dataset, &self.config);
        self.dataset = Arc::new(dataset);
        self.status_message = None;
        self.rerun_search();
    }

    /// Load a file and make it the active dataset. On failure the current
    /// dataset stays and the error goes to the status bar.
    pub fn open_path(&mut self, path: &Path) -> DashboardResult<()> {
        match load_file(path) {
            Ok(dataset) => {
                log::info!("Loaded {} drug records from {}", dataset.len(), path.display());
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
        self.rerun_search();
    }

    fn rerun_search(&mut self) {
        self.search_hits = if self.is_searching() {
            search_indices(&self.dataset, &self.search_query)
        } else {
            Vec::new()
        };
    }

    /// Whether a search is active. An empty query means no search.
    pub fn is_searching(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Number of records matching the current query.
    pub fn match_count(&self) -> usize {
        self.search_hits.len()
    }

    /// Records matching the current query, in dataset order. Empty when no
    /// search is active.
    pub fn search_results(&self) -> impl Iterator<Item = &DrugRecord> + '_ {
        self.search_hits.iter().map(|&i| &self.dataset.records[i])
    }
}
