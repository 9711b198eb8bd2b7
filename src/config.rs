use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Fixed settings of the dashboard. There are no config files or flags;
/// everything comes from [`Default`].
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Dataset loaded at startup, relative to the working directory.
    pub data_path: PathBuf,
    /// Sidebar branding image.
    pub logo_path: PathBuf,
    /// Lottie descriptor shown in the hero banner.
    pub animation_url: String,
    pub animation_timeout: Duration,
    /// Equal-width rating buckets.
    pub histogram_buckets: usize,
    pub top_reviewed: usize,
    pub top_side_effects: usize,
    pub top_conditions: usize,
    /// Length of the "Top drugs" list in the sidebar.
    pub sidebar_drugs: usize,
    /// Characters of side effects text shown on a drug card.
    pub preview_chars: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/cleaned_drugs_dashboard.csv"),
            logo_path: PathBuf::from("assets/drugs.png"),
            animation_url: "https://assets2.lottiefiles.com/packages/lf20_dy6cniia.json".to_string(),
            animation_timeout: Duration::from_secs(5),
            histogram_buckets: 10,
            top_reviewed: 5,
            top_side_effects: 10,
            top_conditions: 10,
            sidebar_drugs: 100,
            preview_chars: 150,
        }
    }
}
