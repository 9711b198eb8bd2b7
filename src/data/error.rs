use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the dashboard.
///
/// Only [`DashboardError::DataLoad`] is fatal, and only at startup. The other
/// variants degrade a single view or decoration.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Source missing, unreadable, unsupported or lacking a required column.
    #[error("failed to load dataset from {}: {reason}", path.display())]
    DataLoad { path: PathBuf, reason: String },

    /// An aggregation was requested on a dataset with zero rows.
    #[error("dataset has no rows")]
    EmptyDataset,

    /// A decorative resource (logo, animation) could not be obtained.
    #[error("optional resource {resource} unavailable: {reason}")]
    OptionalResource { resource: String, reason: String },
}

impl DashboardError {
    pub fn data_load(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        DashboardError::DataLoad {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn optional_resource(resource: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::OptionalResource {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
