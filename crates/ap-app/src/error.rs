//! Error types for the ap-app service layer.

use std::path::PathBuf;

use ap_core::ApError;

/// Application error type wrapping the backend crates for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read {what} file: {path}")]
    FileRead { what: &'static str, path: PathBuf, message: String },

    #[error("Failed to write output: {path}")]
    OutputWrite { path: PathBuf, message: String },

    #[error("Adsorbate {adsorbate}: {source}")]
    Model {
        adsorbate: String,
        #[source]
        source: ApError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ap-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ap_project::ProjectError> for AppError {
    fn from(err: ap_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl AppError {
    pub(crate) fn model(adsorbate: &str) -> impl FnOnce(ApError) -> AppError + '_ {
        move |source| AppError::Model {
            adsorbate: adsorbate.to_string(),
            source,
        }
    }
}
