use crate::types::OptionType;
use std::path::PathBuf;

/// Domain-specific error types for the pricing engine.
/// Every failure is deterministic given the same inputs and registry state,
/// so nothing in the core retries. Callers decide presentation.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} model not loaded")]
    ModelNotLoaded(OptionType),

    #[error("data processing error: {0}")]
    DataProcessing(String),

    #[error("prediction error: {0}")]
    Prediction(String),

    /// Reserved for the offline training workflow; the core never raises it.
    #[error("model training error: {0}")]
    ModelTraining(String),

    #[error("failed to load {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("config error: {0}")]
    Config(String),
}

impl PricingError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        PricingError::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type PricingResult<T> = Result<T, PricingError>;
