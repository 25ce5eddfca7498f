use crate::errors::{PricingError, PricingResult};
use std::path::PathBuf;

/// Environment-driven defaults. CLI flags override every field.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub call_model_path: Option<PathBuf>,
    pub put_model_path: Option<PathBuf>,
    pub call_scaler_path: Option<PathBuf>,
    pub put_scaler_path: Option<PathBuf>,
    pub log_level: String,
}

/// The four artifacts a registry load needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub call_model: PathBuf,
    pub put_model: PathBuf,
    pub call_scaler: PathBuf,
    pub put_scaler: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            call_model_path: env_path("CALL_MODEL_PATH"),
            put_model_path: env_path("PUT_MODEL_PATH"),
            call_scaler_path: env_path("CALL_SCALER_PATH"),
            put_scaler_path: env_path("PUT_SCALER_PATH"),
            log_level: env_var_or("LOG_LEVEL", "info"),
        }
    }

    /// Merge CLI overrides over the configured paths. All four must be
    /// known afterwards.
    pub fn artifacts(
        &self,
        call_model: Option<PathBuf>,
        put_model: Option<PathBuf>,
        call_scaler: Option<PathBuf>,
        put_scaler: Option<PathBuf>,
    ) -> PricingResult<ArtifactPaths> {
        let pick = |cli: Option<PathBuf>, env: &Option<PathBuf>| cli.or_else(|| env.clone());

        match (
            pick(call_model, &self.call_model_path),
            pick(put_model, &self.put_model_path),
            pick(call_scaler, &self.call_scaler_path),
            pick(put_scaler, &self.put_scaler_path),
        ) {
            (Some(call_model), Some(put_model), Some(call_scaler), Some(put_scaler)) => Ok(ArtifactPaths {
                call_model,
                put_model,
                call_scaler,
                put_scaler,
            }),
            _ => Err(PricingError::Config(
                "All model and scaler paths are required for prediction mode.".into(),
            )),
        }
    }
}

/// Unset and blank variables both read as `None`.
fn env_value(key: &str) -> Option<String> {
    non_blank(std::env::var(key).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_value(key).map(PathBuf::from)
}

fn env_var_or(key: &str, default: &str) -> String {
    env_value(key).unwrap_or_else(|| default.to_string())
}
