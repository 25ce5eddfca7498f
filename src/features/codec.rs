use crate::errors::{PricingError, PricingResult};
use crate::features::scaler::Scaler;
use crate::types::OptionParameters;

/// Column order the scalers and networks were fitted on.
/// Permuting this silently corrupts every prediction.
pub const FEATURE_COLUMNS: [&str; NUM_FEATURES] = ["t", "strike_price", "underlying_value", "sigma", "r"];

/// Price target column of the training data.
pub const TARGET_COLUMN: &str = "close";

pub const NUM_FEATURES: usize = 5;

/// Ordered raw features `[t, K, S, sigma, r]`. Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn to_array(self) -> [f64; NUM_FEATURES] {
        self.0
    }
}

/// Feature vector after the min-max transform. Components may fall outside
/// [0, 1] when live inputs exceed the fit range.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFeatureVector(Vec<f64>);

impl ScaledFeatureVector {
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// True if any component lies outside the scaler's fit range.
    pub fn is_extrapolated(&self) -> bool {
        self.0.iter().any(|v| !(0.0..=1.0).contains(v))
    }
}

/// Builds feature vectors and moves them in and out of scaler space.
/// Stateless; the scaler is always supplied by the caller's bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureCodec;

impl FeatureCodec {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    pub fn encode(&self, params: &OptionParameters) -> FeatureVector {
        FeatureVector([
            params.time_to_expiry,
            params.strike_price,
            params.underlying_price,
            params.volatility,
            params.risk_free_rate,
        ])
    }

    /// Fails with `DataProcessing` if the scaler was fitted on a different
    /// number of columns.
    pub fn normalize(&self, vector: &FeatureVector, scaler: &dyn Scaler) -> PricingResult<ScaledFeatureVector> {
        let scaled = ScaledFeatureVector(scaler.transform(vector.as_slice())?);
        if scaled.is_extrapolated() {
            tracing::warn!(
                features = ?vector.as_slice(),
                scaled = ?scaled.as_slice(),
                "input outside scaler fit range, model is extrapolating"
            );
        }
        Ok(scaled)
    }

    /// Inverse of [`Self::normalize`]: map a scaled vector back to raw features.
    pub fn denormalize_features(&self, scaled: &ScaledFeatureVector, scaler: &dyn Scaler) -> PricingResult<FeatureVector> {
        let raw = scaler.inverse_transform(scaled.as_slice())?;
        let columns = raw.len();
        let raw: [f64; NUM_FEATURES] = raw.try_into().map_err(|_| {
            PricingError::DataProcessing(format!("expected {NUM_FEATURES} features, scaler produced {columns}"))
        })?;
        Ok(FeatureVector(raw))
    }

    /// Inverse transform of one scaled model output onto the target column.
    #[inline]
    pub fn denormalize(&self, value: f64, scaler: &dyn Scaler) -> f64 {
        scaler.inverse_transform_target(value)
    }
}
