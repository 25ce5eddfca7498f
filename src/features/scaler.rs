use crate::errors::{PricingError, PricingResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capability interface for a fitted min-max transform.
///
/// The codec only needs the per-column fit bounds; the forward and inverse
/// transforms are derived from them. Send + Sync so bundles can be shared
/// across pricing threads once loaded.
pub trait Scaler: Send + Sync {
    fn feature_min(&self) -> &[f64];
    fn feature_max(&self) -> &[f64];

    /// (min, max) of the price target column.
    fn target_bounds(&self) -> (f64, f64);

    fn n_features(&self) -> usize {
        self.feature_min().len()
    }

    /// Column-wise `(x - min) / (max - min)`. No clamping.
    fn transform(&self, x: &[f64]) -> PricingResult<Vec<f64>> {
        check_width(self.feature_min(), self.feature_max(), x)?;
        Ok(x.iter()
            .zip(self.feature_min().iter().zip(self.feature_max()))
            .map(|(&v, (&lo, &hi))| (v - lo) / unit_range(lo, hi))
            .collect())
    }

    /// Column-wise `x * (max - min) + min`, undoing [`Scaler::transform`]
    /// exactly, including outside the fit range.
    fn inverse_transform(&self, x: &[f64]) -> PricingResult<Vec<f64>> {
        check_width(self.feature_min(), self.feature_max(), x)?;
        Ok(x.iter()
            .zip(self.feature_min().iter().zip(self.feature_max()))
            .map(|(&v, (&lo, &hi))| v * unit_range(lo, hi) + lo)
            .collect())
    }

    /// Inverse transform of a single scaled target value.
    #[inline]
    fn inverse_transform_target(&self, scaled: f64) -> f64 {
        let (lo, hi) = self.target_bounds();
        scaled * unit_range(lo, hi) + lo
    }
}

fn check_width(mins: &[f64], maxs: &[f64], x: &[f64]) -> PricingResult<()> {
    if mins.len() != maxs.len() {
        return Err(PricingError::DataProcessing(format!(
            "scaler bounds disagree: {} minima vs {} maxima",
            mins.len(),
            maxs.len()
        )));
    }
    if x.len() != mins.len() {
        return Err(PricingError::DataProcessing(format!(
            "scaler fitted on {} features, got a vector of {}",
            mins.len(),
            x.len()
        )));
    }
    Ok(())
}

/// Degenerate columns (max == min) scale with unit range.
#[inline]
fn unit_range(lo: f64, hi: f64) -> f64 {
    let range = hi - lo;
    if range == 0.0 {
        1.0
    } else {
        range
    }
}

/// Min-max scaler persisted as JSON next to each model.
///
/// ```json
/// { "feature_min": [..5], "feature_max": [..5], "target_min": 0.0, "target_max": 80.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub feature_min: Vec<f64>,
    pub feature_max: Vec<f64>,
    pub target_min: f64,
    pub target_max: f64,
}

impl MinMaxScaler {
    /// Fit per-column bounds on training rows and the matching targets.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R], targets: &[f64]) -> PricingResult<Self> {
        let first = rows
            .first()
            .ok_or_else(|| PricingError::DataProcessing("cannot fit scaler on empty data".into()))?;
        if rows.len() != targets.len() {
            return Err(PricingError::DataProcessing(format!(
                "{} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let width = first.as_ref().len();
        let mut feature_min = vec![f64::INFINITY; width];
        let mut feature_max = vec![f64::NEG_INFINITY; width];

        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(PricingError::DataProcessing(format!(
                    "ragged feature rows: expected {width} columns, got {}",
                    row.len()
                )));
            }
            for (i, &v) in row.iter().enumerate() {
                feature_min[i] = feature_min[i].min(v);
                feature_max[i] = feature_max[i].max(v);
            }
        }

        let (target_min, target_max) = targets
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| (lo.min(y), hi.max(y)));

        Ok(Self {
            feature_min,
            feature_max,
            target_min,
            target_max,
        })
    }

    /// Batch forward transform.
    pub fn transform_rows<R: AsRef<[f64]>>(&self, rows: &[R]) -> PricingResult<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform(r.as_ref())).collect()
    }

    /// Batch inverse transform of scaled feature rows.
    pub fn inverse_transform_rows<R: AsRef<[f64]>>(&self, rows: &[R]) -> PricingResult<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.inverse_transform(r.as_ref())).collect()
    }

    /// Batch inverse transform of scaled targets.
    pub fn inverse_transform_targets(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&s| self.inverse_transform_target(s)).collect()
    }

    /// Read a scaler artifact. Missing files and malformed JSON are load errors.
    pub fn from_json_file(path: &Path) -> PricingResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PricingError::load(path, e))?;
        let scaler: Self = serde_json::from_str(&raw).map_err(|e| PricingError::load(path, e))?;

        if scaler.feature_min.len() != scaler.feature_max.len() {
            return Err(PricingError::load(
                path,
                format!(
                    "feature_min has {} columns but feature_max has {}",
                    scaler.feature_min.len(),
                    scaler.feature_max.len()
                ),
            ));
        }
        Ok(scaler)
    }
}

impl Scaler for MinMaxScaler {
    #[inline]
    fn feature_min(&self) -> &[f64] {
        &self.feature_min
    }

    #[inline]
    fn feature_max(&self) -> &[f64] {
        &self.feature_max
    }

    #[inline]
    fn target_bounds(&self) -> (f64, f64) {
        (self.target_min, self.target_max)
    }
}
