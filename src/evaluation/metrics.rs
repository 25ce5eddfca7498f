//! Accuracy metrics over true/predicted price arrays.
//! All functions are pure: they take slices and return fresh reports.

use crate::errors::{PricingError, PricingResult};
use serde::Serialize;

pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Fixed-shape error report. Every field is always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsReport {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    /// Percent. `inf`/`NaN` when any true value is zero.
    pub mape: f64,
}

/// Network vs analytic baseline on the same targets.
/// Improvements are percentages; positive means the network wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub dl_mse: f64,
    pub bs_mse: f64,
    pub mse_improvement: f64,
    pub dl_rmse: f64,
    pub bs_rmse: f64,
    pub rmse_improvement: f64,
    pub dl_r2: f64,
    pub bs_r2: f64,
}

/// Non-empty, equal-length check shared by every evaluator.
pub(crate) fn check_pair(y_true: &[f64], y_pred: &[f64]) -> PricingResult<()> {
    if y_true.is_empty() {
        return Err(PricingError::DataProcessing("cannot evaluate empty arrays".into()));
    }
    if y_true.len() != y_pred.len() {
        return Err(PricingError::DataProcessing(format!(
            "length mismatch: {} true values vs {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

fn warn_on_zero_targets(y_true: &[f64], metric: &'static str) {
    let zeros = y_true.iter().filter(|&&y| y == 0.0).count();
    if zeros > 0 {
        tracing::warn!(zeros, metric, "true values contain zeros, relative error is undefined");
    }
}

/// mse, rmse, mae, r2 and mape of a prediction array.
///
/// r2 follows the usual finite convention when the targets are constant:
/// 1.0 for a perfect fit, 0.0 otherwise.
pub fn evaluate_model_performance(y_true: &[f64], y_pred: &[f64]) -> PricingResult<MetricsReport> {
    check_pair(y_true, y_pred)?;
    warn_on_zero_targets(y_true, "mape");

    let n = y_true.len() as f64;
    let mean_true = y_true.iter().sum::<f64>() / n;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut abs_sum = 0.0;
    let mut pct_sum = 0.0;

    for (&t, &p) in y_true.iter().zip(y_pred) {
        let err = t - p;
        ss_res += err * err;
        ss_tot += (t - mean_true) * (t - mean_true);
        abs_sum += err.abs();
        // No zero guard: a zero target propagates inf/NaN into mape
        pct_sum += (err / t).abs();
    }

    let mse = ss_res / n;
    let r2 = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(MetricsReport {
        mse,
        rmse: mse.sqrt(),
        mae: abs_sum / n,
        r2,
        mape: pct_sum / n * 100.0,
    })
}

/// Percentage of predictions whose relative error is within `tolerance`.
pub fn calculate_prediction_accuracy(y_true: &[f64], y_pred: &[f64], tolerance: f64) -> PricingResult<f64> {
    check_pair(y_true, y_pred)?;
    if !(tolerance >= 0.0) {
        return Err(PricingError::DataProcessing(format!(
            "tolerance must be non-negative, got {tolerance}"
        )));
    }
    warn_on_zero_targets(y_true, "accuracy");

    let hits = y_true
        .iter()
        .zip(y_pred)
        .filter(|&(&t, &p)| ((t - p) / t).abs() <= tolerance)
        .count();

    Ok(hits as f64 / y_true.len() as f64 * 100.0)
}

/// Score the network and the Black-Scholes baseline against the same targets.
pub fn compare_with_black_scholes(
    y_true: &[f64],
    y_pred_dl: &[f64],
    y_pred_bs: &[f64],
) -> PricingResult<ComparisonReport> {
    let dl = evaluate_model_performance(y_true, y_pred_dl)?;
    let bs = evaluate_model_performance(y_true, y_pred_bs)?;

    Ok(ComparisonReport {
        dl_mse: dl.mse,
        bs_mse: bs.mse,
        mse_improvement: improvement(bs.mse, dl.mse),
        dl_rmse: dl.rmse,
        bs_rmse: bs.rmse,
        rmse_improvement: improvement(bs.rmse, dl.rmse),
        dl_r2: dl.r2,
        bs_r2: bs.r2,
    })
}

#[inline]
fn improvement(baseline: f64, candidate: f64) -> f64 {
    (baseline - candidate) / baseline * 100.0
}
