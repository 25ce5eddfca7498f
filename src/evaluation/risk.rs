//! Tail-risk statistics over a distribution of predicted prices.
//!
//! Both measures look at the lower tail of the price distribution itself
//! (no P&L sign flip): VaR is the `(1 - confidence)` percentile and Expected
//! Shortfall is the mean of everything at or below it, so ES <= VaR always.

use crate::errors::{PricingError, PricingResult};

pub const DEFAULT_CONFIDENCE: f64 = 0.95;

fn validate_inputs(predictions: &[f64], confidence_level: f64) -> PricingResult<()> {
    if predictions.is_empty() {
        return Err(PricingError::DataProcessing(
            "cannot compute tail risk of an empty prediction set".into(),
        ));
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(PricingError::DataProcessing(format!(
            "confidence level must be in (0, 1), got {confidence_level}"
        )));
    }
    Ok(())
}

/// Percentile with linear interpolation between closest ranks.
/// `q` is in percent, `sorted` must be ascending and non-empty.
fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * q / 100.0;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Value-at-Risk: the `(1 - confidence_level) * 100`-th percentile of the
/// predictions.
pub fn calculate_value_at_risk(predictions: &[f64], confidence_level: f64) -> PricingResult<f64> {
    validate_inputs(predictions, confidence_level)?;

    let mut sorted = predictions.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(percentile_sorted(&sorted, (1.0 - confidence_level) * 100.0))
}

/// Expected Shortfall: mean of all predictions at or below the VaR.
/// Never empty, since the sample minimum is always at or below the VaR.
pub fn calculate_expected_shortfall(predictions: &[f64], confidence_level: f64) -> PricingResult<f64> {
    let var = calculate_value_at_risk(predictions, confidence_level)?;

    let (tail_sum, tail_count) = predictions
        .iter()
        .filter(|&&x| x <= var)
        .fold((0.0, 0usize), |(sum, n), &x| (sum + x, n + 1));

    if tail_count == 0 {
        // Only reachable with NaN in the sample
        Ok(var)
    } else {
        Ok(tail_sum / tail_count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile_sorted(&sorted, 0.0), 1.0);
        assert_relative_eq!(percentile_sorted(&sorted, 50.0), 3.0);
        assert_relative_eq!(percentile_sorted(&sorted, 100.0), 5.0);
        // rank 0.2 -> 1.2
        assert_relative_eq!(percentile_sorted(&sorted, 5.0), 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_var_on_evenly_spaced_grid() {
        // 0..=999: rank 49.95 -> 49.95
        let grid: Vec<f64> = (0..1000).map(f64::from).collect();
        let var = calculate_value_at_risk(&grid, 0.95).unwrap();
        assert_relative_eq!(var, 49.95, epsilon = 1e-9);
    }

    #[test]
    fn test_uniform_sample_tail() {
        let mut rng = StdRng::seed_from_u64(42);
        let sample: Vec<f64> = (0..1000).map(|_| rng.gen_range(0.0..100.0)).collect();

        let var = calculate_value_at_risk(&sample, DEFAULT_CONFIDENCE).unwrap();
        assert!((var - 5.0).abs() < 3.0, "VaR={var} should sit near the 5th percentile");

        let es = calculate_expected_shortfall(&sample, DEFAULT_CONFIDENCE).unwrap();
        assert!(es <= var, "ES={es} must not exceed VaR={var}");
        assert!(es >= 0.0);
    }

    #[test]
    fn test_order_independent() {
        let a = [5.0, 1.0, 4.0, 2.0, 3.0];
        let b = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(
            calculate_value_at_risk(&a, 0.9).unwrap(),
            calculate_value_at_risk(&b, 0.9).unwrap()
        );
    }

    #[test]
    fn test_expected_shortfall_small_sample() {
        // VaR(0.6) on [1..5] = percentile 40 -> rank 1.6 -> 2.6; tail = {1, 2}
        let es = calculate_expected_shortfall(&[3.0, 1.0, 5.0, 2.0, 4.0], 0.6).unwrap();
        assert_relative_eq!(es, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(calculate_value_at_risk(&[7.0], 0.95).unwrap(), 7.0);
        assert_eq!(calculate_expected_shortfall(&[7.0], 0.95).unwrap(), 7.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            calculate_value_at_risk(&[], 0.95),
            Err(PricingError::DataProcessing(_))
        ));
        assert!(calculate_value_at_risk(&[1.0], 1.0).is_err());
        assert!(calculate_value_at_risk(&[1.0], 0.0).is_err());
        assert!(calculate_expected_shortfall(&[], 0.95).is_err());
    }
}
