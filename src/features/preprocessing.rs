use crate::errors::{PricingError, PricingResult};
use crate::features::codec::NUM_FEATURES;
use crate::features::scaler::MinMaxScaler;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// One historical observation, named after the training data columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub t: f64,
    pub strike_price: f64,
    pub underlying_value: f64,
    pub sigma: f64,
    pub r: f64,
    /// Observed option price (target)
    pub close: f64,
}

impl OptionQuote {
    #[inline]
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        [self.t, self.strike_price, self.underlying_value, self.sigma, self.r]
    }
}

/// Scaled train/test features, raw targets and the scaler fitted on the
/// training split only.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub x_train: Vec<Vec<f64>>,
    pub x_test: Vec<Vec<f64>>,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
    pub scaler: MinMaxScaler,
}

/// Shuffle with a fixed seed, hold out `ceil(test_size * n)` rows, fit the
/// scaler on the remainder and scale both splits with it.
pub fn preprocess_options_data(
    quotes: &[OptionQuote],
    test_size: f64,
    seed: u64,
) -> PricingResult<PreparedDataset> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PricingError::DataProcessing(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n = quotes.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PricingError::DataProcessing(format!(
            "cannot split {n} rows with test_size {test_size}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let train_rows: Vec<[f64; NUM_FEATURES]> = train_idx.iter().map(|&i| quotes[i].features()).collect();
    let test_rows: Vec<[f64; NUM_FEATURES]> = test_idx.iter().map(|&i| quotes[i].features()).collect();
    let y_train: Vec<f64> = train_idx.iter().map(|&i| quotes[i].close).collect();
    let y_test: Vec<f64> = test_idx.iter().map(|&i| quotes[i].close).collect();

    let scaler = MinMaxScaler::fit(&train_rows, &y_train)?;
    let x_train = scaler.transform_rows(&train_rows)?;
    let x_test = scaler.transform_rows(&test_rows)?;

    tracing::info!(
        train = y_train.len(),
        test = y_test.len(),
        "options data split and scaled"
    );

    Ok(PreparedDataset {
        x_train,
        x_test,
        y_train,
        y_test,
        scaler,
    })
}
