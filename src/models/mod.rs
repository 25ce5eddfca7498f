pub mod black_scholes;
pub mod network;

use crate::errors::PricingResult;

/// All regressors plugged into the registry implement this trait.
/// predict() must be a pure function of the scaled feature vector.
/// Send + Sync required so loaded bundles can serve concurrent readers.
pub trait Regressor: Send + Sync {
    fn name(&self) -> &str;

    /// Map a scaled feature vector to a single scaled price.
    /// Implementations report shape problems as errors rather than panicking;
    /// the engine wraps every failure into `PricingError::Prediction`.
    fn predict(&self, features: &[f64]) -> PricingResult<f64>;
}
