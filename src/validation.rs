use crate::errors::{PricingError, PricingResult};
use crate::types::OptionParameters;

/// Domain check for raw option parameters.
/// Checks run in a fixed order and stop at the first violation.
/// Pure function, no side effects.
///
/// NaN fails every check because every comparison against it is false.
#[inline]
pub fn validate(params: &OptionParameters) -> PricingResult<OptionParameters> {
    // 1. Time to expiry
    if !(params.time_to_expiry > 0.0) {
        return Err(invalid("Time to expiry must be positive"));
    }

    // 2. Strike
    if !(params.strike_price > 0.0) {
        return Err(invalid("Strike price must be positive"));
    }

    // 3. Underlying
    if !(params.underlying_price > 0.0) {
        return Err(invalid("Underlying price must be positive"));
    }

    // 4. Volatility in (0, 1]
    if !(params.volatility > 0.0 && params.volatility <= 1.0) {
        return Err(invalid("Volatility must be between 0 and 1"));
    }

    // 5. Rate in [0, 1]
    if !(0.0..=1.0).contains(&params.risk_free_rate) {
        return Err(invalid("Risk-free rate must be between 0 and 1"));
    }

    Ok(*params)
}

fn invalid(reason: &str) -> PricingError {
    PricingError::InvalidInput(reason.to_string())
}
