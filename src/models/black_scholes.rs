use crate::types::{OptionParameters, OptionType};
use statrs::distribution::{ContinuousCDF, Normal};

/// Black-Scholes European option pricing, the analytic baseline the
/// networks are compared against.
///
/// C = S * Phi(d1) - K * e^(-rT) * Phi(d2)
/// P = K * e^(-rT) * Phi(-d2) - S * Phi(-d1)
///
/// where d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// and   d2 = d1 - sigma * sqrt(T)
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::new()
    }
}

impl BlackScholes {
    pub fn new() -> Self {
        Self {
            normal: Normal::standard(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    /// Pure function: price from parameters. No allocations.
    pub fn price(&self, option_type: OptionType, p: &OptionParameters) -> f64 {
        let (s, k, t, sigma, r) = (
            p.underlying_price,
            p.strike_price,
            p.time_to_expiry,
            p.volatility,
            p.risk_free_rate,
        );

        // Guard: at expiry or with no volatility only intrinsic value remains
        if t <= 0.0 || sigma <= 0.0 {
            return match option_type {
                OptionType::Call => (s - k).max(0.0),
                OptionType::Put => (k - s).max(0.0),
            };
        }

        let sigma_sqrt_t = sigma * t.sqrt();
        let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
        let d2 = d1 - sigma_sqrt_t;
        let discounted_k = k * (-r * t).exp();

        let price = match option_type {
            OptionType::Call => s * self.normal.cdf(d1) - discounted_k * self.normal.cdf(d2),
            OptionType::Put => discounted_k * self.normal.cdf(-d2) - s * self.normal.cdf(-d1),
        };

        // Rounding can push deep OTM prices a hair below zero
        price.max(0.0)
    }

    /// Baseline prices for a batch, in request order.
    pub fn price_all(&self, requests: &[(OptionType, OptionParameters)]) -> Vec<f64> {
        requests.iter().map(|(ty, p)| self.price(*ty, p)).collect()
    }
}

pub fn call_price(p: &OptionParameters) -> f64 {
    BlackScholes::new().price(OptionType::Call, p)
}

pub fn put_price(p: &OptionParameters) -> f64 {
    BlackScholes::new().price(OptionType::Put, p)
}
