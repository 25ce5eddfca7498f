use crate::errors::PricingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── Option Type ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub const ALL: [OptionType; 2] = [OptionType::Call, OptionType::Put];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(PricingError::InvalidInput(format!(
                "option type must be 'call' or 'put', got '{other}'"
            ))),
        }
    }
}

// ── Option Parameters ──

/// Raw market parameters for one pricing request.
/// Construct through [`OptionParameters::new`] to get a validated value;
/// the struct literal form exists so callers can hand unchecked input to the
/// validator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParameters {
    /// Years until expiry
    pub time_to_expiry: f64,
    pub strike_price: f64,
    pub underlying_price: f64,
    /// Annualized, as a fraction (0.2 = 20%)
    pub volatility: f64,
    pub risk_free_rate: f64,
}

impl OptionParameters {
    pub fn new(
        time_to_expiry: f64,
        strike_price: f64,
        underlying_price: f64,
        volatility: f64,
        risk_free_rate: f64,
    ) -> Result<Self, PricingError> {
        crate::validation::validate(&Self {
            time_to_expiry,
            strike_price,
            underlying_price,
            volatility,
            risk_free_rate,
        })
    }
}

// ── Prediction Record ──

/// Produced once per successful pricing call. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub option_type: OptionType,
    pub parameters: OptionParameters,
    /// Model output before target denormalization
    pub raw_scaled_output: f64,
    pub price: f64,
    pub priced_at: DateTime<Utc>,
}
