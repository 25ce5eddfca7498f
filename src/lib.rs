//! European option pricing with pre-trained call/put regressors.
//!
//! Raw parameters are validated, encoded into the fixed feature order,
//! min-max scaled with the bundle's own scaler, run through the bundle's
//! network and mapped back into a price. The `evaluation` module scores
//! price arrays and measures their tail risk independently of the engine.

pub mod config;
pub mod engine;
pub mod errors;
pub mod evaluation;
pub mod features;
pub mod models;
pub mod registry;
pub mod types;
pub mod validation;

pub use engine::PricingEngine;
pub use errors::{PricingError, PricingResult};
pub use features::FeatureCodec;
pub use registry::{BundleSource, ModelBundle, ModelRegistry};
pub use types::{OptionParameters, OptionType, PredictionRecord};
