use crate::errors::{PricingError, PricingResult};
use crate::features::FeatureCodec;
use crate::models::Regressor;
use crate::registry::BundleSource;
use crate::types::{OptionParameters, OptionType, PredictionRecord};
use crate::validation::validate;

/// Routes a pricing request to the bundle for its option type.
///
/// validate -> bundle lookup -> encode + normalize -> model -> denormalize.
///
/// Holds no mutable state of its own, only a borrow of the bundle source,
/// so one loaded registry can back any number of engines.
pub struct PricingEngine<'a, S: BundleSource + ?Sized> {
    source: &'a S,
    codec: FeatureCodec,
}

impl<'a, S: BundleSource + ?Sized> PricingEngine<'a, S> {
    pub fn new(source: &'a S, codec: FeatureCodec) -> Self {
        Self { source, codec }
    }

    /// Price one option. Convenience over [`Self::price_record`].
    #[inline]
    pub fn price(&self, option_type: OptionType, params: &OptionParameters) -> PricingResult<f64> {
        self.price_record(option_type, params).map(|r| r.price)
    }

    pub fn price_call(&self, params: &OptionParameters) -> PricingResult<f64> {
        self.price(OptionType::Call, params)
    }

    pub fn price_put(&self, params: &OptionParameters) -> PricingResult<f64> {
        self.price(OptionType::Put, params)
    }

    /// Full pricing pipeline, returning the record of the call.
    ///
    /// Errors: `InvalidInput` from validation, `ModelNotLoaded` when the
    /// bundle is absent, `DataProcessing` on scaler width mismatch, and
    /// `Prediction` for any model failure or non-finite output.
    pub fn price_record(&self, option_type: OptionType, params: &OptionParameters) -> PricingResult<PredictionRecord> {
        let params = validate(params)?;
        let bundle = self.source.bundle(option_type)?;

        let features = self.codec.encode(&params);
        let scaled = self.codec.normalize(&features, bundle.scaler())?;

        let model = bundle.model();
        let raw_scaled_output = model.predict(scaled.as_slice()).map_err(|e| {
            let cause = match e {
                PricingError::Prediction(msg) => msg,
                other => other.to_string(),
            };
            PricingError::Prediction(format!("{option_type} model '{}' failed: {cause}", model.name()))
        })?;

        if !raw_scaled_output.is_finite() {
            return Err(PricingError::Prediction(format!(
                "{option_type} model '{}' produced non-finite output {raw_scaled_output}",
                model.name()
            )));
        }

        let price = self.codec.denormalize(raw_scaled_output, bundle.scaler());

        tracing::debug!(
            %option_type,
            raw_scaled_output,
            price,
            "option priced"
        );

        Ok(PredictionRecord {
            option_type,
            parameters: params,
            raw_scaled_output,
            price,
            priced_at: chrono::Utc::now(),
        })
    }

    /// Price requests in order. Fail-fast: the first failing item aborts
    /// the batch and its error is returned unchanged.
    pub fn price_batch(&self, requests: &[(OptionType, OptionParameters)]) -> PricingResult<Vec<f64>> {
        requests
            .iter()
            .map(|(option_type, params)| self.price(*option_type, params))
            .collect()
    }
}
