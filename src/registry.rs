use crate::errors::{PricingError, PricingResult};
use crate::features::{MinMaxScaler, Scaler};
use crate::models::network::DenseNetwork;
use crate::models::Regressor;
use crate::types::OptionType;
use std::path::Path;

/// A trained regressor paired with the scaler it was fitted with.
/// Only ever constructed whole, so a bundle cannot exist half-loaded.
pub struct ModelBundle {
    model: Box<dyn Regressor>,
    scaler: Box<dyn Scaler>,
}

impl ModelBundle {
    pub fn new(model: impl Regressor + 'static, scaler: impl Scaler + 'static) -> Self {
        Self {
            model: Box::new(model),
            scaler: Box::new(scaler),
        }
    }

    /// Read a JSON network and its JSON scaler, checking they agree on width.
    pub fn from_files(model_path: &Path, scaler_path: &Path) -> PricingResult<Self> {
        let model = DenseNetwork::from_json_file(model_path)?;
        let scaler = MinMaxScaler::from_json_file(scaler_path)?;

        let model_inputs = model.n_inputs();
        if scaler.n_features() != model_inputs {
            return Err(PricingError::load(
                scaler_path,
                format!(
                    "scaler has {} columns but {} expects {model_inputs} inputs",
                    scaler.n_features(),
                    model.name
                ),
            ));
        }

        Ok(Self::new(model, scaler))
    }

    #[inline]
    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    #[inline]
    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("model", &self.model.name())
            .field("n_features", &self.scaler.n_features())
            .finish()
    }
}

/// Anything that can hand the engine the bundle for one option type.
/// The registry is the production source; tests substitute recorders.
pub trait BundleSource {
    fn bundle(&self, option_type: OptionType) -> PricingResult<&ModelBundle>;
}

/// Lifecycle of one option type's slot.
/// Loading is transient inside [`ModelRegistry::load`] and never observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Ready,
}

/// Holds the call and put bundles.
///
/// Read-mostly after `load`: pricing only borrows immutably, so a loaded
/// registry can serve many reader threads. `load`/`unload` take `&mut self`;
/// sharing across threads therefore needs the caller's own lock.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    call: Option<ModelBundle>,
    put: Option<ModelBundle>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load both bundles from four artifact paths.
    ///
    /// All artifacts are read and checked before either slot changes, so a
    /// failure leaves the registry exactly as it was. Not retried.
    pub fn load(
        &mut self,
        call_model_path: impl AsRef<Path>,
        put_model_path: impl AsRef<Path>,
        call_scaler_path: impl AsRef<Path>,
        put_scaler_path: impl AsRef<Path>,
    ) -> PricingResult<()> {
        let call = ModelBundle::from_files(call_model_path.as_ref(), call_scaler_path.as_ref())?;
        let put = ModelBundle::from_files(put_model_path.as_ref(), put_scaler_path.as_ref())?;

        tracing::info!(
            call_model = %call_model_path.as_ref().display(),
            put_model = %put_model_path.as_ref().display(),
            "call and put models loaded"
        );

        self.call = Some(call);
        self.put = Some(put);
        Ok(())
    }

    /// Install an already-built bundle for one option type, replacing any
    /// previous one.
    pub fn insert(&mut self, option_type: OptionType, bundle: ModelBundle) {
        tracing::info!(%option_type, model = bundle.model().name(), "model bundle installed");
        *self.slot_mut(option_type) = Some(bundle);
    }

    #[inline]
    pub fn is_ready(&self, option_type: OptionType) -> bool {
        self.slot(option_type).is_some()
    }

    #[inline]
    pub fn state(&self, option_type: OptionType) -> SlotState {
        if self.is_ready(option_type) {
            SlotState::Ready
        } else {
            SlotState::Empty
        }
    }

    pub fn get(&self, option_type: OptionType) -> PricingResult<&ModelBundle> {
        self.slot(option_type)
            .as_ref()
            .ok_or(PricingError::ModelNotLoaded(option_type))
    }

    /// Release both bundles. Idempotent.
    pub fn unload(&mut self) {
        if self.call.is_some() || self.put.is_some() {
            tracing::info!("models unloaded");
        }
        self.call = None;
        self.put = None;
    }

    #[inline]
    fn slot(&self, option_type: OptionType) -> &Option<ModelBundle> {
        match option_type {
            OptionType::Call => &self.call,
            OptionType::Put => &self.put,
        }
    }

    #[inline]
    fn slot_mut(&mut self, option_type: OptionType) -> &mut Option<ModelBundle> {
        match option_type {
            OptionType::Call => &mut self.call,
            OptionType::Put => &mut self.put,
        }
    }
}

impl BundleSource for ModelRegistry {
    #[inline]
    fn bundle(&self, option_type: OptionType) -> PricingResult<&ModelBundle> {
        self.get(option_type)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::network::{Activation, DenseLayer};
    use std::path::PathBuf;

    /// Network returning a constant scaled output, ignoring its inputs.
    pub(crate) fn constant_net(name: &str, output: f64) -> DenseNetwork {
        DenseNetwork::new(
            name,
            vec![DenseLayer {
                weights: vec![vec![0.0; 5]],
                bias: vec![output],
                activation: Activation::Linear,
            }],
        )
        .unwrap()
    }

    pub(crate) fn unit_scaler(target_max: f64) -> MinMaxScaler {
        MinMaxScaler {
            feature_min: vec![0.0, 50.0, 50.0, 0.05, 0.0],
            feature_max: vec![2.0, 150.0, 150.0, 0.8, 0.1],
            target_min: 0.0,
            target_max,
        }
    }

    struct Artifacts {
        _dir: tempfile::TempDir,
        call_model: PathBuf,
        put_model: PathBuf,
        call_scaler: PathBuf,
        put_scaler: PathBuf,
    }

    fn write_artifacts() -> Artifacts {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, body: String| {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            path
        };
        let call_model = write("call_model.json", serde_json::to_string(&constant_net("call", 0.3)).unwrap());
        let put_model = write("put_model.json", serde_json::to_string(&constant_net("put", 0.1)).unwrap());
        let call_scaler = write("call_scaler.json", serde_json::to_string(&unit_scaler(100.0)).unwrap());
        let put_scaler = write("put_scaler.json", serde_json::to_string(&unit_scaler(50.0)).unwrap());
        Artifacts {
            _dir: dir,
            call_model,
            put_model,
            call_scaler,
            put_scaler,
        }
    }

    #[test]
    fn test_empty_registry() {
        let reg = ModelRegistry::new();
        for ty in OptionType::ALL {
            assert!(!reg.is_ready(ty));
            assert_eq!(reg.state(ty), SlotState::Empty);
            assert!(matches!(reg.get(ty), Err(PricingError::ModelNotLoaded(t)) if t == ty));
        }
    }

    #[test]
    fn test_load_and_unload() {
        let a = write_artifacts();
        let mut reg = ModelRegistry::new();
        reg.load(&a.call_model, &a.put_model, &a.call_scaler, &a.put_scaler).unwrap();

        assert!(reg.is_ready(OptionType::Call));
        assert!(reg.is_ready(OptionType::Put));
        assert_eq!(reg.get(OptionType::Call).unwrap().model().name(), "call");
        assert_eq!(reg.get(OptionType::Put).unwrap().scaler().target_bounds(), (0.0, 50.0));

        reg.unload();
        assert_eq!(reg.state(OptionType::Call), SlotState::Empty);
        assert_eq!(reg.state(OptionType::Put), SlotState::Empty);
        // Idempotent
        reg.unload();
        assert!(!reg.is_ready(OptionType::Call));
    }

    #[test]
    fn test_missing_artifact_leaves_state_untouched() {
        let a = write_artifacts();
        let mut reg = ModelRegistry::new();
        reg.load(&a.call_model, &a.put_model, &a.call_scaler, &a.put_scaler).unwrap();

        let missing = a.put_scaler.with_file_name("nope.json");
        let err = reg
            .load(&a.call_model, &a.put_model, &a.call_scaler, &missing)
            .unwrap_err();
        assert!(matches!(err, PricingError::ModelLoad { ref path, .. } if *path == missing));

        // Previous bundles survive a failed reload
        assert!(reg.is_ready(OptionType::Call));
        assert!(reg.is_ready(OptionType::Put));
    }

    #[test]
    fn test_failed_load_on_empty_registry_stays_empty() {
        let a = write_artifacts();
        std::fs::write(&a.call_scaler, "{ malformed").unwrap();
        let mut reg = ModelRegistry::new();
        assert!(reg.load(&a.call_model, &a.put_model, &a.call_scaler, &a.put_scaler).is_err());
        assert!(!reg.is_ready(OptionType::Call));
        assert!(!reg.is_ready(OptionType::Put));
    }

    #[test]
    fn test_scaler_width_must_match_model() {
        let a = write_artifacts();
        let narrow = MinMaxScaler {
            feature_min: vec![0.0; 4],
            feature_max: vec![1.0; 4],
            target_min: 0.0,
            target_max: 1.0,
        };
        std::fs::write(&a.put_scaler, serde_json::to_string(&narrow).unwrap()).unwrap();
        let mut reg = ModelRegistry::new();
        let err = reg
            .load(&a.call_model, &a.put_model, &a.call_scaler, &a.put_scaler)
            .unwrap_err();
        assert!(matches!(err, PricingError::ModelLoad { .. }));
    }

    #[test]
    fn test_insert_single_type() {
        let mut reg = ModelRegistry::new();
        reg.insert(OptionType::Put, ModelBundle::new(constant_net("put", 0.2), unit_scaler(10.0)));
        assert!(reg.is_ready(OptionType::Put));
        assert!(!reg.is_ready(OptionType::Call));
        assert!(reg.bundle(OptionType::Put).is_ok());
    }
}
