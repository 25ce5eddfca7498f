use crate::errors::{PricingError, PricingResult};
use crate::features::NUM_FEATURES;
use crate::models::Regressor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layer activation, as exported alongside the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Elu,
    Sigmoid,
    Tanh,
}

impl Activation {
    #[inline]
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Relu => x.max(0.0),
            Self::Elu => {
                if x > 0.0 {
                    x
                } else {
                    x.exp_m1()
                }
            }
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
        }
    }
}

/// Fully connected layer. `weights[j]` holds the input weights of output unit j.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    #[inline]
    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    #[inline]
    fn outputs(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b;
                self.activation.apply(z)
            })
            .collect()
    }
}

/// Feed-forward regressor exported from the training notebook as JSON.
///
/// ```json
/// { "name": "call-mlp", "layers": [ { "weights": [[..]], "bias": [..], "activation": "relu" }, .. ] }
/// ```
///
/// Shapes are checked once at construction so `predict` only has to check
/// the input width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseNetwork {
    #[serde(default = "default_name")]
    pub name: String,
    pub layers: Vec<DenseLayer>,
}

fn default_name() -> String {
    "dense-network".to_string()
}

impl DenseNetwork {
    /// Build and shape-check a network: the first layer takes the five
    /// pricing features, consecutive layers chain, the last emits one value.
    pub fn new(name: impl Into<String>, layers: Vec<DenseLayer>) -> PricingResult<Self> {
        let net = Self {
            name: name.into(),
            layers,
        };
        net.check_shapes().map_err(PricingError::DataProcessing)?;
        Ok(net)
    }

    pub fn from_json_file(path: &Path) -> PricingResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PricingError::load(path, e))?;
        let net: Self = serde_json::from_str(&raw).map_err(|e| PricingError::load(path, e))?;
        net.check_shapes().map_err(|reason| PricingError::load(path, reason))?;
        Ok(net)
    }

    /// Input width of the first layer.
    #[inline]
    pub fn n_inputs(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::inputs)
    }

    fn check_shapes(&self) -> Result<(), String> {
        if self.layers.is_empty() {
            return Err("network has no layers".into());
        }

        let mut width = NUM_FEATURES;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.outputs() == 0 {
                return Err(format!("layer {i} has no units"));
            }
            if layer.bias.len() != layer.outputs() {
                return Err(format!(
                    "layer {i}: {} units but {} biases",
                    layer.outputs(),
                    layer.bias.len()
                ));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                return Err(format!("layer {i}: expected {width} inputs per unit, found {}", row.len()));
            }
            width = layer.outputs();
        }

        if width != 1 {
            return Err(format!("network must emit a single value, last layer has {width} units"));
        }
        Ok(())
    }
}

impl Regressor for DenseNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f64]) -> PricingResult<f64> {
        let expected = self.n_inputs();
        if features.len() != expected {
            return Err(PricingError::Prediction(format!(
                "{}: expected {expected} inputs, got {}",
                self.name,
                features.len()
            )));
        }

        let mut activations = features.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        activations
            .first()
            .copied()
            .ok_or_else(|| PricingError::Prediction(format!("{}: empty output", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// y = 0.5 * S_scaled - 0.5 * K_scaled + 0.5, a crude intrinsic-value proxy.
    fn linear_net() -> DenseNetwork {
        DenseNetwork::new(
            "linear",
            vec![DenseLayer {
                weights: vec![vec![0.0, -0.5, 0.5, 0.0, 0.0]],
                bias: vec![0.5],
                activation: Activation::Linear,
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_activations() {
        assert_relative_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_relative_eq!(Activation::Relu.apply(2.0), 2.0);
        assert_relative_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert_relative_eq!(Activation::Tanh.apply(0.0), 0.0);
        assert_relative_eq!(Activation::Elu.apply(-1.0), (-1.0f64).exp() - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_forward_two_layers() {
        let net = DenseNetwork::new(
            "mlp",
            vec![
                DenseLayer {
                    weights: vec![vec![1.0, 0.0, 0.0, 0.0, 0.0], vec![-1.0, 0.0, 0.0, 0.0, 0.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Relu,
                },
                DenseLayer {
                    weights: vec![vec![2.0, 3.0]],
                    bias: vec![0.1],
                    activation: Activation::Linear,
                },
            ],
        )
        .unwrap();

        // relu(0.4)=0.4, relu(-0.4)=0 -> 2*0.4 + 0.1
        assert_relative_eq!(net.predict(&[0.4, 0.0, 0.0, 0.0, 0.0]).unwrap(), 0.9, epsilon = 1e-12);
        // relu(-0.4)=0, relu(0.4)=0.4 -> 3*0.4 + 0.1
        assert_relative_eq!(net.predict(&[-0.4, 0.0, 0.0, 0.0, 0.0]).unwrap(), 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_input_width_checked() {
        let net = linear_net();
        assert!(matches!(net.predict(&[0.5; 4]), Err(PricingError::Prediction(_))));
    }

    #[test]
    fn test_shape_validation() {
        let bad_width = DenseLayer {
            weights: vec![vec![1.0; 4]],
            bias: vec![0.0],
            activation: Activation::Linear,
        };
        assert!(DenseNetwork::new("bad", vec![bad_width]).is_err());

        let two_outputs = DenseLayer {
            weights: vec![vec![1.0; 5], vec![1.0; 5]],
            bias: vec![0.0, 0.0],
            activation: Activation::Linear,
        };
        assert!(DenseNetwork::new("bad", vec![two_outputs]).is_err());
        assert!(DenseNetwork::new("empty", vec![]).is_err());
    }

    #[test]
    fn test_json_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call_model.json");
        std::fs::write(&path, serde_json::to_string(&linear_net()).unwrap()).unwrap();
        let net = DenseNetwork::from_json_file(&path).unwrap();
        assert_eq!(net, linear_net());

        std::fs::write(&path, r#"{"layers":[{"weights":[[1,2]],"bias":[0],"activation":"relu"}]}"#).unwrap();
        assert!(matches!(DenseNetwork::from_json_file(&path), Err(PricingError::ModelLoad { .. })));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(DenseNetwork::from_json_file(&path), Err(PricingError::ModelLoad { .. })));
    }

    #[test]
    fn test_default_name() {
        let net: DenseNetwork = serde_json::from_str(
            r#"{"layers":[{"weights":[[0,0,0,0,1]],"bias":[0],"activation":"linear"}]}"#,
        )
        .unwrap();
        assert_eq!(net.name(), "dense-network");
    }
}
