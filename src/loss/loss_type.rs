use serde::{Serialize, Deserialize};

use crate::loss::cross_entropy::{CategoricalCrossEntropy, DEFAULT_EPSILON};
use crate::loss::softmax_cross_entropy::SoftmaxCategoricalCrossEntropy;

/// Selects which loss a caller's training loop uses.
///
/// - `CategoricalCrossEntropy`        — takes probabilities; pair with a
///   separate Softmax layer.
/// - `SoftmaxCategoricalCrossEntropy` — takes raw scores; applies Softmax
///   itself and returns the combined gradient (predicted - expected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    CategoricalCrossEntropy,
    SoftmaxCategoricalCrossEntropy,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

/// Serializable loss configuration: which loss, and the clip epsilon its
/// forward pass uses.
///
/// ```json
/// { "loss": "softmax_categorical_cross_entropy", "epsilon": 1e-7 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossSpec {
    pub loss: LossType,
    /// Omitted in JSON → 1e-7.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl LossSpec {
    pub fn new(loss: LossType) -> Self {
        LossSpec { loss, epsilon: DEFAULT_EPSILON }
    }

    pub fn cross_entropy(&self) -> CategoricalCrossEntropy {
        CategoricalCrossEntropy::new().with_epsilon(self.epsilon)
    }

    pub fn softmax_cross_entropy(&self) -> SoftmaxCategoricalCrossEntropy {
        SoftmaxCategoricalCrossEntropy::with_loss(self.cross_entropy())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `LossSpec` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<LossSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

impl Default for LossSpec {
    fn default() -> Self {
        LossSpec::new(LossType::SoftmaxCategoricalCrossEntropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_defaults_when_missing() {
        let spec: LossSpec = serde_json::from_str(r#"{ "loss": "categorical_cross_entropy" }"#).unwrap();
        assert_eq!(spec.loss, LossType::CategoricalCrossEntropy);
        assert_eq!(spec.epsilon, DEFAULT_EPSILON);
    }

    #[test]
    fn builds_losses_with_configured_epsilon() {
        let spec = LossSpec { loss: LossType::SoftmaxCategoricalCrossEntropy, epsilon: 1e-4 };
        assert_eq!(spec.cross_entropy().epsilon(), 1e-4);
        assert_eq!(spec.softmax_cross_entropy().loss().epsilon(), 1e-4);
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("ferrite-loss-spec-{}.json", std::process::id()));
        let path = path.to_str().unwrap();

        let spec = LossSpec { loss: LossType::CategoricalCrossEntropy, epsilon: 1e-5 };
        spec.save_json(path).unwrap();
        let loaded = LossSpec::load_json(path).unwrap();
        let _ = std::fs::remove_file(path);

        assert_eq!(loaded, spec);
    }

    #[test]
    fn load_rejects_unknown_loss() {
        let path = std::env::temp_dir().join(format!("ferrite-loss-bad-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        std::fs::write(path, r#"{ "loss": "hinge" }"#).unwrap();
        let err = LossSpec::load_json(path).unwrap_err();
        let _ = std::fs::remove_file(path);

        assert_eq!(err.kind(), std::io::ErrorKind::Other);
    }
}
