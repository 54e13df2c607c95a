use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::softmax::{Activation, Softmax};
use crate::error::Result;
use crate::loss::{CategoricalCrossEntropy, Loss, Targets};
use crate::math::matrix::Matrix;

/// Result of a fused forward pass: the softmax probabilities (needed by
/// `backward`) and the mean cross-entropy over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxCrossEntropyOutput {
    pub outputs: Matrix,
    pub loss: f64,
}

/// Softmax activation followed by categorical cross-entropy, with the
/// combined gradient computed directly.
///
/// Chaining the cross-entropy gradient through the softmax Jacobian
/// simplifies to
///   ∂L/∂z = (softmax(z) - y_onehot) / N
/// so `backward` only has to subtract 1 at each sample's target class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxCategoricalCrossEntropy {
    softmax: Softmax,
    loss: CategoricalCrossEntropy,
}

impl SoftmaxCategoricalCrossEntropy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `loss` (e.g. one with a custom clip epsilon) for the forward
    /// value.
    pub fn with_loss(loss: CategoricalCrossEntropy) -> Self {
        SoftmaxCategoricalCrossEntropy { softmax: Softmax, loss }
    }

    pub fn loss(&self) -> &CategoricalCrossEntropy {
        &self.loss
    }

    /// Applies softmax to the raw scores `inputs` and returns the
    /// probabilities together with their mean cross-entropy against
    /// `y_true`.
    pub fn forward(&self, inputs: &Matrix, y_true: &Targets) -> Result<SoftmaxCrossEntropyOutput> {
        let outputs = self.softmax.forward(inputs);
        let loss = self.loss.calculate(&outputs, y_true)?;
        Ok(SoftmaxCrossEntropyOutput { outputs, loss })
    }

    /// Gradient w.r.t. the softmax inputs. `y_pred` is the softmax output
    /// from `forward`, not the raw scores.
    ///
    /// Dense targets are reduced to their per-row argmax, so soft
    /// distributions are treated as hard labels here. `y_pred` itself is
    /// left untouched.
    pub fn backward(&self, y_pred: &Matrix, y_true: &Targets) -> Result<Matrix> {
        y_true.validate(y_pred)?;
        let samples = y_pred.rows as f64;
        debug!(
            samples = y_pred.rows,
            classes = y_pred.cols,
            sparse = y_true.is_sparse(),
            "softmax cross-entropy backward"
        );

        let mut dinputs = y_pred.clone();
        for (row, class) in dinputs.data.iter_mut().zip(y_true.to_indices()) {
            row[class] -= 1.0;
        }

        Ok(dinputs / samples)
    }

    /// `backward` on the probabilities stored in a forward result.
    pub fn backward_from(&self, forward: &SoftmaxCrossEntropyOutput, y_true: &Targets) -> Result<Matrix> {
        self.backward(&forward.outputs, y_true)
    }
}
