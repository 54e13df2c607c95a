pub mod cross_entropy;
pub mod loss_type;
pub mod softmax_cross_entropy;
pub mod targets;

use tracing::debug;

use crate::error::Result;
use crate::math::matrix::Matrix;

pub use cross_entropy::CategoricalCrossEntropy;
pub use loss_type::{LossSpec, LossType};
pub use softmax_cross_entropy::{SoftmaxCategoricalCrossEntropy, SoftmaxCrossEntropyOutput};
pub use targets::Targets;

/// A differentiable loss over a batch of predictions.
///
/// Implementors supply the per-sample `forward` and the gradient
/// `backward`; `calculate` reduces `forward` to a single mean value.
pub trait Loss {
    /// One loss value per sample.
    fn forward(&self, y_pred: &Matrix, y_true: &Targets) -> Result<Vec<f64>>;

    /// Gradient of the mean loss w.r.t. `y_pred`; same shape as `y_pred`.
    fn backward(&self, y_pred: &Matrix, y_true: &Targets) -> Result<Matrix>;

    /// Mean of the per-sample losses.
    fn calculate(&self, y_pred: &Matrix, y_true: &Targets) -> Result<f64> {
        let sample_losses = self.forward(y_pred, y_true)?;
        let loss = mean(&sample_losses);
        debug!(samples = sample_losses.len(), loss, "mean loss");
        Ok(loss)
    }
}

/// Arithmetic mean of a non-empty slice.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
