pub mod error;
pub mod math;
pub mod activation;
pub mod loss;
pub mod metrics;

// Convenience re-exports
pub use error::{LossError, Result};
pub use math::matrix::Matrix;
pub use activation::softmax::{Activation, Softmax};
pub use loss::{
    CategoricalCrossEntropy, Loss, LossSpec, LossType, SoftmaxCategoricalCrossEntropy,
    SoftmaxCrossEntropyOutput, Targets,
};
pub use metrics::accuracy::accuracy;
