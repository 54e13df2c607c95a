use crate::error::Result;
use crate::loss::Targets;
use crate::math::matrix::Matrix;

/// Fraction of samples whose highest-probability class matches the target
/// class, in [0, 1]. Dense targets are compared by their argmax.
pub fn accuracy(y_pred: &Matrix, y_true: &Targets) -> Result<f64> {
    y_true.validate(y_pred)?;
    let correct = y_pred.argmax_rows()
        .into_iter()
        .zip(y_true.to_indices())
        .filter(|(predicted, expected)| predicted == expected)
        .count();
    Ok(correct as f64 / y_pred.rows as f64)
}
