use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::loss::{Loss, Targets};
use crate::math::matrix::Matrix;

/// Default clip distance from 0 and 1 applied to predictions in `forward`.
pub const DEFAULT_EPSILON: f64 = 1e-7;

/// Categorical cross-entropy over probability predictions (e.g. Softmax
/// output).
///
/// Forward clips predictions into `[ε, 1 − ε]` so a zero probability cannot
/// produce an infinite loss. Backward works on the raw predictions: an
/// exact 0 on a target column gives a non-finite gradient entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoricalCrossEntropy {
    epsilon: f64,
}

impl Default for CategoricalCrossEntropy {
    fn default() -> Self {
        CategoricalCrossEntropy { epsilon: DEFAULT_EPSILON }
    }
}

impl CategoricalCrossEntropy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the clip distance used by `forward`.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Loss for CategoricalCrossEntropy {
    /// Per-sample loss:
    ///   sparse: L_i = -log(p_clipped[i][y_i])
    ///   dense:  L_i = -sum_j(y[i][j] * log(p_clipped[i][j]))
    ///
    /// Both forms agree when the dense targets are one-hot.
    fn forward(&self, y_pred: &Matrix, y_true: &Targets) -> Result<Vec<f64>> {
        y_true.validate(y_pred)?;
        debug!(
            samples = y_pred.rows,
            classes = y_pred.cols,
            sparse = y_true.is_sparse(),
            "cross-entropy forward"
        );

        let clipped = y_pred.clip(self.epsilon, 1.0 - self.epsilon);

        let losses = match y_true {
            Targets::Sparse(indices) => indices.iter()
                .enumerate()
                .map(|(i, &class)| -clipped.data[i][class].ln())
                .collect(),
            Targets::Dense(expected) => clipped
                .map(f64::ln)
                .hadamard(expected)
                .row_sums()
                .into_iter()
                .map(|s| -s)
                .collect(),
        };

        Ok(losses)
    }

    /// Gradient w.r.t. the predictions:
    ///   ∂L/∂p[i][j] = -y[i][j] / p[i][j] / N
    ///
    /// Sparse targets are expanded to one-hot first. Predictions are not
    /// clipped here.
    fn backward(&self, y_pred: &Matrix, y_true: &Targets) -> Result<Matrix> {
        y_true.validate(y_pred)?;
        let samples = y_pred.rows as f64;
        debug!(
            samples = y_pred.rows,
            classes = y_pred.cols,
            sparse = y_true.is_sparse(),
            "cross-entropy backward"
        );

        let expected = y_true.to_one_hot(y_pred.cols);
        let dinputs = -expected / y_pred.clone() / samples;

        let non_finite = dinputs.data.iter().flatten().filter(|x| !x.is_finite()).count();
        if non_finite > 0 {
            warn!(non_finite, "cross-entropy gradient has non-finite entries; predictions contain zeros");
        }

        Ok(dinputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preds() -> Matrix {
        Matrix::from_data(vec![
            vec![0.7, 0.2, 0.1],
            vec![0.1, 0.5, 0.4],
        ])
    }

    #[test]
    fn sparse_forward_matches_manual() {
        let losses = CategoricalCrossEntropy::new()
            .forward(&preds(), &Targets::from(vec![0, 1]))
            .unwrap();
        assert!((losses[0] - 0.356_674_9).abs() < 1e-6);
        assert!((losses[1] - 0.693_147_2).abs() < 1e-6);
    }

    #[test]
    fn calculate_is_mean_of_forward() {
        let loss = CategoricalCrossEntropy::new();
        let targets = Targets::from(vec![0, 1]);
        let losses = loss.forward(&preds(), &targets).unwrap();
        let mean = loss.calculate(&preds(), &targets).unwrap();
        assert!((mean - (losses[0] + losses[1]) / 2.0).abs() < 1e-12);
        assert!((mean - 0.524_911).abs() < 1e-6);
    }

    #[test]
    fn soft_targets_weight_every_class() {
        let y_pred = Matrix::from_data(vec![vec![0.5, 0.25, 0.25]]);
        let y_true = Targets::from(vec![vec![0.5, 0.5, 0.0]]);
        let losses = CategoricalCrossEntropy::new().forward(&y_pred, &y_true).unwrap();
        let expected = -(0.5 * 0.5f64.ln() + 0.5 * 0.25f64.ln());
        assert!((losses[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn perfect_prediction_is_clipped_not_zero() {
        let y_pred = Matrix::from_data(vec![vec![1.0, 0.0, 0.0]]);
        let losses = CategoricalCrossEntropy::new()
            .forward(&y_pred, &Targets::from(vec![0]))
            .unwrap();
        let expected = -(1.0 - DEFAULT_EPSILON).ln();
        assert!(losses[0] > 0.0);
        assert!((losses[0] - expected).abs() < 1e-15);
        assert!((losses[0] - 1e-7).abs() < 1e-12);
    }

    #[test]
    fn zero_prediction_on_target_is_bounded_by_clip() {
        let y_pred = Matrix::from_data(vec![vec![0.0, 1.0]]);
        let losses = CategoricalCrossEntropy::new()
            .forward(&y_pred, &Targets::from(vec![0]))
            .unwrap();
        assert!((losses[0] - -(DEFAULT_EPSILON.ln())).abs() < 1e-9);
    }

    #[test]
    fn custom_epsilon_changes_clip() {
        let y_pred = Matrix::from_data(vec![vec![0.0, 1.0]]);
        let loss = CategoricalCrossEntropy::new().with_epsilon(1e-3);
        assert_eq!(loss.epsilon(), 1e-3);
        let losses = loss.forward(&y_pred, &Targets::from(vec![0])).unwrap();
        assert!((losses[0] - -(1e-3f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn backward_divides_target_by_prediction() {
        let dinputs = CategoricalCrossEntropy::new()
            .backward(&preds(), &Targets::from(vec![0, 1]))
            .unwrap();
        assert_eq!(dinputs.shape(), (2, 3));
        assert!((dinputs.data[0][0] - -1.0 / 0.7 / 2.0).abs() < 1e-12);
        assert!((dinputs.data[1][1] - -1.0 / 0.5 / 2.0).abs() < 1e-12);
        assert_eq!(dinputs.data[0][1], 0.0);
        assert_eq!(dinputs.data[1][2], 0.0);
    }

    #[test]
    fn backward_does_not_clip() {
        let y_pred = Matrix::from_data(vec![vec![0.0, 1.0], vec![0.5, 0.5]]);
        let dinputs = CategoricalCrossEntropy::new()
            .backward(&y_pred, &Targets::from(vec![0, 0]))
            .unwrap();
        assert!(dinputs.data[0][0].is_infinite() && dinputs.data[0][0] < 0.0);
        assert!((dinputs.data[1][0] - -1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_prediction_off_target_is_nan() {
        let y_pred = Matrix::from_data(vec![vec![1.0, 0.0]]);
        let dinputs = CategoricalCrossEntropy::new()
            .backward(&y_pred, &Targets::from(vec![0]))
            .unwrap();
        assert!(dinputs.data[0][1].is_nan());
    }

    #[test]
    fn shape_errors_propagate_through_calculate() {
        let err = CategoricalCrossEntropy::new()
            .calculate(&preds(), &Targets::from(vec![0, 1, 2]))
            .unwrap_err();
        assert_eq!(
            err,
            crate::error::LossError::SampleCountMismatch { predictions: 2, targets: 3 }
        );
    }

    #[test]
    fn ragged_dense_targets_are_rejected_not_truncated() {
        let y_true = Targets::from(vec![vec![0.0, 0.0, 1.0], vec![1.0]]);
        let loss = CategoricalCrossEntropy::new();
        let want = crate::error::LossError::ClassCountMismatch { expected: 3, actual: 1 };
        assert_eq!(loss.forward(&preds(), &y_true).unwrap_err(), want);
        assert_eq!(loss.backward(&preds(), &y_true).unwrap_err(), want);
    }

    #[test]
    fn empty_batch_is_an_error() {
        let err = CategoricalCrossEntropy::new()
            .calculate(&Matrix::default(), &Targets::from(Vec::<usize>::new()))
            .unwrap_err();
        assert_eq!(err, crate::error::LossError::EmptyBatch);
    }
}
