use serde::{Serialize, Deserialize};

use crate::error::{LossError, Result};
use crate::math::matrix::Matrix;

/// A row-wise activation: maps an `N × C` score matrix to an `N × C` output.
pub trait Activation {
    fn forward(&self, inputs: &Matrix) -> Matrix;
}

/// Softmax is a vector-valued activation: each row of raw scores becomes a
/// probability distribution summing to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Softmax;

impl Softmax {
    pub fn new() -> Softmax {
        Softmax
    }

    /// Backward pass through the full softmax Jacobian.
    ///
    /// For each row with output `s`, `J = diag(s) - s·sᵀ` and the returned
    /// row is `J · dvalues_row`. `outputs` must be this activation's forward
    /// result for the same batch; a row or column count that differs from
    /// `dvalues` is an error.
    pub fn backward(&self, dvalues: &Matrix, outputs: &Matrix) -> Result<Matrix> {
        if dvalues.rows != outputs.rows {
            return Err(LossError::SampleCountMismatch {
                predictions: outputs.rows,
                targets: dvalues.rows,
            });
        }
        if dvalues.cols != outputs.cols {
            return Err(LossError::ClassCountMismatch {
                expected: outputs.cols,
                actual: dvalues.cols,
            });
        }

        let data = outputs.data.iter().zip(dvalues.data.iter())
            .map(|(s, dv)| {
                // J·dv = s ⊙ dv - s·(sᵀ·dv)
                let dot: f64 = s.iter().zip(dv.iter()).map(|(a, b)| a * b).sum();
                s.iter().zip(dv.iter()).map(|(si, di)| si * di - si * dot).collect()
            })
            .collect();
        Ok(Matrix { rows: outputs.rows, cols: outputs.cols, data })
    }
}

impl Activation for Softmax {
    /// Subtracts the row maximum before exponentiating so large logits do
    /// not overflow.
    fn forward(&self, inputs: &Matrix) -> Matrix {
        let data = inputs.data.iter()
            .map(|row| {
                let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let exps: Vec<f64> = row.iter().map(|x| (x - max).exp()).collect();
                let sum: f64 = exps.iter().sum();
                exps.into_iter().map(|e| e / sum).collect()
            })
            .collect();
        Matrix {
            rows: inputs.rows,
            cols: inputs.cols,
            data
        }
    }
}
