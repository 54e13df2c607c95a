use serde::{Serialize, Deserialize};

use crate::error::{LossError, Result};
use crate::math::matrix::Matrix;

/// Ground-truth labels for a batch.
///
/// - `Sparse` — one class index per sample.
/// - `Dense`  — one-hot (or soft) distributions, same shape as the
///   predictions.
///
/// The variant is fixed when the targets are built, so losses match on it
/// instead of re-inspecting dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Targets {
    Sparse(Vec<usize>),
    Dense(Matrix),
}

impl Targets {
    /// Number of samples the targets describe.
    pub fn len(&self) -> usize {
        match self {
            Targets::Sparse(indices) => indices.len(),
            Targets::Dense(matrix) => matrix.rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Targets::Sparse(_))
    }

    /// Checks the targets against an `N × C` prediction matrix. Every row
    /// of `y_pred` (and of dense targets) must hold exactly `C > 0` values.
    pub fn validate(&self, y_pred: &Matrix) -> Result<()> {
        if y_pred.is_empty() {
            return Err(LossError::EmptyBatch);
        }
        if y_pred.cols == 0 {
            return Err(LossError::NoClasses);
        }
        if let Some(actual) = ragged_row(y_pred) {
            return Err(LossError::ClassCountMismatch {
                expected: y_pred.cols,
                actual,
            });
        }
        if self.len() != y_pred.rows {
            return Err(LossError::SampleCountMismatch {
                predictions: y_pred.rows,
                targets: self.len(),
            });
        }
        match self {
            Targets::Sparse(indices) => {
                if let Some((sample, &index)) = indices.iter()
                    .enumerate()
                    .find(|&(_, &index)| index >= y_pred.cols)
                {
                    return Err(LossError::ClassIndexOutOfRange {
                        sample,
                        index,
                        classes: y_pred.cols,
                    });
                }
            }
            Targets::Dense(matrix) => {
                let actual = ragged_row(matrix)
                    .or((matrix.cols != y_pred.cols).then_some(matrix.cols));
                if let Some(actual) = actual {
                    return Err(LossError::ClassCountMismatch {
                        expected: y_pred.cols,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// Dense form with `classes` columns. Sparse indices are expanded by
    /// looking up rows of the identity matrix.
    pub fn to_one_hot(&self, classes: usize) -> Matrix {
        match self {
            Targets::Sparse(indices) => Matrix::identity(classes).select_rows(indices),
            Targets::Dense(matrix) => matrix.clone(),
        }
    }

    /// Sparse form. Dense rows collapse to their argmax.
    pub fn to_indices(&self) -> Vec<usize> {
        match self {
            Targets::Sparse(indices) => indices.clone(),
            Targets::Dense(matrix) => matrix.argmax_rows(),
        }
    }
}

/// Length of the first row whose width differs from `matrix.cols`.
fn ragged_row(matrix: &Matrix) -> Option<usize> {
    matrix.data.iter()
        .map(|row| row.len())
        .find(|&len| len != matrix.cols)
}

impl From<Vec<usize>> for Targets {
    fn from(indices: Vec<usize>) -> Self {
        Targets::Sparse(indices)
    }
}

impl From<&[usize]> for Targets {
    fn from(indices: &[usize]) -> Self {
        Targets::Sparse(indices.to_vec())
    }
}

impl From<Matrix> for Targets {
    fn from(matrix: Matrix) -> Self {
        Targets::Dense(matrix)
    }
}

impl From<Vec<Vec<f64>>> for Targets {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Targets::Dense(Matrix::from_data(rows))
    }
}
