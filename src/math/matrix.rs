use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::ops::{Div, Neg};

/// Row-major `rows × cols` matrix. Rows are samples, columns are classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// `n × n` identity; row `i` is the one-hot encoding of class `i`.
    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Uniform samples in [-1, 1) from the thread-local RNG.
    pub fn random(rows: usize, cols: usize) -> Matrix {
        Matrix::random_with(&mut rand::thread_rng(), rows, cols)
    }

    /// Uniform samples in [-1, 1) from a caller-supplied RNG, so seeded
    /// generators give reproducible matrices.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }

        res
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    /// Clamps every element into `[lo, hi]`.
    pub fn clip(&self, lo: f64, hi: f64) -> Matrix {
        self.map(|x| x.clamp(lo, hi))
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.shape(), rhs.shape(), "Matrices are of incorrect sizes");
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
            })
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.iter().sum()).collect()
    }

    /// Column index of the largest value in each row. Ties go to the
    /// lowest index; an empty row maps to 0.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
                        Some((_, b)) if !(x > b) => best,
                        _ => Some((i, x)),
                    })
                    .map_or(0, |(i, _)| i)
            })
            .collect()
    }

    /// Gathers the given rows into a new matrix, in order. Panics on an
    /// out-of-range index.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect()
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Element-wise quotient. IEEE semantics apply: `x / 0.0` is `±inf` and
/// `0.0 / 0.0` is `NaN`.
impl Div for Matrix {
    type Output = Matrix;

    fn div(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] / rhs.data[i][j];
            }
        }

        res
    }
}

impl Div<f64> for Matrix {
    type Output = Matrix;

    fn div(self, rhs: f64) -> Self::Output {
        self.map(|x| x / rhs)
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}
