//! Dense row-major f64 matrix used as the weight storage of a genome.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chance that a mutated cell is re-drawn from scratch instead of nudged.
const FULL_RESET_CHANCE: f64 = 0.1;
/// Divisor applied to Gaussian noise when nudging a weight.
const NOISE_SCALE: f64 = 5.0;

/// Dense 2-D buffer of `f64` weights.
///
/// Operations return fresh matrices; only `randomize` and `mutate` work
/// in place. Dimension mismatches are programmer errors and panic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Matrix {
    /// Zero-filled matrix of the given shape.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from row-major values, validating the length.
    pub fn from_vec(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, crate::BrainError> {
        if values.len() != rows * cols {
            return Err(crate::BrainError::BadShape {
                rows,
                cols,
                len: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Wrap a slice as a single-column matrix.
    #[must_use]
    pub fn from_column(column: &[f64]) -> Self {
        Self {
            rows: column.len(),
            cols: 1,
            values: column.to_vec(),
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.cols + col] = value;
    }

    /// Row-major view of the raw values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Flatten into a row-major vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    /// Fill every cell with a uniform draw from [-1, 1].
    pub fn randomize(&mut self, rng: &mut SmallRng) {
        for value in &mut self.values {
            *value = rng.random_range(-1.0..1.0);
        }
    }

    /// Standard matrix product. Inner dimensions must agree.
    #[must_use]
    pub fn dot(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.rows,
            "dot: inner dimensions mismatch ({}x{} . {}x{})",
            self.rows, self.cols, other.rows, other.cols
        );
        let mut result = Matrix::new(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.get(i, k) * other.get(k, j);
                }
                result.set(i, j, sum);
            }
        }
        result
    }

    /// Append a trailing bias row fixed at 1.0 to a single-column matrix.
    #[must_use]
    pub fn add_bias(&self) -> Matrix {
        assert_eq!(self.cols, 1, "add_bias requires a single-column matrix");
        let mut values = Vec::with_capacity(self.rows + 1);
        values.extend_from_slice(&self.values);
        values.push(1.0);
        Matrix {
            rows: self.rows + 1,
            cols: 1,
            values,
        }
    }

    /// Elementwise `max(0, x)`.
    #[must_use]
    pub fn activate_relu(&self) -> Matrix {
        let values = self.values.iter().map(|v| v.max(0.0)).collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            values,
        }
    }

    /// Numerically stabilized softmax over all cells.
    #[must_use]
    pub fn softmax(&self) -> Matrix {
        let max = self
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = self.values.iter().map(|v| (v - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        let values = exps.into_iter().map(|v| v / sum).collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            values,
        }
    }

    /// Mutate each cell with probability `rate`: a small fraction of hits
    /// re-draw the weight uniformly, the rest add scaled Gaussian noise
    /// clamped back into [-1, 1].
    pub fn mutate(&mut self, rate: f64, rng: &mut SmallRng) {
        for value in &mut self.values {
            if rng.random::<f64>() >= rate {
                continue;
            }
            if rng.random::<f64>() < FULL_RESET_CHANCE {
                *value = rng.random_range(-1.0..1.0);
            } else {
                *value = (*value + gaussian(rng) / NOISE_SCALE).clamp(-1.0, 1.0);
            }
        }
    }

    /// Single-point crossover over the flattened row-major cell order:
    /// cells up to and including a random cut point come from `self`,
    /// the rest from `partner`.
    #[must_use]
    pub fn crossover(&self, partner: &Matrix, rng: &mut SmallRng) -> Matrix {
        assert_eq!(self.rows, partner.rows, "crossover: row count mismatch");
        assert_eq!(self.cols, partner.cols, "crossover: column count mismatch");
        let cut_row = rng.random_range(0..self.rows);
        let cut_col = rng.random_range(0..self.cols);
        let mut child = Matrix::new(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                let value = if i < cut_row || (i == cut_row && j <= cut_col) {
                    self.get(i, j)
                } else {
                    partner.get(i, j)
                };
                child.set(i, j, value);
            }
        }
        child
    }
}

/// Standard normal draw via Box-Muller.
fn gaussian(rng: &mut SmallRng) -> f64 {
    let u1 = rng.random::<f64>().clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
