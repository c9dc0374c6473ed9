use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, DivAssign};

/// A fixed-dimension embedding vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    // Largest absolute component, 0.0 for an empty or all-zero vector
    fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
    }

    /// True when every component is exactly zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|x| *x == 0.0)
    }

    /// Compute cosine similarity with another vector.
    ///
    /// Returns 0.0 when either vector has zero norm. The result is always within
    /// [-1, 1], including for components large or small enough that their squares
    /// leave the f64 range.
    ///
    /// # Panics
    /// Panics if the dimensions differ. Sanitized vectors always share the
    /// configured dimension, so a mismatch here is a bug upstream.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f64 {
        assert_eq!(self.dim(), other.dim(), "cosine over vectors of different dimension");

        let sq_a = self.dot(self);
        let sq_b = other.dot(other);
        let dot = self.dot(other);

        let sim = if sq_a.is_normal() && sq_b.is_normal() && dot.is_finite() {
            dot / (sq_a.sqrt() * sq_b.sqrt())
        } else {
            self.scaled_cosine(other)
        };

        if sim.is_nan() {
            0.0
        } else {
            sim.clamp(-1.0, 1.0)
        }
    }

    // Overflow/underflow path: divide each side by its largest component first.
    fn scaled_cosine(&self, other: &Vector) -> f64 {
        let scale_a = self.max_abs();
        let scale_b = other.max_abs();
        if scale_a == 0.0 || scale_b == 0.0 || !scale_a.is_finite() || !scale_b.is_finite() {
            return 0.0;
        }

        let (mut dot, mut sq_a, mut sq_b) = (0.0_f64, 0.0_f64, 0.0_f64);
        for (a, b) in self.data.iter().zip(other.data.iter()) {
            let a = a / scale_a;
            let b = b / scale_b;
            dot += a * b;
            sq_a += a * a;
            sq_b += b * b;
        }
        dot / (sq_a * sq_b).sqrt()
    }
}

impl AddAssign<&Vector> for Vector {
    fn add_assign(&mut self, other: &Vector) {
        assert_eq!(self.dim(), other.dim());
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
    }
}

impl DivAssign<f64> for Vector {
    fn div_assign(&mut self, divisor: f64) {
        for x in &mut self.data {
            *x /= divisor;
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}
