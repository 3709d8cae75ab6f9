//! Core vector data structure.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SanadError};

/// A dense embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// The vector dimensions as floating point values.
    pub data: Vec<f32>,
}

impl Vector {
    /// Create a new vector with the given dimensions.
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensionality of this vector.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Calculate the L2 norm (magnitude) of this vector.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Normalize this vector to unit length.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.data {
                *value /= norm;
            }
        }
    }

    /// Get a normalized copy of this vector.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.normalize();
        normalized
    }

    /// Dot product with another vector of the same dimension.
    pub fn dot(&self, other: &Vector) -> Result<f32> {
        self.check_dimension(other)?;
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Cosine similarity with another vector.
    ///
    /// Returns 0.0 when either vector has zero norm, and an error when
    /// the dimensions differ.
    pub fn cosine_similarity(&self, other: &Vector) -> Result<f32> {
        let dot = self.dot(other)?;
        let norms = self.norm() * other.norm();
        if norms > 0.0 {
            Ok(dot / norms)
        } else {
            Ok(0.0)
        }
    }

    /// Check if this vector contains any NaN or infinite values.
    pub fn is_valid(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    fn check_dimension(&self, other: &Vector) -> Result<()> {
        if self.data.len() != other.data.len() {
            return Err(SanadError::InvalidOperation(format!(
                "Vector dimension mismatch: expected {}, got {}",
                self.data.len(),
                other.data.len()
            )));
        }
        Ok(())
    }
}
