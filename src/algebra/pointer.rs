//! Semantic pointer value type

use crate::primitives::{tensor_to_vector, vector_to_tensor};
use crate::{Device, Result, SspError, Tensor};
use serde::{Deserialize, Serialize};

/// Fixed-dimension real vector, treated as an immutable value.
///
/// Every algebra operation returns a fresh pointer; nothing mutates one in
/// place once it has been built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticPointer {
    data: Vec<f64>,
}

impl SemanticPointer {
    /// Wrap raw values, rejecting an empty vector
    pub fn new(data: Vec<f64>) -> Result<Self> {
        if data.is_empty() {
            return Err(SspError::Configuration(
                "Semantic pointer dimension must be positive".into(),
            ));
        }
        Ok(Self { data })
    }

    pub(crate) fn from_raw(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// The zero vector (`NULL`), absorbing "nothing" under superposition
    pub fn zeros(dim: usize) -> Self {
        Self { data: vec![0.0; dim] }
    }

    /// The binding identity: a unit impulse at index 0
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim];
        if let Some(first) = data.first_mut() {
            *first = 1.0;
        }
        Self { data }
    }

    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// L2 norm
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Plain inner product
    pub fn dot(&self, other: &SemanticPointer) -> Result<f64> {
        if self.dimension() != other.dimension() {
            return Err(SspError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(self.data.iter().zip(other.data.iter()).map(|(a, b)| a * b).sum())
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Export as a rank-1 `f32` tensor
    pub fn to_tensor(&self, device: &Device) -> Result<Tensor> {
        vector_to_tensor(&self.data, device)
    }

    /// Import from a rank-1 tensor
    pub fn from_tensor(tensor: &Tensor) -> Result<Self> {
        Self::new(tensor_to_vector(tensor)?)
    }
}

impl AsRef<[f64]> for SemanticPointer {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}
