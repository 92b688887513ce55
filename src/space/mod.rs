//! # Observation Space
//!
//! Declares the shape of encoded images for downstream learners and draws
//! random points from it.
//!
//! `sample` picks `(x, y)` uniformly in `[-radius, radius]²` and encodes it
//! with the shared basis. `contains` only checks the dimension: a pointer of
//! the right size is accepted even if it is not exactly `X^x ⊛ Y^y` for any
//! `(x, y)`.

use crate::algebra::SemanticPointer;
use crate::basis::BasisPair;
use crate::{Result, SspError, Tensor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SspSpace {
    basis: Arc<BasisPair>,
    radius: f64,
    rng: ChaCha8Rng,
}

impl SspSpace {
    pub fn new(basis: Arc<BasisPair>, radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SspError::Configuration(format!(
                "Space radius must be positive and finite, got {}",
                radius
            )));
        }
        Ok(Self {
            basis,
            radius,
            rng: ChaCha8Rng::seed_from_u64(rand::random()),
        })
    }

    /// Reseed the sampler for reproducible draws
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// One pointer for a uniformly drawn coordinate
    pub fn sample(&mut self) -> SemanticPointer {
        let x = self.rng.gen_range(-self.radius..=self.radius);
        let y = self.rng.gen_range(-self.radius..=self.radius);
        self.basis.encode_point(x, y)
    }

    pub fn samples(&mut self, n: usize) -> Vec<SemanticPointer> {
        (0..n).map(|_| self.sample()).collect()
    }

    pub fn contains(&self, pointer: &SemanticPointer) -> bool {
        pointer.dimension() == self.dimension()
    }

    /// Rank-1 tensors of length `d`
    pub fn contains_tensor(&self, tensor: &Tensor) -> bool {
        tensor.dims() == [self.dimension()]
    }

    pub fn dimension(&self) -> usize {
        self.basis.dimension()
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn shape(&self) -> [usize; 1] {
        [self.dimension()]
    }

    pub fn basis(&self) -> &Arc<BasisPair> {
        &self.basis
    }
}
