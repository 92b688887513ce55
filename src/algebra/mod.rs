//! # Spatial Binding Algebra
//!
//! Vector-symbolic operations over real semantic pointers. Binding is
//! circular convolution, so a unitary pointer raised to a real power encodes
//! a continuous displacement: `X^a ⊛ X^b = X^(a+b)`. That additivity is what
//! lets a pair of basis vectors encode 2-D coordinates.
//!
//! ## Key Concepts
//!
//! - **Bind (⊛)**: Circular convolution, commutative and associative
//! - **Unbind**: Circular correlation, the approximate inverse of bind
//! - **Power**: Phase scaling in the Fourier domain, magnitude held
//! - **Superpose (+)**: Addition, the bag-of-pairs operator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ssp_minigrid::algebra::*;
//!
//! let here = bind(&power(&x, 2.0), &power(&y, -1.0))?;
//! let memory = superpose(&bind(&here, &key)?, &bind(&there, &ball)?)?;
//! let what_is_here = unbind(&memory, &here)?;
//! ```
//!
//! ## Reference
//!
//! Tony Plate, "Holographic Reduced Representations" (1995);
//! Komer et al., "A neural representation of continuous space using
//! fractional binding" (2019)

mod fft;
pub mod ops;
mod pointer;

pub use ops::{
    bind, involution, is_unitary, normalize, power, similarity, superpose, superpose_all, unbind,
};
pub use pointer::SemanticPointer;

pub(crate) use fft::{forward as spectrum, inverse_real as from_spectrum};

use crate::Result;

/// Operations a binding algebra must expose.
///
/// `HrrAlgebra` is the only implementation; the trait pins down the contract
/// the encoders rely on.
pub trait Algebra {
    fn bind(&self, a: &SemanticPointer, b: &SemanticPointer) -> Result<SemanticPointer>;

    fn unbind(&self, bound: &SemanticPointer, key: &SemanticPointer) -> Result<SemanticPointer>;

    fn power(&self, a: &SemanticPointer, exponent: f64) -> SemanticPointer;

    /// Element `I` with `bind(a, I) == a`
    fn identity_element(&self, dim: usize) -> SemanticPointer;

    fn zero_element(&self, dim: usize) -> SemanticPointer {
        SemanticPointer::zeros(dim)
    }

    fn superpose(&self, a: &SemanticPointer, b: &SemanticPointer) -> Result<SemanticPointer> {
        ops::superpose(a, b)
    }

    fn normalize(&self, a: &SemanticPointer) -> SemanticPointer {
        ops::normalize(a)
    }

    fn similarity(&self, a: &SemanticPointer, b: &SemanticPointer) -> Result<f64> {
        ops::similarity(a, b)
    }
}

/// Circular-convolution algebra
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HrrAlgebra;

impl Algebra for HrrAlgebra {
    fn bind(&self, a: &SemanticPointer, b: &SemanticPointer) -> Result<SemanticPointer> {
        ops::bind(a, b)
    }

    fn unbind(&self, bound: &SemanticPointer, key: &SemanticPointer) -> Result<SemanticPointer> {
        ops::unbind(bound, key)
    }

    fn power(&self, a: &SemanticPointer, exponent: f64) -> SemanticPointer {
        ops::power(a, exponent)
    }

    fn identity_element(&self, dim: usize) -> SemanticPointer {
        SemanticPointer::identity(dim)
    }
}
