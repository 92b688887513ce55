//! Binding algebra operations
//!
//! Implements binding, unbinding, fractional power and superposition for
//! holographic reduced representations (HRR) over real vectors.
//!
//! ## Operations
//!
//! - **Bind (⊛)**: Circular convolution - combines two pointers
//! - **Unbind**: Circular correlation - recovers one operand given the other
//! - **Power**: Fractional binding - `X^r` encodes a translation by `r`
//! - **Superpose (+)**: Vector sum - holds several bound pairs at once

use super::fft;
use super::pointer::SemanticPointer;
use crate::{Result, SspError};
use rustfft::num_complex::Complex64;

/// Magnitudes below this are treated as exactly zero
const MAGNITUDE_EPSILON: f64 = 1e-12;

fn ensure_same_dim(a: &SemanticPointer, b: &SemanticPointer) -> Result<()> {
    if a.dimension() != b.dimension() {
        return Err(SspError::DimensionMismatch {
            expected: a.dimension(),
            actual: b.dimension(),
        });
    }
    Ok(())
}

/// Bind two pointers via circular convolution
///
/// Computed as an elementwise product in the Fourier domain.
///
/// # Properties
/// - Associative: (a ⊛ b) ⊛ c = a ⊛ (b ⊛ c)
/// - Commutative: a ⊛ b = b ⊛ a
/// - Identity: a ⊛ I = a, where I is the unit impulse
///
/// # Example
/// ```rust,ignore
/// let located = bind(&cell_pointer, &vocab.lookup("KEY")?)?;
/// ```
pub fn bind(a: &SemanticPointer, b: &SemanticPointer) -> Result<SemanticPointer> {
    ensure_same_dim(a, b)?;

    let fa = fft::forward(a.as_slice());
    let fb = fft::forward(b.as_slice());
    let product: Vec<Complex64> = fa.iter().zip(fb.iter()).map(|(x, y)| x * y).collect();

    Ok(SemanticPointer::from_raw(fft::inverse_real(&product)))
}

/// Unbind via circular correlation
///
/// If `bound = a ⊛ b`, then `unbind(bound, a) ≈ b`. Exact when `a` is unitary.
pub fn unbind(bound: &SemanticPointer, key: &SemanticPointer) -> Result<SemanticPointer> {
    ensure_same_dim(bound, key)?;

    let fa = fft::forward(bound.as_slice());
    let fk = fft::forward(key.as_slice());
    let product: Vec<Complex64> = fa.iter().zip(fk.iter()).map(|(x, y)| x * y.conj()).collect();

    Ok(SemanticPointer::from_raw(fft::inverse_real(&product)))
}

/// Approximate inverse for unbinding
///
/// Index reversal keeping the first element: `[a0, a(n-1), ..., a1]`.
/// In the Fourier domain this is the complex conjugate.
pub fn involution(a: &SemanticPointer) -> SemanticPointer {
    let values = a.as_slice();
    let n = values.len();
    let mut inverse = vec![0.0; n];
    for (i, inv) in inverse.iter_mut().enumerate() {
        *inv = values[(n - i) % n];
    }
    SemanticPointer::from_raw(inverse)
}

/// Fractional binding power
///
/// Every Fourier component `|c|·e^{iθ}` becomes `|c|^r·e^{irθ}`. For unitary
/// pointers the magnitude stays 1, so `power(X, r)` has the same norm as `X`
/// and `power(X, a) ⊛ power(X, b) = power(X, a + b)`.
///
/// Components with zero magnitude stay zero for every exponent except 0.
pub fn power(a: &SemanticPointer, exponent: f64) -> SemanticPointer {
    let spectrum = fft::forward(a.as_slice());
    let powered: Vec<Complex64> = spectrum
        .iter()
        .map(|c| {
            let magnitude = c.norm();
            if exponent == 0.0 {
                Complex64::new(1.0, 0.0)
            } else if magnitude < MAGNITUDE_EPSILON {
                Complex64::new(0.0, 0.0)
            } else {
                Complex64::from_polar(magnitude.powf(exponent), c.arg() * exponent)
            }
        })
        .collect();

    SemanticPointer::from_raw(fft::inverse_real(&powered))
}

/// Superimpose two pointers (vector addition)
pub fn superpose(a: &SemanticPointer, b: &SemanticPointer) -> Result<SemanticPointer> {
    ensure_same_dim(a, b)?;
    let sum = a
        .as_slice()
        .iter()
        .zip(b.as_slice().iter())
        .map(|(x, y)| x + y)
        .collect();
    Ok(SemanticPointer::from_raw(sum))
}

/// Superimpose any number of pointers; an empty input yields the zero vector
pub fn superpose_all<'a, I>(pointers: I, dim: usize) -> Result<SemanticPointer>
where
    I: IntoIterator<Item = &'a SemanticPointer>,
{
    let mut acc = vec![0.0; dim];
    for pointer in pointers {
        if pointer.dimension() != dim {
            return Err(SspError::DimensionMismatch {
                expected: dim,
                actual: pointer.dimension(),
            });
        }
        for (a, v) in acc.iter_mut().zip(pointer.as_slice()) {
            *a += v;
        }
    }
    Ok(SemanticPointer::from_raw(acc))
}

/// Normalize to unit length
///
/// The zero vector normalizes to itself.
pub fn normalize(a: &SemanticPointer) -> SemanticPointer {
    let norm = a.norm();
    if norm < MAGNITUDE_EPSILON {
        return SemanticPointer::zeros(a.dimension());
    }
    SemanticPointer::from_raw(a.as_slice().iter().map(|v| v / norm).collect())
}

/// Normalized inner product, in [-1, 1]
///
/// Zero when either side is the zero vector.
pub fn similarity(a: &SemanticPointer, b: &SemanticPointer) -> Result<f64> {
    let dot = a.dot(b)?;
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a > MAGNITUDE_EPSILON && norm_b > MAGNITUDE_EPSILON {
        Ok(dot / (norm_a * norm_b))
    } else {
        Ok(0.0)
    }
}

/// Check that every Fourier component has unit magnitude
pub fn is_unitary(a: &SemanticPointer, tolerance: f64) -> bool {
    fft::forward(a.as_slice())
        .iter()
        .all(|c| (c.norm() - 1.0).abs() <= tolerance)
}
