//! # Basis Vector Space
//!
//! The pair of unitary basis vectors `(X, Y)` that spans the two spatial
//! axes. A continuous coordinate `(x, y)` is encoded as `X^x ⊛ Y^y`.
//!
//! Unitarity (every Fourier component has magnitude 1) is what makes
//! fractional powers norm-preserving and additive. Conjugate symmetry of the
//! spectrum keeps every power real-valued.
//!
//! A `BasisPair` is built once and shared by `Arc` between every encoder,
//! table and space that must agree on the same coordinate frame.

use crate::algebra::{from_spectrum, spectrum, SemanticPointer};
use crate::{Result, SspError};
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustfft::num_complex::Complex64;
use sha2::{Digest, Sha256};
use std::f64::consts::PI;

/// Allowed deviation of a Fourier magnitude from 1
pub const UNITARY_TOLERANCE: f64 = 1e-6;

/// Magnitudes below this mark a degenerate component
const DEGENERATE_MAGNITUDE: f64 = 1e-8;

/// Draw conjugate-symmetric Fourier phases for a real unitary vector.
///
/// DC (and Nyquist, for even `dim`) stay at phase 0 so that every fractional
/// power remains real.
fn unitary_phases<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Vec<f64> {
    let mut phases = vec![0.0; dim];
    for k in 1..(dim + 1) / 2 {
        let phase = rng.gen_range(-PI..PI);
        phases[k] = phase;
        phases[dim - k] = -phase;
    }
    phases
}

fn phases_to_pointer(phases: &[f64]) -> SemanticPointer {
    let spectrum: Vec<Complex64> = phases.iter().map(|&p| Complex64::from_polar(1.0, p)).collect();
    SemanticPointer::from_raw(from_spectrum(&spectrum))
}

/// Draw one random real unitary vector
pub fn unitary_vector<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> SemanticPointer {
    phases_to_pointer(&unitary_phases(dim, rng))
}

/// Validate a supplied axis vector and return its Fourier phases
fn axis_phases(axis: &str, v: &SemanticPointer) -> Result<Vec<f64>> {
    let mut phases = Vec::with_capacity(v.dimension());
    for (k, c) in spectrum(v.as_slice()).iter().enumerate() {
        let magnitude = c.norm();
        if magnitude < DEGENERATE_MAGNITUDE {
            return Err(SspError::Configuration(format!(
                "Basis vector {} has a degenerate Fourier component at frequency {}",
                axis, k
            )));
        }
        if (magnitude - 1.0).abs() > UNITARY_TOLERANCE {
            return Err(SspError::Configuration(format!(
                "Basis vector {} is not unitary: |F[{}]| = {:.6}",
                axis, k, magnitude
            )));
        }
        phases.push(c.arg());
    }
    Ok(phases)
}

/// Unitary basis pair for the two spatial axes
#[derive(Debug, Clone)]
pub struct BasisPair {
    x: SemanticPointer,
    y: SemanticPointer,
    phases_x: Vec<f64>,
    phases_y: Vec<f64>,
    fingerprint: String,
}

impl BasisPair {
    /// Generate a random unitary pair of dimension `dim`
    pub fn generate<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Result<Self> {
        if dim == 0 {
            return Err(SspError::Configuration(
                "Basis dimension must be positive".into(),
            ));
        }
        let phases_x = unitary_phases(dim, rng);
        let phases_y = unitary_phases(dim, rng);
        Ok(Self::assemble(
            phases_to_pointer(&phases_x),
            phases_to_pointer(&phases_y),
            phases_x,
            phases_y,
        ))
    }

    /// Deterministic pair from a seed
    pub fn from_seed(dim: usize, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::generate(dim, &mut rng)
    }

    /// Wrap caller-supplied axis vectors after validating them
    ///
    /// Fails with a configuration error on zero dimension, mismatched
    /// dimensions, degenerate (zero-magnitude) components or non-unitary
    /// spectra.
    pub fn from_vectors(x: SemanticPointer, y: SemanticPointer) -> Result<Self> {
        if x.dimension() == 0 {
            return Err(SspError::Configuration(
                "Basis dimension must be positive".into(),
            ));
        }
        if x.dimension() != y.dimension() {
            return Err(SspError::Configuration(format!(
                "Basis dimension mismatch: X has {}, Y has {}",
                x.dimension(),
                y.dimension()
            )));
        }
        let phases_x = axis_phases("X", &x)?;
        let phases_y = axis_phases("Y", &y)?;
        Ok(Self::assemble(x, y, phases_x, phases_y))
    }

    fn assemble(
        x: SemanticPointer,
        y: SemanticPointer,
        phases_x: Vec<f64>,
        phases_y: Vec<f64>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((x.dimension() as u64).to_le_bytes());
        for v in x.as_slice().iter().chain(y.as_slice()) {
            hasher.update(v.to_le_bytes());
        }
        let fingerprint = format!("{:x}", hasher.finalize());

        Self {
            x,
            y,
            phases_x,
            phases_y,
            fingerprint,
        }
    }

    pub fn dimension(&self) -> usize {
        self.x.dimension()
    }

    pub fn x(&self) -> &SemanticPointer {
        &self.x
    }

    pub fn y(&self) -> &SemanticPointer {
        &self.y
    }

    /// SHA-256 of the basis contents, used as its identity in cache keys
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fourier spectrum of `X^x ⊛ Y^y`
    pub(crate) fn point_spectrum(&self, x: f64, y: f64) -> Vec<Complex64> {
        self.phases_x
            .iter()
            .zip(self.phases_y.iter())
            .map(|(px, py)| Complex64::from_polar(1.0, x * px + y * py))
            .collect()
    }

    pub(crate) fn phases(&self) -> (&[f64], &[f64]) {
        (&self.phases_x, &self.phases_y)
    }

    /// Encode a continuous coordinate: `X^x ⊛ Y^y`
    pub fn encode_point(&self, x: f64, y: f64) -> SemanticPointer {
        SemanticPointer::from_raw(from_spectrum(&self.point_spectrum(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{bind, is_unitary, power, similarity};

    #[test]
    fn test_generate_is_unitary() {
        for dim in [1, 2, 7, 64, 255, 256] {
            let basis = BasisPair::from_seed(dim, 3).unwrap();
            assert_eq!(basis.dimension(), dim);
            assert!(is_unitary(basis.x(), 1e-9), "X not unitary for d={}", dim);
            assert!(is_unitary(basis.y(), 1e-9), "Y not unitary for d={}", dim);
        }
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            BasisPair::from_seed(0, 1),
            Err(SspError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_seed_deterministic() {
        let a = BasisPair::from_seed(128, 42).unwrap();
        let b = BasisPair::from_seed(128, 42).unwrap();
        let c = BasisPair::from_seed(128, 43).unwrap();

        assert_eq!(a.x(), b.x());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_from_vectors_accepts_generated() {
        let generated = BasisPair::from_seed(96, 5).unwrap();
        let rebuilt = BasisPair::from_vectors(generated.x().clone(), generated.y().clone()).unwrap();
        assert_eq!(rebuilt.fingerprint(), generated.fingerprint());

        let p1 = generated.encode_point(1.5, -2.0);
        let p2 = rebuilt.encode_point(1.5, -2.0);
        assert!(similarity(&p1, &p2).unwrap() > 1.0 - 1e-9);
    }

    #[test]
    fn test_from_vectors_dimension_mismatch() {
        let a = BasisPair::from_seed(32, 1).unwrap();
        let b = BasisPair::from_seed(64, 1).unwrap();
        let err = BasisPair::from_vectors(a.x().clone(), b.y().clone()).unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_from_vectors_rejects_non_unitary() {
        let x = SemanticPointer::new(vec![1.0, 0.5, 0.25, 0.0]).unwrap();
        let y = SemanticPointer::identity(4);
        let err = BasisPair::from_vectors(x, y).unwrap_err();
        assert!(err.to_string().contains("not unitary"));
    }

    #[test]
    fn test_from_vectors_rejects_degenerate() {
        // All-ones has a single non-zero Fourier component
        let x = SemanticPointer::new(vec![0.25; 4]).unwrap();
        let y = SemanticPointer::identity(4);
        let err = BasisPair::from_vectors(x, y).unwrap_err();
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn test_encode_point_matches_powers() {
        let basis = BasisPair::from_seed(128, 9).unwrap();
        for &(x, y) in &[(0.0, 0.0), (1.0, 2.0), (-3.5, 0.25), (6.0, -4.0)] {
            let direct = basis.encode_point(x, y);
            let composed = bind(&power(basis.x(), x), &power(basis.y(), y)).unwrap();
            for (a, b) in direct.as_slice().iter().zip(composed.as_slice()) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_encode_point_is_unit_norm() {
        let basis = BasisPair::from_seed(256, 10).unwrap();
        let p = basis.encode_point(2.3, -1.7);
        assert!((p.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearby_points_are_similar() {
        let basis = BasisPair::from_seed(512, 11).unwrap();
        let origin = basis.encode_point(0.0, 0.0);
        let near = basis.encode_point(0.1, 0.0);
        let far = basis.encode_point(5.0, 5.0);

        let sim_near = similarity(&origin, &near).unwrap();
        let sim_far = similarity(&origin, &far).unwrap();
        assert!(sim_near > 0.9);
        assert!(sim_near > sim_far);
    }
}
