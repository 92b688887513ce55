//! # Reconstruction Lookup Table
//!
//! Precomputed, spatially smoothed position pointers, one per relative cell
//! of the agent's view. Each entry spreads a discrete cell across a band of
//! continuous offsets of width `delta`, so objects in neighbouring cells
//! produce overlapping (similar) pointers.
//!
//! ## Construction
//!
//! ```text
//! S_rec     = Σ_u Σ_v  X^u ⊛ Y^v        u ∈ linspace(0, δ, n)
//!                                         v ∈ linspace(-⌊δ/2⌋, ⌊δ/2⌋, n)
//! table[i,j] = normalize(S_rec ⊛ X^x(j) ⊛ Y^y(i))
//!
//! x(j) = (H − j − 0.5)·δ − ⌊δ/2⌋          forward distance
//! y(i) = (⌊W/2⌋ − i)·δ                    lateral offset
//! ```
//!
//! The table depends only on `(d, W, H, δ, n, basis)`. It is the most
//! expensive artifact in the pipeline, so it is built once and shared:
//!
//! - [`TableRegistry`]: in-process memo returning `Arc`s
//! - [`TableStore`]: safetensors files on disk

mod registry;
mod storage;

pub use registry::{TableKey, TableRegistry};
pub use storage::TableStore;

use crate::algebra::{from_spectrum, normalize, SemanticPointer};
use crate::basis::BasisPair;
use crate::primitives::rows_to_tensor;
use crate::{Device, Result, SspError, Tensor};
use rayon::prelude::*;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Shape and smoothing parameters of a reconstruction table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableParams {
    /// View width `W`
    pub width: usize,
    /// View height `H`
    pub height: usize,
    /// Band width of one cell in continuous coordinates
    pub delta: f64,
    /// Samples per axis across the band
    pub samples_per_axis: usize,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            width: 7,
            height: 7,
            delta: 2.0,
            samples_per_axis: 50,
        }
    }
}

impl TableParams {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SspError::Configuration(format!(
                "View must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(SspError::Configuration(format!(
                "delta must be positive and finite, got {}",
                self.delta
            )));
        }
        if self.samples_per_axis == 0 {
            return Err(SspError::Configuration(
                "samples_per_axis must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Nominal continuous position `(x, y)` of relative cell `(i, j)`
    pub fn cell_position(&self, i: usize, j: usize) -> (f64, f64) {
        let half_delta = (self.delta / 2.0).floor();
        let x = (self.height as f64 - j as f64 - 0.5) * self.delta - half_delta;
        let y = ((self.width / 2) as f64 - i as f64) * self.delta;
        (x, y)
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|k| start + step * k as f64).collect()
        }
    }
}

/// Fourier spectrum of `S_rec`.
///
/// The double sum over the band factorizes per frequency into
/// `(Σ_u e^{iuθx}) · (Σ_v e^{ivθy})`.
fn smoothing_spectrum(basis: &BasisPair, params: &TableParams) -> Vec<Complex64> {
    let half_delta = (params.delta / 2.0).floor();
    let us = linspace(0.0, params.delta, params.samples_per_axis);
    let vs = linspace(-half_delta, half_delta, params.samples_per_axis);
    let (phases_x, phases_y) = basis.phases();

    phases_x
        .par_iter()
        .zip(phases_y.par_iter())
        .map(|(&px, &py)| {
            let sum_x: Complex64 = us.iter().map(|u| Complex64::from_polar(1.0, u * px)).sum();
            let sum_y: Complex64 = vs.iter().map(|v| Complex64::from_polar(1.0, v * py)).sum();
            sum_x * sum_y
        })
        .collect()
}

/// Dense `W × H` array of smoothed cell pointers
#[derive(Debug, Clone)]
pub struct ReconstructionTable {
    params: TableParams,
    dimension: usize,
    basis_fingerprint: String,
    /// Column-major: `pointers[i * height + j]`
    pointers: Vec<SemanticPointer>,
}

impl ReconstructionTable {
    /// Build the table for `basis`; cells are computed in parallel
    pub fn build(basis: &BasisPair, params: TableParams) -> Result<Self> {
        params.validate()?;
        let start = Instant::now();

        let smoothing = smoothing_spectrum(basis, &params);
        let cells: Vec<(usize, usize)> = (0..params.width)
            .flat_map(|i| (0..params.height).map(move |j| (i, j)))
            .collect();

        let pointers: Vec<SemanticPointer> = cells
            .par_iter()
            .map(|&(i, j)| {
                let (x, y) = params.cell_position(i, j);
                let product: Vec<Complex64> = basis
                    .point_spectrum(x, y)
                    .iter()
                    .zip(smoothing.iter())
                    .map(|(p, s)| p * s)
                    .collect();
                normalize(&SemanticPointer::from_raw(from_spectrum(&product)))
            })
            .collect();

        info!(
            "Built {}x{} reconstruction table (d={}, delta={}, samples={}) in {:.1}ms",
            params.width,
            params.height,
            basis.dimension(),
            params.delta,
            params.samples_per_axis,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            params,
            dimension: basis.dimension(),
            basis_fingerprint: basis.fingerprint().to_string(),
            pointers,
        })
    }

    /// Reassemble a table from stored pointers
    pub(crate) fn from_parts(
        params: TableParams,
        dimension: usize,
        basis_fingerprint: String,
        pointers: Vec<SemanticPointer>,
    ) -> Result<Self> {
        params.validate()?;
        if pointers.len() != params.cell_count() {
            return Err(SspError::DimensionMismatch {
                expected: params.cell_count(),
                actual: pointers.len(),
            });
        }
        if let Some(bad) = pointers.iter().find(|p| p.dimension() != dimension) {
            return Err(SspError::DimensionMismatch {
                expected: dimension,
                actual: bad.dimension(),
            });
        }
        Ok(Self {
            params,
            dimension,
            basis_fingerprint,
            pointers,
        })
    }

    pub fn params(&self) -> &TableParams {
        &self.params
    }

    pub fn width(&self) -> usize {
        self.params.width
    }

    pub fn height(&self) -> usize {
        self.params.height
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn basis_fingerprint(&self) -> &str {
        &self.basis_fingerprint
    }

    /// Whether this table was built for `basis` with `params`
    pub fn matches(&self, basis: &BasisPair, params: &TableParams) -> bool {
        self.dimension == basis.dimension()
            && self.basis_fingerprint == basis.fingerprint()
            && &self.params == params
    }

    /// Pointer for relative cell `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> Option<&SemanticPointer> {
        if i < self.params.width && j < self.params.height {
            Some(&self.pointers[i * self.params.height + j])
        } else {
            None
        }
    }

    pub(crate) fn pointers(&self) -> &[SemanticPointer] {
        &self.pointers
    }

    /// All cells as a `(W·H, d)` matrix, column-major over cells
    pub fn to_tensor(&self, device: &Device) -> Result<Tensor> {
        rows_to_tensor(self.pointers.iter().map(SemanticPointer::as_slice), self.dimension, device)
    }
}
