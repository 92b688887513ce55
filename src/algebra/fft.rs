//! Thread-local FFT plans
//!
//! Planning dominates the cost of small transforms, so each thread keeps one
//! `FftPlanner` and reuses its cached plans for every pointer dimension it sees.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use std::cell::RefCell;

thread_local! {
    static PLANNER: RefCell<FftPlanner<f64>> = RefCell::new(FftPlanner::new());
}

/// Forward transform of a real vector
pub(crate) fn forward(values: &[f64]) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = values.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    if buffer.is_empty() {
        return buffer;
    }
    let fft = PLANNER.with(|planner| planner.borrow_mut().plan_fft_forward(buffer.len()));
    fft.process(&mut buffer);
    buffer
}

/// Inverse transform, keeping the real part and applying the `1/n` scale
pub(crate) fn inverse_real(spectrum: &[Complex64]) -> Vec<f64> {
    let n = spectrum.len();
    if n == 0 {
        return Vec::new();
    }
    let mut buffer = spectrum.to_vec();
    let ifft = PLANNER.with(|planner| planner.borrow_mut().plan_fft_inverse(n));
    ifft.process(&mut buffer);

    let scale = 1.0 / n as f64;
    buffer.iter().map(|c| c.re * scale).collect()
}
