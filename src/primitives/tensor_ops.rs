//! Tensor export and placement
//!
//! Pointers are computed in `f64` on the CPU. Downstream learners consume
//! them as `f32` tensors, which may live on a GPU:
//!
//! ```bash
//! export SSP_NO_GPU=1   # force CPU placement
//! ```

use crate::{Result, SspError};
use candle_core::{Device, Tensor};
use tracing::info;

// ============================================================================
// Device Selection
// ============================================================================

/// Check if GPU placement is disabled via environment variable.
///
/// Set `SSP_NO_GPU=1` to force CPU-only tensors.
pub fn gpu_disabled() -> bool {
    std::env::var("SSP_NO_GPU")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// Get the best available device for exported tensors
///
/// Priority:
/// 1. Check `SSP_NO_GPU` env var (forces CPU if set)
/// 2. Metal (Apple Silicon)
/// 3. CUDA (NVIDIA GPUs)
/// 4. CPU (fallback)
pub fn best_device() -> Device {
    if gpu_disabled() {
        info!("Using CPU device (SSP_NO_GPU set)");
        return Device::Cpu;
    }

    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Using Metal device");
            return device;
        }
    }

    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Using CUDA device");
            return device;
        }
    }

    info!("Using CPU device");
    Device::Cpu
}

/// Force CPU device, ignoring GPU availability.
pub fn cpu_device() -> Device {
    Device::Cpu
}

// ============================================================================
// Vector Export
// ============================================================================

/// Build a rank-1 `f32` tensor from `f64` values
pub fn vector_to_tensor(values: &[f64], device: &Device) -> Result<Tensor> {
    let data: Vec<f32> = values.iter().map(|&v| v as f32).collect();
    Tensor::from_vec(data, (values.len(),), device)
        .map_err(|e| SspError::Tensor(format!("Vector export failed: {}", e)))
}

/// Build a rank-2 `f32` tensor from equally sized `f64` rows
pub fn rows_to_tensor<'a, I>(rows: I, cols: usize, device: &Device) -> Result<Tensor>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut data = Vec::new();
    let mut count = 0;
    for row in rows {
        if row.len() != cols {
            return Err(SspError::DimensionMismatch {
                expected: cols,
                actual: row.len(),
            });
        }
        data.extend(row.iter().map(|&v| v as f32));
        count += 1;
    }
    Tensor::from_vec(data, (count, cols), device)
        .map_err(|e| SspError::Tensor(format!("Matrix export failed: {}", e)))
}

/// Read a rank-1 tensor back into `f64` values
pub fn tensor_to_vector(tensor: &Tensor) -> Result<Vec<f64>> {
    if tensor.rank() != 1 {
        return Err(SspError::Tensor(format!(
            "Expected rank-1 tensor, got shape {:?}",
            tensor.dims()
        )));
    }
    let values: Vec<f32> = tensor.to_dtype(candle_core::DType::F32)?.to_vec1()?;
    Ok(values.into_iter().map(f64::from).collect())
}

/// Cosine similarity of every row of `matrix` (`n × d`) with `query` (`d`).
///
/// Tensor-side counterpart of decoding against a vocabulary matrix; rows or
/// queries with zero norm score 0.
pub fn row_similarities(matrix: &Tensor, query: &Tensor) -> Result<Vec<f32>> {
    let (_, cols) = matrix.dims2()?;
    if query.dims() != [cols] {
        return Err(SspError::DimensionMismatch {
            expected: cols,
            actual: query.elem_count(),
        });
    }

    let dots: Vec<f32> = matrix
        .matmul(&query.reshape((cols, 1))?)?
        .squeeze(1)?
        .to_vec1()?;
    let row_norms: Vec<f32> = matrix.sqr()?.sum(1)?.sqrt()?.to_vec1()?;
    let query_norm = query.sqr()?.sum_all()?.sqrt()?.to_scalar::<f32>()?;

    Ok(dots
        .into_iter()
        .zip(row_norms)
        .map(|(dot, norm)| {
            if norm > 1e-8 && query_norm > 1e-8 {
                dot / (norm * query_norm)
            } else {
                0.0
            }
        })
        .collect())
}
