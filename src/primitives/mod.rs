//! Tensor Primitives
//!
//! Device selection and tensor-side helpers used when pointers leave the
//! crate as `candle_core::Tensor` values.
//!
//! ## Thread Safety
//!
//! Table construction runs on rayon worker threads but never touches a
//! device. Exported tensors are created on the caller's thread; set
//! `SSP_NO_GPU=1` to keep them on the CPU.
//!
//! ## Submodules
//!
//! - `tensor_ops`: Device selection, vector export, row similarities

mod tensor_ops;

pub use tensor_ops::*;
