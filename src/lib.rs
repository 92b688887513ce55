//! # ssp-minigrid
//!
//! Spatial semantic pointer (SSP) encoding of grid-world observations.
//!
//! ## Overview
//!
//! Discrete grid snapshots (object ids per cell, agent position and heading)
//! are turned into fixed-dimension continuous vectors that jointly represent
//! *what* is present and *where*. Positions are encoded by fractional binding
//! of two unitary basis vectors; identities come from a random vocabulary;
//! the two are combined with circular convolution.
//!
//! Core capabilities:
//!
//! - **Basis**: Unitary basis pair for the two spatial axes
//! - **Algebra**: Bind, unbind, fractional power, superposition, similarity
//! - **Vocabulary**: Named symbol → pointer mapping with `NULL` / `OPEN`
//! - **Reconstruction**: Precomputed, spatially smoothed per-cell pointers
//! - **Encoders**: Object presence, position + heading, goal similarity
//! - **Space**: Samplable description of the encoder's codomain
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ssp_minigrid::prelude::*;
//!
//! let config = EncoderConfig::default().with_dimension(256);
//! let basis = Arc::new(BasisPair::from_seed(config.dimension, config.seed)?);
//! let mut encoder = ObjectPresenceEncoder::new(&config, basis, &SymbolTables::default())?;
//!
//! let encoded = encoder.encode(&raw_observation, &env)?;
//! let ranked = encoder.decode_cell(&encoded.image, 3, 3)?;
//! println!("Top match at (3,3): {}", ranked[0].0);
//! ```
//!
//! ## Feature Flags
//!
//! - `metal`: Apple Metal placement for exported tensors
//! - `cuda`: NVIDIA CUDA placement for exported tensors

pub mod algebra;
pub mod basis;
pub mod config;
pub mod encoder;
pub mod grid;
pub mod primitives;
pub mod reconstruction;
pub mod space;
pub mod vocab;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export candle types for convenience
pub use candle_core::{DType, Device, Tensor};

/// Error types for SSP encoding operations
#[derive(Debug, thiserror::Error)]
pub enum SspError {
    /// Invalid construction-time configuration (dimension, basis, table parameters)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Vocabulary or symbol-table lookup of a name or id that was never populated
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    #[error("Tensor operation failed: {0}")]
    Tensor(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),
}

/// Result type alias for SSP operations
pub type Result<T> = std::result::Result<T, SspError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Device, Tensor};
    pub use crate::{Result, SspError};
    pub use std::sync::Arc;

    // Algebra
    pub use crate::algebra::{
        bind, unbind, power, superpose, normalize, similarity,
        Algebra, HrrAlgebra, SemanticPointer,
    };

    // Basis and vocabulary
    pub use crate::basis::BasisPair;
    pub use crate::vocab::{PointerGen, Vocabulary};

    // Reconstruction
    pub use crate::reconstruction::{
        ReconstructionTable, TableParams, TableRegistry, TableStore,
    };

    // Encoders
    pub use crate::encoder::{
        EncodedObservation, EncodedStep, GoalDirectionKind, GoalLocator, GoalSimilarityEncoder,
        MissionCache, MissionEncoder, ObjectPresenceEncoder, ObservationEncoder,
        PositionEncoder, SspObservationWrapper,
    };

    // Grid contract
    pub use crate::grid::{
        Direction, GridEnvironment, GridState, ObservationGrid, RawObservation,
        StepOutcome, SymbolTables,
    };

    pub use crate::config::EncoderConfig;
    pub use crate::primitives::{best_device, cpu_device};
    pub use crate::space::SspSpace;
}
