//! # Observation Encoders
//!
//! Turn raw grid observations into fixed-dimension semantic pointers.
//!
//! ## Variants
//!
//! | Encoder                   | Reads                     | Image pointer                               |
//! |---------------------------|---------------------------|---------------------------------------------|
//! | [`ObjectPresenceEncoder`] | view grid                 | `Σ_obj bind(normalize(Σ_cells T[i,j]), OBJ)` |
//! | [`PositionEncoder`]       | agent position, heading   | `POSITION ⊛ P(x,y) + DIRECTION ⊛ P(dx,dy)`   |
//! | [`GoalSimilarityEncoder`] | position + goal location  | as above, plus `goal_similarity`            |
//!
//! All variants share one [`BasisPair`](crate::basis::BasisPair) through an
//! `Arc`, so their pointers live in the same space as the
//! [`SspSpace`] they report.
//!
//! ## Lifecycle
//!
//! ```text
//! env.reset() ──► encoder.reset(state) ──► encoder.encode(raw, state)
//! env.step(a) ─────────────────────────► encoder.encode(raw, state)
//! ```
//!
//! [`SspObservationWrapper`] drives this loop for any
//! [`GridEnvironment`](crate::grid::GridEnvironment).

mod goal;
mod mission;
mod position;
mod presence;
mod wrapper;

pub use goal::{GoalDirectionKind, GoalLocator, GoalSimilarityEncoder};
pub use mission::{mission_one_hot, MissionCache, MissionEncoder, NUM_CHAR_CODES};
pub use position::{PositionEncoder, DIRECTION, POSITION};
pub use presence::ObjectPresenceEncoder;
pub use wrapper::{EncodedStep, SspObservationWrapper};

use crate::algebra::SemanticPointer;
use crate::basis::BasisPair;
use crate::config::EncoderConfig;
use crate::grid::{GridState, RawObservation};
use crate::space::SspSpace;
use crate::{Device, Result, SspError, Tensor};

/// Encoded replacement for a raw observation
#[derive(Debug, Clone)]
pub struct EncodedObservation {
    /// Mission text, passed through unchanged
    pub mission: String,
    /// `d`-dimensional image pointer
    pub image: SemanticPointer,
    /// Similarity between the agent's and the goal's position pointers
    pub goal_similarity: Option<f64>,
    /// Slope or angle from the agent towards the goal
    pub goal_direction: Option<f64>,
    /// One-hot `(max_len, 27)` mission features
    pub mission_features: Option<Tensor>,
}

impl EncodedObservation {
    pub fn new(mission: impl Into<String>, image: SemanticPointer) -> Self {
        Self {
            mission: mission.into(),
            image,
            goal_similarity: None,
            goal_direction: None,
            mission_features: None,
        }
    }

    /// Image pointer as a rank-1 `f32` tensor
    pub fn image_tensor(&self, device: &Device) -> Result<Tensor> {
        self.image.to_tensor(device)
    }
}

/// Maps raw observations to semantic pointers
pub trait ObservationEncoder {
    /// Observe the freshly reset environment before its first encode
    fn reset(&mut self, _state: &dyn GridState) -> Result<()> {
        Ok(())
    }

    /// Encode one observation; `state` gives access to absolute agent state
    fn encode(&mut self, raw: &RawObservation, state: &dyn GridState)
        -> Result<EncodedObservation>;

    /// Pointer dimension `d`
    fn dimension(&self) -> usize;

    /// Space the image pointers are drawn from
    fn observation_space(&self) -> Result<SspSpace>;
}

/// Validate `config` and check that `basis` has its dimension
fn check_basis(config: &EncoderConfig, basis: &BasisPair) -> Result<()> {
    config.validate()?;
    if basis.dimension() != config.dimension {
        return Err(SspError::DimensionMismatch {
            expected: config.dimension,
            actual: basis.dimension(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::SemanticPointer;
    use crate::fixtures::FakeGrid;
    use crate::grid::SymbolTables;
    use std::sync::Arc;

    #[test]
    fn test_encoded_observation_defaults() {
        let obs = EncodedObservation::new("get the key", SemanticPointer::zeros(8));
        assert_eq!(obs.mission, "get the key");
        assert!(obs.goal_similarity.is_none());
        assert!(obs.goal_direction.is_none());
        assert!(obs.mission_features.is_none());

        let tensor = obs.image_tensor(&Device::Cpu).unwrap();
        assert_eq!(tensor.dims(), &[8]);
    }

    #[test]
    fn test_check_basis_rejects_mismatch() {
        let config = EncoderConfig::default().with_dimension(32);
        let basis = BasisPair::from_seed(16, 0).unwrap();
        assert!(matches!(
            check_basis(&config, &basis),
            Err(SspError::DimensionMismatch { expected: 32, actual: 16 })
        ));
    }

    #[test]
    fn test_encoders_as_trait_objects() {
        let config = EncoderConfig::default()
            .with_dimension(32)
            .with_view(3, 3)
            .with_samples_per_axis(5);
        let basis = Arc::new(BasisPair::from_seed(32, 9).unwrap());
        let symbols = SymbolTables::minigrid();

        let mut encoders: Vec<Box<dyn ObservationEncoder>> = vec![
            Box::new(ObjectPresenceEncoder::new(&config, Arc::clone(&basis), &symbols).unwrap()),
            Box::new(PositionEncoder::new(&config, Arc::clone(&basis)).unwrap()),
            Box::new(GoalSimilarityEncoder::new(&config, Arc::clone(&basis), &symbols).unwrap()),
        ];

        let env = FakeGrid::new(5, 5).with_goal(3, 3).with_view_size(3, 3);
        let raw = env.observe();
        for encoder in &mut encoders {
            encoder.reset(&env).unwrap();
            let obs = encoder.encode(&raw, &env).unwrap();
            assert_eq!(obs.image.dimension(), 32);
            assert_eq!(encoder.dimension(), 32);
            assert!(encoder.observation_space().unwrap().contains(&obs.image));
        }
    }
}
