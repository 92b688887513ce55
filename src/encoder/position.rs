//! Position and heading encoder
//!
//! Ignores the view grid; the image pointer is built from absolute agent
//! state only:
//!
//! ```text
//! M = POSITION ⊛ (X^x ⊛ Y^y) + DIRECTION ⊛ (X^dx ⊛ Y^dy)
//! ```

use super::{check_basis, EncodedObservation, ObservationEncoder};
use crate::algebra::{bind, superpose, SemanticPointer};
use crate::basis::BasisPair;
use crate::config::EncoderConfig;
use crate::grid::{GridState, RawObservation};
use crate::space::SspSpace;
use crate::vocab::Vocabulary;
use crate::Result;
use std::sync::Arc;

pub const POSITION: &str = "POSITION";
pub const DIRECTION: &str = "DIRECTION";

pub struct PositionEncoder {
    basis: Arc<BasisPair>,
    vocab: Vocabulary,
    space_radius: f64,
}

impl PositionEncoder {
    pub fn new(config: &EncoderConfig, basis: Arc<BasisPair>) -> Result<Self> {
        check_basis(config, &basis)?;
        let mut vocab = Vocabulary::new(config.dimension, config.seed.wrapping_add(2))?;
        vocab.populate([POSITION, DIRECTION])?;

        Ok(Self {
            basis,
            vocab,
            space_radius: config.space_radius,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn basis(&self) -> &Arc<BasisPair> {
        &self.basis
    }

    /// `X^x ⊛ Y^y` for an absolute cell
    pub fn position_pointer(&self, x: usize, y: usize) -> SemanticPointer {
        self.basis.encode_point(x as f64, y as f64)
    }

    /// Encode the agent's absolute position and heading
    pub fn encode_state(&self, state: &dyn GridState) -> Result<SemanticPointer> {
        let (x, y) = state.agent_pos();
        let (dx, dy) = state.agent_dir().to_vec();

        let position = bind(self.vocab.lookup(POSITION)?, &self.position_pointer(x, y))?;
        let heading = bind(
            self.vocab.lookup(DIRECTION)?,
            &self.basis.encode_point(f64::from(dx), f64::from(dy)),
        )?;
        superpose(&position, &heading)
    }
}

impl ObservationEncoder for PositionEncoder {
    fn encode(&mut self, raw: &RawObservation, state: &dyn GridState) -> Result<EncodedObservation> {
        Ok(EncodedObservation::new(raw.mission.clone(), self.encode_state(state)?))
    }

    fn dimension(&self) -> usize {
        self.basis.dimension()
    }

    fn observation_space(&self) -> Result<SspSpace> {
        SspSpace::new(Arc::clone(&self.basis), self.space_radius)
    }
}
