//! Goal-aware position encoding
//!
//! [`GoalLocator`] finds the goal cell once per environment and caches it;
//! [`GoalSimilarityEncoder`] adds a smooth distance-to-goal proxy to every
//! position encoding.

use super::{EncodedObservation, ObservationEncoder, PositionEncoder};
use crate::algebra::similarity;
use crate::basis::BasisPair;
use crate::config::EncoderConfig;
use crate::grid::{GridState, RawObservation, SymbolTables};
use crate::space::SspSpace;
use crate::{Result, SspError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Scans a grid for its goal cell and remembers it
#[derive(Debug, Clone)]
pub struct GoalLocator {
    goal_id: u8,
    goal: Option<(usize, usize)>,
}

impl GoalLocator {
    pub fn new(goal_id: u8) -> Self {
        Self { goal_id, goal: None }
    }

    /// Locator for the `goal` object of `symbols`
    pub fn from_symbols(symbols: &SymbolTables) -> Result<Self> {
        Ok(Self::new(symbols.objects.id("goal")?))
    }

    /// Cached goal cell, scanning `state` on first use.
    ///
    /// Scans columns first (`x` outer); the first goal found wins.
    pub fn locate(&mut self, state: &dyn GridState) -> Result<(usize, usize)> {
        if let Some(goal) = self.goal {
            return Ok(goal);
        }

        let goal_id = self.goal_id;
        let mut hits = (0..state.width())
            .flat_map(|x| (0..state.height()).map(move |y| (x, y)))
            .filter(|&(x, y)| state.object_at(x, y) == Some(goal_id));

        let goal = hits.next().ok_or_else(|| {
            SspError::Configuration(format!(
                "No goal in {}x{} grid",
                state.width(),
                state.height()
            ))
        })?;
        let extra = hits.count();
        if extra > 0 {
            warn!("Grid holds {} goals; using the first at {:?}", extra + 1, goal);
        }

        info!("Goal located at ({}, {})", goal.0, goal.1);
        self.goal = Some(goal);
        Ok(goal)
    }

    pub fn position(&self) -> Option<(usize, usize)> {
        self.goal
    }

    /// Forget the cached goal so the next `locate` rescans
    pub fn clear(&mut self) {
        self.goal = None;
    }
}

/// How the agent-to-goal direction is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalDirectionKind {
    /// `(gy - y) / (gx - x)`
    #[default]
    Slope,
    /// `atan` of the slope
    Angle,
}

impl GoalDirectionKind {
    /// Division by zero follows IEEE semantics (±∞ or NaN)
    pub fn compute(self, goal: (usize, usize), agent: (usize, usize)) -> f64 {
        let slope = (goal.1 as f64 - agent.1 as f64) / (goal.0 as f64 - agent.0 as f64);
        match self {
            Self::Slope => slope,
            Self::Angle => slope.atan(),
        }
    }
}

/// Position encoder that also reports similarity to the goal
pub struct GoalSimilarityEncoder {
    inner: PositionEncoder,
    locator: GoalLocator,
    direction: Option<GoalDirectionKind>,
}

impl GoalSimilarityEncoder {
    pub fn new(config: &EncoderConfig, basis: Arc<BasisPair>, symbols: &SymbolTables) -> Result<Self> {
        Ok(Self {
            inner: PositionEncoder::new(config, basis)?,
            locator: GoalLocator::from_symbols(symbols)?,
            direction: None,
        })
    }

    /// Also report the agent-to-goal direction on every observation
    #[must_use]
    pub fn with_goal_direction(mut self, kind: GoalDirectionKind) -> Self {
        self.direction = Some(kind);
        self
    }

    pub fn position_encoder(&self) -> &PositionEncoder {
        &self.inner
    }

    pub fn locator(&self) -> &GoalLocator {
        &self.locator
    }

    /// `similarity(X^gx ⊛ Y^gy, X^x ⊛ Y^y)` for the current agent cell
    pub fn goal_similarity(&mut self, state: &dyn GridState) -> Result<f64> {
        let (gx, gy) = self.locator.locate(state)?;
        let (x, y) = state.agent_pos();
        similarity(
            &self.inner.position_pointer(gx, gy),
            &self.inner.position_pointer(x, y),
        )
    }
}

impl ObservationEncoder for GoalSimilarityEncoder {
    fn reset(&mut self, state: &dyn GridState) -> Result<()> {
        self.locator.locate(state).map(|_| ())
    }

    fn encode(&mut self, raw: &RawObservation, state: &dyn GridState) -> Result<EncodedObservation> {
        let mut obs = self.inner.encode(raw, state)?;
        obs.goal_similarity = Some(self.goal_similarity(state)?);
        if let (Some(kind), Some(goal)) = (self.direction, self.locator.position()) {
            obs.goal_direction = Some(kind.compute(goal, state.agent_pos()));
        }
        Ok(obs)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn observation_space(&self) -> Result<SspSpace> {
        self.inner.observation_space()
    }
}
