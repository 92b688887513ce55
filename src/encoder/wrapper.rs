//! Environment wrapper that swaps raw observations for encoded ones

use super::{EncodedObservation, MissionEncoder, ObservationEncoder};
use crate::config::EncoderConfig;
use crate::grid::{GridEnvironment, RawObservation};
use crate::space::SspSpace;
use crate::Result;

/// Encoded result of one environment step
#[derive(Debug, Clone)]
pub struct EncodedStep {
    pub observation: EncodedObservation,
    pub reward: f64,
    pub done: bool,
}

/// Drives `reset`/`step` on a grid environment and encodes every observation
pub struct SspObservationWrapper<E: GridEnvironment, C: ObservationEncoder> {
    env: E,
    encoder: C,
    missions: Option<MissionEncoder>,
}

impl<E: GridEnvironment, C: ObservationEncoder> SspObservationWrapper<E, C> {
    pub fn new(env: E, encoder: C) -> Self {
        Self {
            env,
            encoder,
            missions: None,
        }
    }

    /// Attach one-hot mission features to every observation, sized by
    /// `config.mission_max_len`
    pub fn with_mission_features(self, config: &EncoderConfig) -> Result<Self> {
        Ok(self.with_mission_encoder(MissionEncoder::from_config(config)?))
    }

    pub fn with_mission_encoder(mut self, missions: MissionEncoder) -> Self {
        self.missions = Some(missions);
        self
    }

    /// Reset the environment, let the encoder observe the new grid, then
    /// encode the first observation
    pub fn reset(&mut self) -> Result<EncodedObservation> {
        let raw = self.env.reset();
        self.encoder.reset(&self.env)?;
        self.encode(&raw)
    }

    pub fn step(&mut self, action: E::Action) -> Result<EncodedStep> {
        let outcome = self.env.step(action);
        Ok(EncodedStep {
            observation: self.encode(&outcome.observation)?,
            reward: outcome.reward,
            done: outcome.done,
        })
    }

    pub fn observation_space(&self) -> Result<SspSpace> {
        self.encoder.observation_space()
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn encoder(&self) -> &C {
        &self.encoder
    }

    pub fn into_inner(self) -> (E, C) {
        (self.env, self.encoder)
    }

    fn encode(&mut self, raw: &RawObservation) -> Result<EncodedObservation> {
        let mut obs = self.encoder.encode(raw, &self.env)?;
        if let Some(missions) = &mut self.missions {
            obs.mission_features = Some(missions.encode(&raw.mission)?);
        }
        Ok(obs)
    }
}
