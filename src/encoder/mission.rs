//! Mission text features
//!
//! Missions change rarely within an episode, so the last encoding is kept in
//! a single-slot [`MissionCache`] keyed by the mission string.

use crate::config::EncoderConfig;
use crate::primitives::best_device;
use crate::{Device, Result, SspError, Tensor};

/// `a`–`z` plus space
pub const NUM_CHAR_CODES: usize = 27;

/// Single-slot memo: holds the value for the most recent key only
#[derive(Debug, Clone)]
pub struct MissionCache<V> {
    slot: Option<(String, V)>,
    hits: u64,
    misses: u64,
}

impl<V> Default for MissionCache<V> {
    fn default() -> Self {
        Self {
            slot: None,
            hits: 0,
            misses: 0,
        }
    }
}

impl<V> MissionCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `mission`, rebuilding only when the mission changed
    pub fn get_or_insert_with<F>(&mut self, mission: &str, build: F) -> Result<&V>
    where
        F: FnOnce(&str) -> Result<V>,
    {
        if self.key() == Some(mission) {
            self.hits += 1;
        } else {
            let value = build(mission)?;
            self.misses += 1;
            self.slot = Some((mission.to_string(), value));
        }

        self.slot
            .as_ref()
            .map(|(_, value)| value)
            .ok_or_else(|| SspError::Configuration("Mission cache slot is empty".into()))
    }

    /// Mission currently cached
    pub fn key(&self) -> Option<&str> {
        self.slot.as_ref().map(|(key, _)| key.as_str())
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}

/// One-hot `(max_len, 27)` encoding of a mission string.
///
/// The mission is lowercased; `a`–`z` map to codes 0–25 and space to 26.
/// Any other character, or a mission longer than `max_len`, is rejected.
pub fn mission_one_hot(mission: &str, max_len: usize, device: &Device) -> Result<Tensor> {
    let lowered = mission.to_lowercase();
    let len = lowered.chars().count();
    if len > max_len {
        return Err(SspError::Configuration(format!(
            "Mission too long ({} chars, max {})",
            len, max_len
        )));
    }

    let mut data = vec![0f32; max_len * NUM_CHAR_CODES];
    for (idx, ch) in lowered.chars().enumerate() {
        let code = match ch {
            'a'..='z' => ch as usize - 'a' as usize,
            ' ' => NUM_CHAR_CODES - 1,
            other => {
                return Err(SspError::Configuration(format!(
                    "Unsupported mission character {:?}",
                    other
                )))
            }
        };
        data[idx * NUM_CHAR_CODES + code] = 1.0;
    }

    Ok(Tensor::from_vec(data, (max_len, NUM_CHAR_CODES), device)?)
}

/// Cached one-hot mission encoder
#[derive(Debug)]
pub struct MissionEncoder {
    max_len: usize,
    device: Device,
    cache: MissionCache<Tensor>,
}

impl MissionEncoder {
    pub fn new(max_len: usize, device: Device) -> Result<Self> {
        if max_len == 0 {
            return Err(SspError::Configuration(
                "Mission max length must be positive".into(),
            ));
        }
        Ok(Self {
            max_len,
            device,
            cache: MissionCache::new(),
        })
    }

    /// `max_len` from the config, tensors on [`best_device`]
    pub fn from_config(config: &EncoderConfig) -> Result<Self> {
        Self::new(config.mission_max_len, best_device())
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn encode(&mut self, mission: &str) -> Result<Tensor> {
        let (max_len, device) = (self.max_len, &self.device);
        self.cache
            .get_or_insert_with(mission, |m| mission_one_hot(m, max_len, device))
            .cloned()
    }

    pub fn cache(&self) -> &MissionCache<Tensor> {
        &self.cache
    }
}
