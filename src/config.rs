#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Engine-wide settings.
///
/// Nothing here is persisted by the engine; callers load/store it however
/// they like (enable the `serde` feature for derive support).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Length of every looping noise buffer, in seconds.
    pub noise_seconds: f32,
    /// Sample rate used by the offline backend (the cpal backend uses the device's).
    pub offline_sample_rate: f32,
    /// How many shredder one-shots may overlap before the oldest is replaced.
    pub max_one_shots: usize,
    /// Sink gain before the first `set_volume`/`play` call.
    pub initial_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            noise_seconds: 2.0,
            offline_sample_rate: 48_000.0,
            max_one_shots: 4,
            initial_volume: 0.5,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.noise_seconds.is_finite() || self.noise_seconds <= 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "noise_seconds",
                value: self.noise_seconds,
            });
        }
        if !self.offline_sample_rate.is_finite() || self.offline_sample_rate < 1.0 {
            return Err(EngineError::InvalidParameter {
                name: "offline_sample_rate",
                value: self.offline_sample_rate,
            });
        }
        if self.max_one_shots == 0 {
            return Err(EngineError::InvalidParameter {
                name: "max_one_shots",
                value: 0.0,
            });
        }
        if !self.initial_volume.is_finite() {
            return Err(EngineError::InvalidParameter {
                name: "initial_volume",
                value: self.initial_volume,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_noise_length() {
        let config = EngineConfig {
            noise_seconds: 0.0,
            ..EngineConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidParameter {
                name: "noise_seconds",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_one_shot_capacity() {
        let config = EngineConfig {
            max_one_shots: 0,
            ..EngineConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_volume() {
        let config = EngineConfig {
            initial_volume: f32::NAN,
            ..EngineConfig::default()
        };

        assert!(config.validate().is_err());
    }
}
