//! Session configuration: pacing, display size, wire format.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{GameError, Result};

/// How envelopes are encoded on the relay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// `{type, payload}` JSON records.
    #[default]
    Json,
    /// Compact bincode frames.
    Binary,
}

/// Session configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Random seed for dice.
    /// `None` seeds from OS entropy; a fixed seed replays identical dice.
    pub seed: Option<u64>,

    /// Pause between AI turn steps, in milliseconds.
    /// Mimics human pacing in single-player mode.
    pub ai_step_delay_ms: u64,

    /// Celebration pause before an immediate yacht is auto-scored, in milliseconds.
    pub yacht_celebration_delay_ms: u64,

    /// Renderer canvas width in pixels.
    pub display_width: u32,

    /// Renderer canvas height in pixels.
    pub display_height: u32,

    /// Envelope encoding used on the relay.
    pub wire_format: WireFormat,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ai_step_delay_ms: 700,
            yacht_celebration_delay_ms: 1500,
            display_width: 400,
            display_height: 120,
            wire_format: WireFormat::Json,
        }
    }
}

impl GameConfig {
    /// Zero-delay config with a fixed seed, for driving sessions synchronously.
    #[must_use]
    pub fn instant(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ai_step_delay_ms: 0,
            yacht_celebration_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the renderer or scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(GameError::Config(format!(
                "display size {}x{} must be non-zero",
                self.display_width, self.display_height
            )));
        }
        Ok(())
    }

    /// Set the dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the AI step delay.
    pub fn with_ai_step_delay(mut self, delay: Duration) -> Self {
        self.ai_step_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the yacht celebration delay.
    pub fn with_yacht_celebration_delay(mut self, delay: Duration) -> Self {
        self.yacht_celebration_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the wire format.
    pub fn with_wire_format(mut self, format: WireFormat) -> Self {
        self.wire_format = format;
        self
    }

    /// AI step delay as a `Duration`.
    #[must_use]
    pub fn ai_step_delay(&self) -> Duration {
        Duration::from_millis(self.ai_step_delay_ms)
    }

    /// Yacht celebration delay as a `Duration`.
    #[must_use]
    pub fn yacht_celebration_delay(&self) -> Duration {
        Duration::from_millis(self.yacht_celebration_delay_ms)
    }
}
