use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::foundation::core::Canvas;
use crate::foundation::error::{PaperdanceError, PaperdanceResult};
use crate::settings::sprite::SpriteSettings;

/// Allowed bounds for a render request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderLimits {
    /// Inclusive range of clip durations, in seconds.
    pub duration_seconds: RangeInclusive<u32>,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            duration_seconds: 10..=25,
        }
    }
}

/// One generation request: clip timing, output size, seed and per-sprite overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderRequest {
    pub duration_seconds: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Randomness seed. A time-derived seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Free-text guidance handed to the settings enricher.
    #[serde(default)]
    pub prompt: String,
    /// Per-request overrides keyed by sprite index.
    #[serde(default)]
    pub settings: BTreeMap<usize, SpriteSettings>,
}

fn default_fps() -> u32 {
    12
}

fn default_width() -> u32 {
    768
}

fn default_height() -> u32 {
    432
}

impl RenderRequest {
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            duration_seconds,
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            seed: None,
            prompt: String::new(),
            settings: BTreeMap::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_frames(&self) -> u64 {
        u64::from(self.duration_seconds) * u64::from(self.fps)
    }

    pub fn canvas(&self) -> PaperdanceResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Reject requests that must not start rendering.
    pub fn validate(&self, limits: &RenderLimits, n_sprites: usize) -> PaperdanceResult<()> {
        if !limits.duration_seconds.contains(&self.duration_seconds) {
            return Err(PaperdanceError::validation(format!(
                "duration_seconds must be in {}..={}, got {}",
                limits.duration_seconds.start(),
                limits.duration_seconds.end(),
                self.duration_seconds
            )));
        }
        if n_sprites == 0 {
            return Err(PaperdanceError::validation(
                "at least one sprite is required",
            ));
        }
        if self.fps == 0 {
            return Err(PaperdanceError::validation("fps must be non-zero"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PaperdanceError::validation(
                "width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(PaperdanceError::validation(
                "width/height must be even (required for yuv420p output)",
            ));
        }
        for (&idx, settings) in &self.settings {
            if idx >= n_sprites {
                return Err(PaperdanceError::validation(format!(
                    "settings given for sprite {idx}, but only {n_sprites} sprites were supplied"
                )));
            }
            settings.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/request.rs"]
mod tests;
