use std::f64::consts::{PI, TAU};

use crate::animation::ease::Ease;
use crate::animation::motion::MotionSpec;
use crate::animation::sampler::PathSampler;
use crate::foundation::core::Point;
use crate::foundation::math::wrap01;

/// Extra path traversal per clip, on top of the sprite's own path speed.
const PATH_TRAVERSAL: f64 = 1.5;
/// Speeds at or below this do not tilt the sprite.
const TILT_MIN_SPEED: f64 = 0.1;
/// Speed at which tilt reaches its full strength.
const TILT_FULL_SPEED: f64 = 10.0;

/// Placement of one sprite in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteTransform {
    /// Centre of the sprite on the canvas.
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Counter-clockwise rotation in degrees.
    pub rotation_deg: f64,
}

/// Normalized clip time of frame `frame` out of `n_frames`.
///
/// Linear over the whole clip and not wrapped: the last frame is at `t = 1`, so a clip does not
/// loop seamlessly even though each path does.
pub fn clip_time(frame: u64, n_frames: u64) -> f64 {
    if n_frames > 1 {
        frame as f64 / (n_frames - 1) as f64
    } else {
        0.0
    }
}

/// Turns a [`MotionSpec`] and clip time into a [`SpriteTransform`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TransformSynthesizer {
    pub sampler: PathSampler,
    /// Remapping applied to the wrapped path parameter before sampling.
    pub path_ease: Ease,
}

impl TransformSynthesizer {
    pub fn transform(&self, motion: &MotionSpec, t: f64) -> SpriteTransform {
        let tau = self
            .path_ease
            .apply(wrap01(t * motion.path_speed * PATH_TRAVERSAL));
        let position = self.sampler.position(&motion.path, tau);
        let travel = self.sampler.motion(&motion.path, tau);

        let breathe = motion.breathe_amount * (TAU * t * motion.breathe_speed).sin();
        let pulse = motion.pulse_amount * (TAU * t * motion.pulse_speed + 0.7).sin();
        let micro = motion.breathe_amount * 0.1 * (TAU * t * 3.7 + 1.3).sin();

        let scale_t = 0.5 - 0.5 * (PI * t).cos();
        let base_scale = motion.scale_base + (motion.scale_target - motion.scale_base) * scale_t;

        // Vertical breathing is deliberately weaker than horizontal and micro is stronger.
        let scale_x = base_scale * (1.0 + breathe + pulse + micro);
        let scale_y = base_scale * (1.0 + breathe * 0.8 + pulse + micro * 1.2);

        let direction_tilt = if travel.speed > TILT_MIN_SPEED {
            let heading = travel.direction.y.atan2(travel.direction.x).to_degrees();
            let strength = 0.5 + 0.5 * (travel.speed / TILT_FULL_SPEED).min(1.0);
            heading * motion.tilt_factor * strength
        } else {
            0.0
        };

        let rotation_deg = motion.angle_base
            + direction_tilt
            + motion.angle_base * (TAU * t * motion.rotation_speed).sin() * 0.3
            + 2.0 * (TAU * t * 0.7).sin();

        SpriteTransform {
            position,
            scale_x,
            scale_y,
            rotation_deg,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transform.rs"]
mod tests;
