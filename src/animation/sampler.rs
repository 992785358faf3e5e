use crate::animation::ease::Ease;
use crate::animation::path::ControlPointPath;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::wrap01;

/// Offset used when sampling the path on either side of a sample for direction.
pub const DIRECTION_DELTA: f64 = 0.02;

/// Multiplier turning the look-ahead displacement into a speed value.
///
/// Tuned visually; the tilt response in [`crate::TransformSynthesizer`] is calibrated against it.
pub const SPEED_SCALE: f64 = 25.0;

/// Direction and speed of travel at a sampled path position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathMotion {
    /// Unit vector when the look-ahead displacement is non-negligible, raw displacement otherwise.
    pub direction: Vec2,
    pub speed: f64,
}

/// Evaluates positions on a [`ControlPointPath`] with per-segment easing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathSampler {
    pub segment_ease: Ease,
}

impl PathSampler {
    pub fn new(segment_ease: Ease) -> Self {
        Self { segment_ease }
    }

    /// Position at parameter `tau`; periodic with period 1.
    pub fn position(&self, path: &ControlPointPath, tau: f64) -> Point {
        let points = path.points();
        let tau = wrap01(tau);

        let segments = points.len() - 1;
        let scaled = tau * segments as f64;
        let idx = (scaled.floor().max(0.0) as usize).min(segments - 1);
        let s = self.segment_ease.apply(scaled - idx as f64);

        points[idx].lerp(points[idx + 1], s)
    }

    /// Direction and speed at `tau`, from positions at `tau ± DIRECTION_DELTA`.
    pub fn motion(&self, path: &ControlPointPath, tau: f64) -> PathMotion {
        let next = self.position(path, tau + DIRECTION_DELTA);
        let prev = self.position(path, tau - DIRECTION_DELTA);
        let d = next - prev;
        let len = d.hypot();
        let direction = if len > 0.001 { d / len } else { d };
        PathMotion {
            direction,
            speed: len * SPEED_SCALE,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sampler.rs"]
mod tests;
