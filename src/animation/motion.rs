use crate::animation::path::{ControlPointPath, PathParams, PathStyle, generate_path};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::PaperdanceResult;
use crate::foundation::rng::Rng64;
use crate::settings::sprite::SpriteSettings;

/// Ratio of pulse amplitude to breathe amplitude.
pub const PULSE_AMOUNT_RATIO: f64 = 0.3;
/// Ratio of pulse frequency to breathe frequency.
pub const PULSE_SPEED_RATIO: f64 = 2.7;

const DEFAULT_MOVE_RANGE: f64 = 0.4;
const DEFAULT_TILT_FACTOR: f64 = 0.15;
const DEFAULT_PATH_SPEED: f64 = 1.0;

/// Immutable motion description of one sprite for the lifetime of a render job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionSpec {
    pub scale_base: f64,
    pub scale_target: f64,
    /// Base rotation in degrees.
    pub angle_base: f64,
    pub breathe_amount: f64,
    pub breathe_speed: f64,
    pub pulse_amount: f64,
    pub pulse_speed: f64,
    pub rotation_speed: f64,
    pub tilt_factor: f64,
    pub path_style: PathStyle,
    pub path_speed: f64,
    pub path: ControlPointPath,
}

impl MotionSpec {
    /// Resolve `settings` against seeded defaults and build the sprite's path.
    ///
    /// Random defaults are drawn in a fixed order whether or not they are overridden, followed by
    /// the path draws, so that a given `rng` state always maps to the same spec.
    pub fn build(
        settings: &SpriteSettings,
        canvas: Canvas,
        rng: &mut Rng64,
    ) -> PaperdanceResult<Self> {
        let drawn_scale = rng.uniform(0.35, 0.6);
        let drawn_variation = rng.uniform(0.8, 1.25);
        let drawn_rotation = rng.uniform(-8.0, 8.0);
        let drawn_style = rng
            .choose(&PathStyle::RANDOM_CHOICES)
            .unwrap_or(PathStyle::Organic);
        let drawn_breathe_amount = rng.uniform(0.02, 0.05);
        let drawn_breathe_speed = rng.uniform(0.8, 1.3);
        let drawn_rotation_speed = rng.uniform(0.7, 1.3);

        let scale_base = settings.scale.unwrap_or(drawn_scale);
        let scale_target = scale_base * settings.scale_variation.unwrap_or(drawn_variation);
        let breathe_amount = settings.breathe_amount.unwrap_or(drawn_breathe_amount);
        let breathe_speed = settings.breathe_speed.unwrap_or(drawn_breathe_speed);

        let (path_style, base) = resolve_style(settings, canvas, drawn_style);
        let mut params = PathParams::new(
            canvas,
            base,
            settings.move_range.unwrap_or(DEFAULT_MOVE_RANGE) * canvas.min_dim(),
        );
        if let Some(micro) = settings.micro_movement {
            params.micro_movement = micro;
        }
        let path = generate_path(path_style, &params, rng)?;

        Ok(Self {
            scale_base,
            scale_target,
            angle_base: settings.rotation.unwrap_or(drawn_rotation),
            breathe_amount,
            breathe_speed,
            pulse_amount: breathe_amount * PULSE_AMOUNT_RATIO,
            pulse_speed: breathe_speed * PULSE_SPEED_RATIO,
            rotation_speed: settings.rotation_speed.unwrap_or(drawn_rotation_speed),
            tilt_factor: settings.tilt_factor.unwrap_or(DEFAULT_TILT_FACTOR),
            path_style,
            path_speed: settings.path_speed.unwrap_or(DEFAULT_PATH_SPEED),
            path,
        })
    }
}

/// Pick the path style and loop centre for a sprite.
///
/// - `fixed_position` holds the sprite at its base (canvas centre if unset).
/// - A base position loops around it with the requested or drawn style.
/// - An explicit style without a base loops around the canvas centre.
/// - With neither, the sprite roams the whole canvas.
pub fn resolve_style(
    settings: &SpriteSettings,
    canvas: Canvas,
    drawn_style: PathStyle,
) -> (PathStyle, Point) {
    let base = settings.base_position();
    if settings.fixed_position == Some(true) {
        return (PathStyle::FixedMicro, base.unwrap_or_else(|| canvas.center()));
    }
    match (base, settings.path_type) {
        (Some(base), style) => (style.unwrap_or(drawn_style), base),
        (None, Some(style)) => (style, canvas.center()),
        (None, None) => (PathStyle::Roaming, canvas.center()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
