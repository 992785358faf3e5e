use crate::animation::path::PathStyle;
use crate::foundation::core::Point;
use crate::foundation::error::{PaperdanceError, PaperdanceResult};

/// Per-sprite animation options. Every field is optional; unset fields fall back to stored
/// per-sprite values and then to seeded defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpriteSettings {
    /// Starting scale factor relative to the sprite's native size.
    pub scale: Option<f64>,
    /// Ratio of ending scale to starting scale.
    pub scale_variation: Option<f64>,
    /// Base rotation in degrees.
    pub rotation: Option<f64>,
    /// Hold the sprite at its base position with micro-movements only.
    pub fixed_position: Option<bool>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    /// Micro-movement amplitude in pixels.
    pub micro_movement: Option<f64>,
    /// Movement radius as a fraction of the smaller canvas dimension.
    pub move_range: Option<f64>,
    pub path_type: Option<PathStyle>,
    pub path_speed: Option<f64>,
    pub breathe_amount: Option<f64>,
    pub breathe_speed: Option<f64>,
    pub rotation_speed: Option<f64>,
    pub tilt_factor: Option<f64>,
}

macro_rules! overlay_fields {
    ($hi:expr, $lo:expr, $($field:ident),+ $(,)?) => {
        SpriteSettings {
            $($field: $hi.$field.or($lo.$field),)+
        }
    };
}

impl SpriteSettings {
    /// Combine with `stored`, field by field; fields set on `self` win.
    pub fn merge_over(&self, stored: &SpriteSettings) -> SpriteSettings {
        overlay_fields!(
            self,
            stored,
            scale,
            scale_variation,
            rotation,
            fixed_position,
            position_x,
            position_y,
            micro_movement,
            move_range,
            path_type,
            path_speed,
            breathe_amount,
            breathe_speed,
            rotation_speed,
            tilt_factor,
        )
    }

    /// Drop neutral appearance values from a stored sprite record.
    ///
    /// Stored records persist `scale = 1.0` and `rotation = 0.0` as "untouched"; those must not
    /// override the randomized defaults.
    pub fn without_neutral_appearance(mut self) -> Self {
        if self.scale == Some(1.0) {
            self.scale = None;
        }
        if self.rotation == Some(0.0) {
            self.rotation = None;
        }
        self
    }

    /// Base position, when both coordinates are set.
    pub fn base_position(&self) -> Option<Point> {
        match (self.position_x, self.position_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    pub fn validate(&self) -> PaperdanceResult<()> {
        let finite = [
            ("scale", self.scale),
            ("scale_variation", self.scale_variation),
            ("rotation", self.rotation),
            ("position_x", self.position_x),
            ("position_y", self.position_y),
            ("micro_movement", self.micro_movement),
            ("move_range", self.move_range),
            ("path_speed", self.path_speed),
            ("breathe_amount", self.breathe_amount),
            ("breathe_speed", self.breathe_speed),
            ("rotation_speed", self.rotation_speed),
            ("tilt_factor", self.tilt_factor),
        ];
        for (name, v) in finite {
            if let Some(v) = v
                && !v.is_finite()
            {
                return Err(PaperdanceError::validation(format!(
                    "sprite setting '{name}' must be finite"
                )));
            }
        }

        let non_negative = [
            ("scale", self.scale),
            ("scale_variation", self.scale_variation),
            ("micro_movement", self.micro_movement),
            ("move_range", self.move_range),
        ];
        for (name, v) in non_negative {
            if let Some(v) = v
                && v < 0.0
            {
                return Err(PaperdanceError::validation(format!(
                    "sprite setting '{name}' must be >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/sprite.rs"]
mod tests;
