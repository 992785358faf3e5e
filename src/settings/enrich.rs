use crate::animation::path::PathStyle;
use crate::foundation::error::PaperdanceResult;
use crate::render::sprite::Sprite;
use crate::settings::sprite::SpriteSettings;

/// Optional collaborator that refines a sprite's settings before its motion is built.
///
/// Enrichment is best-effort: a render job never fails because an enricher did.
pub trait SettingsEnricher: Send + Sync {
    fn enrich(
        &self,
        current: &SpriteSettings,
        sprite: &Sprite,
        guidance: &str,
        seed: Option<u64>,
    ) -> PaperdanceResult<SpriteSettings>;
}

/// Returns the settings unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEnricher;

impl SettingsEnricher for NoopEnricher {
    fn enrich(
        &self,
        current: &SpriteSettings,
        _sprite: &Sprite,
        _guidance: &str,
        _seed: Option<u64>,
    ) -> PaperdanceResult<SpriteSettings> {
        Ok(current.clone())
    }
}

/// Fills unset motion fields with a fixed, gentle preset.
#[derive(Clone, Debug)]
pub struct PresetEnricher {
    pub preset: SpriteSettings,
}

impl Default for PresetEnricher {
    fn default() -> Self {
        Self {
            preset: SpriteSettings {
                path_type: Some(PathStyle::Wave),
                move_range: Some(0.5),
                breathe_amount: Some(0.04),
                breathe_speed: Some(1.2),
                ..Default::default()
            },
        }
    }
}

impl SettingsEnricher for PresetEnricher {
    fn enrich(
        &self,
        current: &SpriteSettings,
        _sprite: &Sprite,
        _guidance: &str,
        _seed: Option<u64>,
    ) -> PaperdanceResult<SpriteSettings> {
        Ok(current.merge_over(&self.preset))
    }
}

const ENERGETIC_WORDS: &[&str] = &["energetic", "active", "fast", "quick", "rapid"];
const CALM_WORDS: &[&str] = &["calm", "slow", "gentle", "peaceful", "relaxed"];
const DANCE_WORDS: &[&str] = &["dance", "dancing", "spinning"];
const FLOAT_WORDS: &[&str] = &["float", "floating", "hover"];

/// Bounds for a keyword-scaled field, and its starting value when still unset.
struct ScaledField {
    fallback: f64,
    min: f64,
    max: f64,
}

impl ScaledField {
    fn apply(&self, field: &mut Option<f64>, factor: f64) {
        *field = Some((field.unwrap_or(self.fallback) * factor).clamp(self.min, self.max));
    }
}

const BREATHE_SPEED: ScaledField = ScaledField {
    fallback: 1.0,
    min: 0.5,
    max: 2.0,
};
const MOVE_RANGE: ScaledField = ScaledField {
    fallback: 0.4,
    min: 0.1,
    max: 0.8,
};
const BREATHE_AMOUNT: ScaledField = ScaledField {
    fallback: 0.03,
    min: 0.01,
    max: 0.1,
};

/// Adjusts motion from keywords in the free-text guidance.
///
/// Unset fields are first filled from `preset`. Keyword groups are then applied in order, each
/// scaling the current value and clamping it:
///
/// | keywords                                   | effect                                       |
/// |--------------------------------------------|----------------------------------------------|
/// | energetic, active, fast, quick, rapid      | `breathe_speed` ×1.5, `move_range` ×1.3      |
/// | calm, slow, gentle, peaceful, relaxed      | `breathe_speed` ×0.7, `move_range` ×0.7      |
/// | dance, dancing, spinning                   | `path_type` figure8, `move_range` ×1.5       |
/// | float, floating, hover                     | `path_type` wave, `breathe_amount` ×1.5      |
///
/// Matching is case-insensitive and by substring. Keyword results replace explicit values.
#[derive(Clone, Debug, Default)]
pub struct PromptEnricher {
    pub preset: SpriteSettings,
}

impl PromptEnricher {
    pub fn with_preset(preset: SpriteSettings) -> Self {
        Self { preset }
    }

    /// Apply the keyword rules for `guidance` to `settings`.
    pub fn refine(settings: &SpriteSettings, guidance: &str) -> SpriteSettings {
        let text = guidance.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| text.contains(w));
        let mut out = settings.clone();

        if mentions(ENERGETIC_WORDS) {
            BREATHE_SPEED.apply(&mut out.breathe_speed, 1.5);
            MOVE_RANGE.apply(&mut out.move_range, 1.3);
        }
        if mentions(CALM_WORDS) {
            BREATHE_SPEED.apply(&mut out.breathe_speed, 0.7);
            MOVE_RANGE.apply(&mut out.move_range, 0.7);
        }
        if mentions(DANCE_WORDS) {
            out.path_type = Some(PathStyle::Figure8);
            MOVE_RANGE.apply(&mut out.move_range, 1.5);
        }
        if mentions(FLOAT_WORDS) {
            out.path_type = Some(PathStyle::Wave);
            BREATHE_AMOUNT.apply(&mut out.breathe_amount, 1.5);
        }
        out
    }
}

impl SettingsEnricher for PromptEnricher {
    fn enrich(
        &self,
        current: &SpriteSettings,
        _sprite: &Sprite,
        guidance: &str,
        _seed: Option<u64>,
    ) -> PaperdanceResult<SpriteSettings> {
        let refined = Self::refine(&current.merge_over(&self.preset), guidance);
        tracing::debug!(guidance, ?refined, "prompt keywords applied");
        Ok(refined)
    }
}

/// Run `enricher`, keeping `current` if it fails or returns invalid settings.
pub fn enrich_best_effort(
    enricher: &dyn SettingsEnricher,
    current: &SpriteSettings,
    sprite: &Sprite,
    guidance: &str,
    seed: Option<u64>,
) -> SpriteSettings {
    match enricher
        .enrich(current, sprite, guidance, seed)
        .and_then(|s| s.validate().map(|()| s))
    {
        Ok(enriched) => enriched,
        Err(e) => {
            tracing::warn!(error = %e, "settings enrichment failed; keeping original settings");
            current.clone()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/enrich.rs"]
mod tests;
