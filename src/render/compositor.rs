use std::cmp::Ordering;

use image::RgbImage;
use image::imageops::FilterType;

use crate::animation::motion::MotionSpec;
use crate::animation::transform::{SpriteTransform, TransformSynthesizer, clip_time};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{PaperdanceError, PaperdanceResult};
use crate::render::frame::FrameBuffer;
use crate::render::raster::{resize_premul, rotate_expand};
use crate::render::sprite::Sprite;

/// Sprites smaller than this on either axis are left out of the frame.
pub const MIN_SPRITE_PX: u32 = 5;

/// Per-frame compositing counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComposeStats {
    pub drawn: u32,
    /// Sprites omitted from this frame because they scaled below [`MIN_SPRITE_PX`].
    pub skipped: u32,
}

/// Renders frames of an animated sprite scene over a fixed background.
pub struct FrameCompositor<'a> {
    canvas: Canvas,
    background: RgbImage,
    sprites: &'a [Sprite],
    motions: &'a [MotionSpec],
    synth: TransformSynthesizer,
    n_frames: u64,
}

impl<'a> FrameCompositor<'a> {
    /// `background` is resized to `canvas` when needed. `sprites` and `motions` pair up by index.
    pub fn new(
        canvas: Canvas,
        background: &RgbImage,
        sprites: &'a [Sprite],
        motions: &'a [MotionSpec],
        n_frames: u64,
    ) -> PaperdanceResult<Self> {
        if sprites.len() != motions.len() {
            return Err(PaperdanceError::validation(format!(
                "got {} sprites but {} motion specs",
                sprites.len(),
                motions.len()
            )));
        }
        let background = if background.dimensions() == (canvas.width, canvas.height) {
            background.clone()
        } else {
            image::imageops::resize(
                background,
                canvas.width,
                canvas.height,
                FilterType::Lanczos3,
            )
        };
        Ok(Self {
            canvas,
            background,
            sprites,
            motions,
            synth: TransformSynthesizer::default(),
            n_frames,
        })
    }

    pub fn n_frames(&self) -> u64 {
        self.n_frames
    }

    /// Transforms of every sprite at frame `frame`, in sprite order.
    pub fn transforms(&self, frame: FrameIndex) -> Vec<SpriteTransform> {
        let t = clip_time(frame.0, self.n_frames);
        self.motions
            .iter()
            .map(|m| self.synth.transform(m, t))
            .collect()
    }

    /// Render frame `frame` as an opaque RGB image.
    pub fn render(&self, frame: FrameIndex) -> PaperdanceResult<(RgbImage, ComposeStats)> {
        // All transforms are computed before sorting so ordering never sees partial state.
        let transforms = self.transforms(frame);
        let placements: Vec<(&Sprite, SpriteTransform)> =
            self.sprites.iter().zip(transforms).collect();

        let mut fb = FrameBuffer::from_background(&self.background, self.canvas)?;
        let stats = compose(&mut fb, &placements);
        if stats.skipped > 0 {
            tracing::debug!(frame = frame.0, skipped = stats.skipped, "sprites too small");
        }
        Ok((fb.to_rgb([0, 0, 0])?, stats))
    }
}

/// Depth-sort `placements` by vertical position and composite them onto `fb`.
///
/// Lower `y` is drawn first (further back); ties keep input order.
pub fn compose(fb: &mut FrameBuffer, placements: &[(&Sprite, SpriteTransform)]) -> ComposeStats {
    let mut order: Vec<usize> = (0..placements.len()).collect();
    order.sort_by(|&a, &b| {
        placements[a]
            .1
            .position
            .y
            .partial_cmp(&placements[b].1.position.y)
            .unwrap_or(Ordering::Equal)
    });

    let mut stats = ComposeStats::default();
    for idx in order {
        let (sprite, tr) = placements[idx];
        if draw_sprite(fb, sprite, &tr) {
            stats.drawn += 1;
        } else {
            stats.skipped += 1;
        }
    }
    stats
}

/// Returns `false` when the sprite is too small to draw in this frame.
fn draw_sprite(fb: &mut FrameBuffer, sprite: &Sprite, tr: &SpriteTransform) -> bool {
    let w = f64::from(sprite.width()) * tr.scale_x;
    let h = f64::from(sprite.height()) * tr.scale_y;
    if !(w >= f64::from(MIN_SPRITE_PX) && h >= f64::from(MIN_SPRITE_PX)) {
        return false;
    }
    let (w, h) = (w as u32, h as u32);

    let resized = resize_premul(sprite.premul(), w, h);
    let rotated = rotate_expand(&resized, tr.rotation_deg);

    let x = (tr.position.x - f64::from(rotated.width() / 2)).floor() as i64;
    let y = (tr.position.y - f64::from(rotated.height() / 2)).floor() as i64;
    fb.draw(&rotated, x, y);
    true
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
