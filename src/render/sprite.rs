use image::RgbaImage;

use crate::foundation::error::{PaperdanceError, PaperdanceResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Longest side a sprite is kept at; larger inputs are downscaled on load.
pub const MAX_SPRITE_SIDE: u32 = 1024;

/// A cut-out character raster, stored as premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct Sprite {
    premul: RgbaImage,
}

impl Sprite {
    /// Build from a straight-alpha RGBA raster (already background-removed).
    pub fn from_rgba(rgba: RgbaImage) -> PaperdanceResult<Self> {
        let (w, h) = rgba.dimensions();
        if w == 0 || h == 0 {
            return Err(PaperdanceError::validation("sprite raster is empty"));
        }

        let mut rgba = if w.max(h) > MAX_SPRITE_SIDE {
            let scale = f64::from(MAX_SPRITE_SIDE) / f64::from(w.max(h));
            let nw = ((f64::from(w) * scale) as u32).max(1);
            let nh = ((f64::from(h) * scale) as u32).max(1);
            image::imageops::resize(&rgba, nw, nh, image::imageops::FilterType::Lanczos3)
        } else {
            rgba
        };
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self { premul: rgba })
    }

    pub fn width(&self) -> u32 {
        self.premul.width()
    }

    pub fn height(&self) -> u32 {
        self.premul.height()
    }

    /// Premultiplied pixels.
    pub fn premul(&self) -> &RgbaImage {
        &self.premul
    }
}
