//! Adapters for the external collaborators that feed a render job.
//!
//! Background synthesis and subject segmentation run outside this crate; these traits are the
//! seams they plug into. The bundled implementations cover local files and flat colours.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, RgbaImage};

use crate::foundation::error::{PaperdanceError, PaperdanceResult};

/// Smallest cut-out accepted as a usable sprite, per side.
pub const MIN_CUTOUT_SIDE: u32 = 10;

/// Produces the scene background for a prompt at the requested resolution.
pub trait BackgroundProvider: Send + Sync {
    fn background(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        seed: Option<u64>,
    ) -> PaperdanceResult<RgbImage>;
}

/// Turns raw photo bytes into a background-removed RGBA raster.
pub trait SpriteProvider: Send + Sync {
    fn cutout(&self, photo: &[u8]) -> PaperdanceResult<RgbaImage>;
}

/// Background decoded from an image file and resized to the target resolution.
#[derive(Clone, Debug)]
pub struct ImageFileBackground {
    path: PathBuf,
}

impl ImageFileBackground {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackgroundProvider for ImageFileBackground {
    fn background(
        &self,
        _prompt: &str,
        width: u32,
        height: u32,
        _seed: Option<u64>,
    ) -> PaperdanceResult<RgbImage> {
        check_size(width, height)?;
        let img = image::open(&self.path).map_err(|e| {
            PaperdanceError::io(format!("decode background '{}': {e}", self.path.display()))
        })?;
        let rgb = img.to_rgb8();
        if rgb.dimensions() == (width, height) {
            return Ok(rgb);
        }
        Ok(image::imageops::resize(
            &rgb,
            width,
            height,
            image::imageops::FilterType::Lanczos3,
        ))
    }
}

/// Flat single-colour background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidBackground {
    pub rgb: [u8; 3],
}

impl BackgroundProvider for SolidBackground {
    fn background(
        &self,
        _prompt: &str,
        width: u32,
        height: u32,
        _seed: Option<u64>,
    ) -> PaperdanceResult<RgbImage> {
        check_size(width, height)?;
        Ok(RgbImage::from_pixel(width, height, Rgb(self.rgb)))
    }
}

/// Decodes an image that is already cut out (transparent background).
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodedCutout;

impl SpriteProvider for DecodedCutout {
    fn cutout(&self, photo: &[u8]) -> PaperdanceResult<RgbaImage> {
        let rgba = image::load_from_memory(photo)?.to_rgba8();
        check_cutout(&rgba)?;
        Ok(rgba)
    }
}

/// Reject cut-outs too small to animate.
pub fn check_cutout(rgba: &RgbaImage) -> PaperdanceResult<()> {
    let (w, h) = rgba.dimensions();
    if w < MIN_CUTOUT_SIDE || h < MIN_CUTOUT_SIDE {
        return Err(PaperdanceError::validation(format!(
            "cut-out is {w}x{h}; at least {MIN_CUTOUT_SIDE}x{MIN_CUTOUT_SIDE} is required"
        )));
    }
    Ok(())
}

fn check_size(width: u32, height: u32) -> PaperdanceResult<()> {
    if width == 0 || height == 0 {
        return Err(PaperdanceError::validation(
            "background width/height must be non-zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/providers/mod.rs"]
mod tests;
