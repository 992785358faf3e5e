use image::{RgbImage, RgbaImage};

use crate::foundation::core::Canvas;
use crate::foundation::error::{PaperdanceError, PaperdanceResult};
use crate::foundation::math::mul_div255_u16;

/// Mutable premultiplied RGBA8 canvas for one frame.
///
/// Seeded from the background, composited onto, then flattened to RGB and discarded.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameBuffer {
    /// Opaque canvas copied from `background`, which must already match `canvas`.
    pub fn from_background(background: &RgbImage, canvas: Canvas) -> PaperdanceResult<Self> {
        if background.dimensions() != (canvas.width, canvas.height) {
            return Err(PaperdanceError::validation(format!(
                "background is {}x{}, expected {}x{}",
                background.width(),
                background.height(),
                canvas.width,
                canvas.height
            )));
        }
        let mut data = Vec::with_capacity(background.as_raw().len() / 3 * 4);
        for px in background.as_raw().chunks_exact(3) {
            data.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    /// Flatten over `bg_rgb` into an opaque RGB image.
    pub fn to_rgb(&self, bg_rgb: [u8; 3]) -> PaperdanceResult<RgbImage> {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        for s in self.data.chunks_exact(4) {
            let a = u16::from(s[3]);
            if a == 255 {
                out.extend_from_slice(&s[..3]);
                continue;
            }
            let inv = 255u16 - a;
            for (c, bg) in s[..3].iter().zip(bg_rgb) {
                let v = u16::from(*c) + mul_div255_u16(u16::from(bg), inv);
                out.push(v.min(255) as u8);
            }
        }
        RgbImage::from_raw(self.width, self.height, out)
            .ok_or_else(|| PaperdanceError::io("frame buffer size mismatch"))
    }

    /// Composite a premultiplied raster with its top-left corner at `(x, y)`.
    pub fn draw(&mut self, src: &RgbaImage, x: i64, y: i64) {
        crate::render::composite::over_at(&mut self.data, self.width, self.height, src, x, y);
    }
}
