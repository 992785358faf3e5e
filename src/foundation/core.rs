use crate::foundation::error::{PaperdanceError, PaperdanceResult};

pub use kurbo::{Affine, Point, Vec2};

/// Zero-based frame index within a render job.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> PaperdanceResult<Self> {
        if width == 0 || height == 0 {
            return Err(PaperdanceError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn min_dim(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Safe-placement margin: 15% of the smaller dimension.
    pub fn margin(self) -> f64 {
        0.15 * self.min_dim()
    }

    /// Clamp `p` into `[margin, dim - margin]` on both axes.
    pub fn clamp_inside_margin(self, p: Point) -> Point {
        let m = self.margin();
        Point::new(
            clamp_lo_hi(p.x, m, f64::from(self.width) - m),
            clamp_lo_hi(p.y, m, f64::from(self.height) - m),
        )
    }
}

// `max(lo, min(hi, v))`; unlike `f64::clamp` this does not panic when `lo > hi`.
fn clamp_lo_hi(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}
