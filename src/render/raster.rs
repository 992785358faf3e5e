use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::core::{Affine, Point};

/// Below this many degrees a rotation is treated as none.
const ROTATION_EPSILON_DEG: f64 = 1e-9;

/// High-quality (Lanczos3) resize of a premultiplied raster.
pub fn resize_premul(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    let mut out = image::imageops::resize(src, width, height, FilterType::Lanczos3);
    // Lanczos ringing can push colour above alpha; keep the premultiplied invariant.
    for px in out.pixels_mut() {
        let a = px.0[3];
        for c in &mut px.0[..3] {
            *c = (*c).min(a);
        }
    }
    out
}

/// Size of the axis-aligned box containing a `w` x `h` raster rotated by `degrees`.
pub fn rotated_bounds(w: u32, h: u32, degrees: f64) -> (u32, u32) {
    let theta = degrees.to_radians();
    let (s, c) = theta.sin_cos();
    let (w, h) = (f64::from(w), f64::from(h));
    let bw = w * c.abs() + h * s.abs();
    let bh = w * s.abs() + h * c.abs();
    // Trim float noise so an exact fit does not grow by a pixel.
    (
        ((bw - 1e-6).ceil() as u32).max(1),
        ((bh - 1e-6).ceil() as u32).max(1),
    )
}

/// Rotate a premultiplied raster counter-clockwise by `degrees` about its centre.
///
/// The output canvas is expanded to hold the whole rotated raster; uncovered pixels are
/// transparent. Sampling is bicubic.
pub fn rotate_expand(src: &RgbaImage, degrees: f64) -> RgbaImage {
    if degrees.abs() < ROTATION_EPSILON_DEG {
        return src.clone();
    }
    let (sw, sh) = src.dimensions();
    let (dw, dh) = rotated_bounds(sw, sh, degrees);

    // Screen space is y-down, so a counter-clockwise turn is a negative kurbo rotation.
    let forward = Affine::translate((f64::from(dw) / 2.0, f64::from(dh) / 2.0))
        * Affine::rotate(-degrees.to_radians())
        * Affine::translate((-f64::from(sw) / 2.0, -f64::from(sh) / 2.0));
    let inverse = forward.inverse();

    let mut out = RgbaImage::new(dw, dh);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        px.0 = sample_bicubic(src, p.x - 0.5, p.y - 0.5);
    }
    out
}

/// Cubic convolution kernel coefficient, matching the common bicubic resampler.
const CUBIC_A: f64 = -0.5;

fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn sample_bicubic(src: &RgbaImage, fx: f64, fy: f64) -> [u8; 4] {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    if fx <= -2.0 || fy <= -2.0 || fx >= (w + 1) as f64 || fy >= (h + 1) as f64 {
        return [0, 0, 0, 0];
    }

    let x0 = fx.floor();
    let y0 = fy.floor();
    let (tx, ty) = (fx - x0, fy - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);
    // Taps at offsets -1..=2 around the sample.
    let wx: [f64; 4] = std::array::from_fn(|k| cubic_weight(tx - (k as f64 - 1.0)));
    let wy: [f64; 4] = std::array::from_fn(|k| cubic_weight(ty - (k as f64 - 1.0)));

    let mut acc = [0.0f64; 4];
    for (j, wy) in wy.iter().enumerate() {
        let y = y0 + j as i64 - 1;
        if y < 0 || y >= h {
            continue;
        }
        for (i, wx) in wx.iter().enumerate() {
            let x = x0 + i as i64 - 1;
            if x < 0 || x >= w {
                continue;
            }
            let p = src.get_pixel(x as u32, y as u32).0;
            let weight = wx * wy;
            for (a, c) in acc.iter_mut().zip(p) {
                *a += f64::from(c) * weight;
            }
        }
    }

    let mut out = acc.map(|v| v.round().clamp(0.0, 255.0) as u8);
    // Cubic overshoot can push colour above alpha.
    let alpha = out[3];
    for c in &mut out[..3] {
        *c = (*c).min(alpha);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
