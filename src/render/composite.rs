use image::RgbaImage;

use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Composite premultiplied `src` over `dst` (premultiplied RGBA8, `width` x `height`) with its
/// top-left corner at `(x, y)`. Parts outside `dst` are clipped.
pub fn over_at(dst: &mut [u8], width: u32, height: u32, src: &RgbaImage, x: i64, y: i64) {
    let (sw, sh) = src.dimensions();
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(sw)).min(i64::from(width));
    let y1 = (y + i64::from(sh)).min(i64::from(height));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_raw = src.as_raw();
    let row_px = (x1 - x0) as usize;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_off = (sy * sw as usize + sx) * 4;
        let d_off = (dy as usize * width as usize + x0 as usize) * 4;
        let s_row = &src_raw[s_off..s_off + row_px * 4];
        let d_row = &mut dst[d_off..d_off + row_px * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
