use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_on_opaque_blends() {
    // Premultiplied white at 50% over opaque black.
    let out = over([0, 0, 0, 255], [128, 128, 128, 128]);
    assert_eq!(out, [128, 128, 128, 255]);
}

#[test]
fn over_at_clips_negative_offsets() {
    let mut dst = vec![0u8; 4 * 4 * 4];
    for px in dst.chunks_exact_mut(4) {
        px[3] = 255;
    }
    let src = RgbaImage::from_pixel(3, 3, image::Rgba([255, 0, 0, 255]));
    over_at(&mut dst, 4, 4, &src, -2, -1);
    // Covers x in [0,1), y in [0,2).
    let px = |x: usize, y: usize| &dst[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
    assert_eq!(px(0, 0), &[255, 0, 0, 255]);
    assert_eq!(px(0, 1), &[255, 0, 0, 255]);
    assert_eq!(px(1, 0), &[0, 0, 0, 255]);
    assert_eq!(px(0, 2), &[0, 0, 0, 255]);
}

#[test]
fn over_at_fully_outside_is_noop() {
    let mut dst = vec![7u8; 2 * 2 * 4];
    let before = dst.clone();
    let src = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
    over_at(&mut dst, 2, 2, &src, 5, 0);
    over_at(&mut dst, 2, 2, &src, -2, -2);
    assert_eq!(dst, before);
}
