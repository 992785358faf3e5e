use super::*;

fn opaque(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([200, 100, 50, 255]))
}

#[test]
fn rotated_bounds_of_right_angles() {
    assert_eq!(rotated_bounds(40, 20, 0.0), (40, 20));
    assert_eq!(rotated_bounds(40, 20, 90.0), (20, 40));
    assert_eq!(rotated_bounds(40, 20, 180.0), (40, 20));
}

#[test]
fn rotated_bounds_expand_for_diagonals() {
    let (w, h) = rotated_bounds(10, 10, 45.0);
    // 10 * sqrt(2) ~= 14.14
    assert_eq!((w, h), (15, 15));
}

#[test]
fn zero_rotation_is_identity() {
    let src = opaque(5, 7);
    assert_eq!(rotate_expand(&src, 0.0), src);
}

#[test]
fn rotation_keeps_centre_and_clears_corners() {
    let src = opaque(20, 20);
    let out = rotate_expand(&src, 45.0);
    assert_eq!(out.dimensions(), (29, 29));
    assert_eq!(out.get_pixel(14, 14).0, [200, 100, 50, 255]);
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(out.get_pixel(28, 28).0, [0, 0, 0, 0]);
}

#[test]
fn quarter_turn_is_counter_clockwise() {
    // Mark the top-right pixel; a CCW quarter turn moves it to top-left.
    let mut src = RgbaImage::from_pixel(4, 2, image::Rgba([0, 0, 0, 0]));
    src.put_pixel(3, 0, image::Rgba([255, 255, 255, 255]));
    let out = rotate_expand(&src, 90.0);
    assert_eq!(out.dimensions(), (2, 4));
    assert_eq!(out.get_pixel(0, 0).0[3], 255);
    assert_eq!(out.get_pixel(1, 3).0[3], 0);
}

#[test]
fn resize_keeps_premultiplied_invariant() {
    let mut src = RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 0]));
    for y in 2..6 {
        for x in 2..6 {
            src.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
        }
    }
    let out = resize_premul(&src, 5, 3);
    assert_eq!(out.dimensions(), (5, 3));
    for px in out.pixels() {
        assert!(px.0[0] <= px.0[3]);
    }
}

#[test]
fn cubic_kernel_interpolates_and_overshoots() {
    assert_eq!(cubic_weight(0.0), 1.0);
    assert_eq!(cubic_weight(1.0), 0.0);
    assert_eq!(cubic_weight(2.0), 0.0);
    assert!(cubic_weight(1.5) < 0.0);
    let sum: f64 = [-1.0, 0.0, 1.0, 2.0]
        .iter()
        .map(|k| cubic_weight(0.3 - k))
        .sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn rotation_keeps_premultiplied_invariant_at_hard_edges() {
    // An opaque block on a transparent field rings under a cubic filter.
    let mut src = RgbaImage::from_pixel(16, 16, image::Rgba([0, 0, 0, 0]));
    for y in 4..12 {
        for x in 4..12 {
            src.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
        }
    }
    let out = rotate_expand(&src, 30.0);
    for px in out.pixels() {
        let [r, g, b, a] = px.0;
        assert!(r <= a && g <= a && b <= a, "{:?}", px.0);
    }
    let (w, h) = out.dimensions();
    assert_eq!(out.get_pixel(w / 2, h / 2).0, [255, 255, 255, 255]);
}
