use super::*;

#[test]
fn endpoints_are_fixed() {
    for ease in [Ease::Linear, Ease::InOutCubic] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn in_out_cubic_is_symmetric_about_half() {
    let e = Ease::InOutCubic;
    assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
    for t in [0.1, 0.2, 0.3, 0.4] {
        assert!((e.apply(t) + e.apply(1.0 - t) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn in_out_cubic_slows_near_boundaries() {
    let e = Ease::InOutCubic;
    assert!((e.apply(0.25) - 0.0625).abs() < 1e-12);
    assert!(e.apply(0.05) < 0.05);
    assert!(e.apply(0.95) > 0.95);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InOutCubic.apply(-2.0), 0.0);
    assert_eq!(Ease::Linear.apply(7.0), 1.0);
}
