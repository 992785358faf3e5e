use super::*;
use crate::animation::path::{ControlPointPath, PathStyle};

fn motion(path: Vec<Point>) -> MotionSpec {
    MotionSpec {
        scale_base: 0.4,
        scale_target: 0.6,
        angle_base: 5.0,
        breathe_amount: 0.03,
        breathe_speed: 1.0,
        pulse_amount: 0.009,
        pulse_speed: 2.7,
        rotation_speed: 1.0,
        tilt_factor: 0.15,
        path_style: PathStyle::Circle,
        path_speed: 1.0,
        path: ControlPointPath::new(path).unwrap(),
    }
}

fn still() -> MotionSpec {
    let p = Point::new(50.0, 60.0);
    motion(vec![p, p, p])
}

#[test]
fn clip_time_is_linear_and_reaches_one() {
    assert_eq!(clip_time(0, 1), 0.0);
    assert_eq!(clip_time(0, 120), 0.0);
    assert_eq!(clip_time(119, 120), 1.0);
    assert!((clip_time(60, 121) - 0.5).abs() < 1e-12);
}

#[test]
fn scale_starts_at_base_and_ends_at_target() {
    let synth = TransformSynthesizer::default();
    let m = still();

    let at0 = synth.transform(&m, 0.0);
    // At t=0 only the phase-shifted pulse and micro terms contribute.
    let pulse0 = m.pulse_amount * 0.7f64.sin();
    let micro0 = m.breathe_amount * 0.1 * 1.3f64.sin();
    assert!((at0.scale_x - 0.4 * (1.0 + pulse0 + micro0)).abs() < 1e-12);
    assert!((at0.scale_y - 0.4 * (1.0 + pulse0 + 1.2 * micro0)).abs() < 1e-12);

    let at1 = synth.transform(&m, 1.0);
    let breathe1 = m.breathe_amount * (TAU * m.breathe_speed).sin();
    let pulse1 = m.pulse_amount * (TAU * m.pulse_speed + 0.7).sin();
    let micro1 = m.breathe_amount * 0.1 * (TAU * 3.7 + 1.3).sin();
    assert!((at1.scale_x - 0.6 * (1.0 + breathe1 + pulse1 + micro1)).abs() < 1e-12);
}

#[test]
fn scale_is_anisotropic() {
    let synth = TransformSynthesizer::default();
    let tr = synth.transform(&still(), 0.3);
    assert_ne!(tr.scale_x, tr.scale_y);
}

#[test]
fn stationary_sprite_has_no_direction_tilt() {
    let synth = TransformSynthesizer::default();
    let m = still();
    for t in [0.0, 0.2, 0.77] {
        let tr = synth.transform(&m, t);
        let expected = m.angle_base
            + m.angle_base * (TAU * t * m.rotation_speed).sin() * 0.3
            + 2.0 * (TAU * t * 0.7).sin();
        assert!((tr.rotation_deg - expected).abs() < 1e-12);
        assert_eq!(tr.position, Point::new(50.0, 60.0));
    }
}

#[test]
fn moving_sprite_leans_into_travel_direction() {
    let synth = TransformSynthesizer::default();
    // Straight downward path: heading +90 degrees.
    let m = motion(vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 100.0),
        Point::new(0.0, 200.0),
        Point::new(0.0, 300.0),
        Point::new(0.0, 400.0),
    ]);
    let t = 0.2;
    let tr = synth.transform(&m, t);
    let without_tilt = m.angle_base
        + m.angle_base * (TAU * t * m.rotation_speed).sin() * 0.3
        + 2.0 * (TAU * t * 0.7).sin();
    let tilt = tr.rotation_deg - without_tilt;
    // Full-strength tilt: 90 * 0.15.
    assert!((tilt - 13.5).abs() < 1e-6, "tilt {tilt}");
}

#[test]
fn transforms_are_pure_functions_of_time() {
    let synth = TransformSynthesizer::default();
    let m = motion(vec![
        Point::new(10.0, 10.0),
        Point::new(90.0, 30.0),
        Point::new(40.0, 80.0),
    ]);
    assert_eq!(synth.transform(&m, 0.42), synth.transform(&m, 0.42));
}
