use super::*;

fn canvas() -> Canvas {
    Canvas::new(768, 432).unwrap()
}

#[test]
fn defaults_fall_inside_their_ranges() {
    for seed in 0..32 {
        let m = MotionSpec::build(&SpriteSettings::default(), canvas(), &mut Rng64::new(seed))
            .unwrap();
        assert!((0.35..0.6).contains(&m.scale_base));
        let variation = m.scale_target / m.scale_base;
        assert!((0.8 - 1e-9..1.25 + 1e-9).contains(&variation));
        assert!((-8.0..8.0).contains(&m.angle_base));
        assert!((0.02..0.05).contains(&m.breathe_amount));
        assert!((0.8..1.3).contains(&m.breathe_speed));
        assert!((0.7..1.3).contains(&m.rotation_speed));
        assert_eq!(m.tilt_factor, 0.15);
        assert_eq!(m.path_speed, 1.0);
        assert_eq!(m.path_style, PathStyle::Roaming);
    }
}

#[test]
fn pulse_is_derived_from_breathe() {
    let settings = SpriteSettings {
        breathe_amount: Some(0.05),
        breathe_speed: Some(1.0),
        ..Default::default()
    };
    let m = MotionSpec::build(&settings, canvas(), &mut Rng64::new(1)).unwrap();
    assert!((m.pulse_amount - 0.015).abs() < 1e-12);
    assert!((m.pulse_speed - 2.7).abs() < 1e-12);
}

#[test]
fn overriding_one_option_keeps_other_draws() {
    let a = MotionSpec::build(&SpriteSettings::default(), canvas(), &mut Rng64::new(8)).unwrap();
    let b = MotionSpec::build(
        &SpriteSettings {
            rotation: Some(4.0),
            ..Default::default()
        },
        canvas(),
        &mut Rng64::new(8),
    )
    .unwrap();
    assert_eq!(b.angle_base, 4.0);
    assert_eq!(a.scale_base, b.scale_base);
    assert_eq!(a.breathe_speed, b.breathe_speed);
    assert_eq!(a.path, b.path);
}

#[test]
fn explicit_settings_are_respected() {
    let settings = SpriteSettings {
        scale: Some(0.5),
        scale_variation: Some(2.0),
        position_x: Some(300.0),
        position_y: Some(200.0),
        path_type: Some(PathStyle::Circle),
        path_speed: Some(0.5),
        tilt_factor: Some(0.3),
        rotation_speed: Some(1.0),
        ..Default::default()
    };
    let m = MotionSpec::build(&settings, canvas(), &mut Rng64::new(2)).unwrap();
    assert_eq!(m.scale_base, 0.5);
    assert_eq!(m.scale_target, 1.0);
    assert_eq!(m.path_style, PathStyle::Circle);
    assert_eq!(m.path_speed, 0.5);
    assert_eq!(m.tilt_factor, 0.3);
    assert_eq!(m.rotation_speed, 1.0);
}

#[test]
fn style_resolution_rules() {
    let c = canvas();
    let fixed = SpriteSettings {
        fixed_position: Some(true),
        position_x: Some(100.0),
        position_y: Some(120.0),
        path_type: Some(PathStyle::Wave),
        ..Default::default()
    };
    assert_eq!(
        resolve_style(&fixed, c, PathStyle::Circle),
        (PathStyle::FixedMicro, Point::new(100.0, 120.0))
    );

    let positioned = SpriteSettings {
        position_x: Some(100.0),
        position_y: Some(120.0),
        ..Default::default()
    };
    assert_eq!(
        resolve_style(&positioned, c, PathStyle::Figure8),
        (PathStyle::Figure8, Point::new(100.0, 120.0))
    );

    let styled = SpriteSettings {
        path_type: Some(PathStyle::Organic),
        ..Default::default()
    };
    assert_eq!(
        resolve_style(&styled, c, PathStyle::Circle),
        (PathStyle::Organic, c.center())
    );

    assert_eq!(
        resolve_style(&SpriteSettings::default(), c, PathStyle::Circle).0,
        PathStyle::Roaming
    );
}

#[test]
fn micro_movement_override_scales_fixed_path() {
    let settings = SpriteSettings {
        fixed_position: Some(true),
        micro_movement: Some(0.0),
        ..Default::default()
    };
    let m = MotionSpec::build(&settings, canvas(), &mut Rng64::new(3)).unwrap();
    assert!(m.path.points().iter().all(|p| *p == canvas().center()));
}

#[test]
fn deserializing_an_empty_path_is_rejected() {
    let m = MotionSpec::build(&SpriteSettings::default(), canvas(), &mut Rng64::new(4)).unwrap();
    let mut value = serde_json::to_value(&m).unwrap();
    value["path"] = serde_json::json!({ "points": [] });
    assert!(serde_json::from_value::<MotionSpec>(value).is_err());

    let back: MotionSpec = serde_json::from_value(serde_json::to_value(&m).unwrap()).unwrap();
    assert_eq!(back.path.len(), m.path.len());
}
