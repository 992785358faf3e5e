use super::*;

fn params(w: u32, h: u32, move_range: f64) -> PathParams {
    let canvas = Canvas::new(w, h).unwrap();
    PathParams::new(canvas, canvas.center(), move_range)
}

#[test]
fn identical_seed_reproduces_identical_paths() {
    let p = params(768, 432, 120.0);
    for style in [
        PathStyle::Circle,
        PathStyle::Figure8,
        PathStyle::Wave,
        PathStyle::Organic,
        PathStyle::FixedMicro,
        PathStyle::Roaming,
    ] {
        let a = generate_path(style, &p, &mut Rng64::new(99)).unwrap();
        let b = generate_path(style, &p, &mut Rng64::new(99)).unwrap();
        assert_eq!(a, b, "style {style}");
        if style != PathStyle::Wave {
            // Wave anchors only draw their count, so two seeds may coincide.
            let c = generate_path(style, &p, &mut Rng64::new(100)).unwrap();
            assert_ne!(a, c, "style {style} should depend on the seed");
        }
    }
}

#[test]
fn circle_anchor_radius_stays_within_jitter_band() {
    let p = params(1000, 1000, 100.0);
    let anchors = generate_anchors(PathStyle::Circle, &p, &mut Rng64::new(7));
    assert!((6..=9).contains(&anchors.len()));
    for a in anchors {
        let d = a.distance(p.base);
        assert!((70.0 - 1e-9..=100.0 + 1e-9).contains(&d), "distance {d}");
    }
}

#[test]
fn parametric_anchors_are_clamped_to_margin() {
    // A huge range forces every style against the margins.
    let p = params(200, 100, 1000.0);
    let margin = p.canvas.margin();
    for style in [
        PathStyle::Circle,
        PathStyle::Figure8,
        PathStyle::Wave,
        PathStyle::Organic,
    ] {
        let path = generate_path(style, &p, &mut Rng64::new(3)).unwrap();
        for pt in path.points() {
            assert!(pt.x >= margin - 1e-9 && pt.x <= 200.0 - margin + 1e-9);
        }
        let anchors = generate_anchors(style, &p, &mut Rng64::new(3));
        for pt in anchors.iter().skip(usize::from(style == PathStyle::Organic)) {
            assert!(pt.y >= margin - 1e-9 && pt.y <= 100.0 - margin + 1e-9);
        }
    }
}

#[test]
fn spline_passes_through_every_anchor() {
    let canvas = Canvas::new(400, 400).unwrap();
    let anchors = vec![
        Point::new(100.0, 100.0),
        Point::new(300.0, 120.0),
        Point::new(280.0, 300.0),
        Point::new(120.0, 260.0),
    ];
    let path = smooth_closed(&anchors, 4, canvas).unwrap();
    assert_eq!(path.len(), anchors.len() * 4);
    for (j, a) in anchors.iter().enumerate() {
        assert_eq!(path.points()[j * 4], *a);
    }
    // Catmull-Rom at t=0.5 of a symmetric span lands between the two anchors.
    let mid = path.points()[2];
    assert!(mid.x > 100.0 && mid.x < 300.0);
}

#[test]
fn fixed_micro_is_raw_and_small() {
    let p = params(768, 432, 100.0);
    let path = generate_path(PathStyle::FixedMicro, &p, &mut Rng64::new(5)).unwrap();
    assert_eq!(path.len(), 8);
    let amp = 432.0 * 0.02;
    for pt in path.points() {
        assert!((pt.x - p.base.x).abs() <= amp + 1e-9);
        assert!((pt.y - p.base.y).abs() <= amp + 1e-9);
    }
}

#[test]
fn organic_loop_starts_at_base() {
    let p = params(768, 432, 100.0);
    let anchors = generate_anchors(PathStyle::Organic, &p, &mut Rng64::new(11));
    assert_eq!(anchors[0], p.base);
    // base + 3 key points + 1..=2 intermediates per key point
    assert!((7..=10).contains(&anchors.len()));
    let path = generate_path(PathStyle::Organic, &p, &mut Rng64::new(11)).unwrap();
    assert_eq!(path.len(), anchors.len() * 4);
}

#[test]
fn roaming_uses_five_subsegments_and_stays_inside() {
    let p = params(768, 432, 100.0);
    let anchors = generate_anchors(PathStyle::Roaming, &p, &mut Rng64::new(21));
    assert!((4..=6).contains(&anchors.len()));
    let path = generate_path(PathStyle::Roaming, &p, &mut Rng64::new(21)).unwrap();
    assert_eq!(path.len(), anchors.len() * 5);
    let m = p.canvas.margin();
    for pt in path.points() {
        assert!(pt.x >= m - 1e-9 && pt.x <= 768.0 - m + 1e-9);
        assert!(pt.y >= m - 1e-9 && pt.y <= 432.0 - m + 1e-9);
    }
}

#[test]
fn too_few_anchors_is_degenerate() {
    let canvas = Canvas::new(100, 100).unwrap();
    let err = smooth_closed(&[Point::new(50.0, 50.0)], 4, canvas).unwrap_err();
    assert!(matches!(err, PaperdanceError::DegeneratePath(_)));
    assert!(ControlPointPath::new(vec![]).is_err());
    assert!(ControlPointPath::new(vec![Point::ZERO, Point::new(1.0, 1.0)]).is_ok());
}

#[test]
fn style_names_round_trip_through_str_and_serde() {
    for style in [
        PathStyle::Circle,
        PathStyle::Figure8,
        PathStyle::Wave,
        PathStyle::Organic,
        PathStyle::FixedMicro,
        PathStyle::Roaming,
    ] {
        assert_eq!(style.as_str().parse::<PathStyle>().unwrap(), style);
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, format!("\"{}\"", style.as_str()));
    }
    assert!("spiral".parse::<PathStyle>().is_err());
}

#[test]
fn deserializing_short_paths_is_rejected() {
    for json in [
        r#"{"points":[]}"#,
        r#"{"points":[{"x":1.0,"y":2.0}]}"#,
    ] {
        let err = serde_json::from_str::<ControlPointPath>(json).unwrap_err();
        assert!(err.to_string().contains("at least 2 points"), "{err}");
    }

    let path: ControlPointPath =
        serde_json::from_str(r#"{"points":[{"x":1.0,"y":2.0},{"x":3.0,"y":4.0}]}"#).unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path.points()[1], Point::new(3.0, 4.0));
}
