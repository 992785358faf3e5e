use super::*;
use crate::animation::path::PathStyle;

#[test]
fn json_defaults_apply() {
    let r: RenderRequest = serde_json::from_str(r#"{ "duration_seconds": 12 }"#).unwrap();
    assert_eq!(r, RenderRequest::new(12));
    assert_eq!((r.fps, r.width, r.height), (12, 768, 432));
    assert_eq!(r.n_frames(), 144);
}

#[test]
fn settings_are_keyed_by_sprite_index() {
    let r: RenderRequest = serde_json::from_str(
        r#"{ "duration_seconds": 10, "seed": 5, "settings": { "1": { "path_type": "circle" } } }"#,
    )
    .unwrap();
    assert_eq!(r.seed, Some(5));
    assert_eq!(r.settings[&1].path_type, Some(PathStyle::Circle));
    assert!(r.validate(&RenderLimits::default(), 2).is_ok());
    assert!(r.validate(&RenderLimits::default(), 1).is_err());
}

#[test]
fn duration_bounds_are_inclusive() {
    let limits = RenderLimits::default();
    for (secs, ok) in [(5, false), (9, false), (10, true), (25, true), (26, false)] {
        let res = RenderRequest::new(secs).validate(&limits, 1);
        assert_eq!(res.is_ok(), ok, "duration {secs}");
        if let Err(e) = res {
            assert!(matches!(e, PaperdanceError::Validation(_)));
        }
    }
}

#[test]
fn rejects_empty_sprites_and_odd_sizes() {
    let limits = RenderLimits::default();
    assert!(RenderRequest::new(10).validate(&limits, 0).is_err());

    let mut r = RenderRequest::new(10);
    r.width = 767;
    assert!(r.validate(&limits, 1).is_err());

    let mut r = RenderRequest::new(10);
    r.fps = 0;
    assert!(r.validate(&limits, 1).is_err());
}
