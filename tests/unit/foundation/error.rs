use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PaperdanceError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PaperdanceError::degenerate_path("x")
            .to_string()
            .contains("degenerate path:")
    );
    assert!(
        PaperdanceError::enhancement("x")
            .to_string()
            .contains("enhancement error:")
    );
    assert!(
        PaperdanceError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(PaperdanceError::io("x").to_string().contains("io error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PaperdanceError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_enhancement_is_non_fatal() {
    assert!(!PaperdanceError::enhancement("x").is_fatal());
    assert!(PaperdanceError::validation("x").is_fatal());
    assert!(PaperdanceError::encoding("x").is_fatal());
    assert!(PaperdanceError::Cancelled.is_fatal());
}
