use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ShowreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ShowreelError::invalid_image("x")
            .to_string()
            .contains("invalid image:")
    );
    assert!(
        ShowreelError::no_source_images("x")
            .to_string()
            .contains("no source images:")
    );
    assert!(
        ShowreelError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        ShowreelError::upload("x")
            .to_string()
            .contains("upload error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ShowreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
