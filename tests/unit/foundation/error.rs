use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PackError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        PackError::InvalidSource(PathBuf::from("a.txt"))
            .to_string()
            .contains("invalid source: 'a.txt'")
    );
    assert!(
        PackError::NoFramesFound(PathBuf::from("empty"))
            .to_string()
            .contains("no frames found in 'empty'")
    );
}

#[test]
fn validation_lists_every_violation() {
    let err = PackError::Validation(vec![
        Violation {
            field: "width",
            message: "width is too small: 0".to_string(),
        },
        Violation {
            field: "fps",
            message: "fps is too small: -1".to_string(),
        },
    ]);
    let msg = err.to_string();
    assert!(msg.starts_with("validation error:"));
    assert!(msg.contains("width is too small: 0"));
    assert!(msg.contains("fps is too small: -1"));
}

#[test]
fn frame_error_carries_index_path_and_source() {
    let err = PackError::frame(7, "in/frame-7.png", PackError::decode("bad data"));
    let msg = err.to_string();
    assert!(msg.contains("frame 7"));
    assert!(msg.contains("in/frame-7.png"));
    assert!(msg.contains("bad data"));

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("bad data"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PackError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
