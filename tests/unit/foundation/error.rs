use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RasterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RasterError::device("x")
            .to_string()
            .contains("device error:")
    );
    assert!(
        RasterError::dispatch("x")
            .to_string()
            .contains("dispatch error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RasterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_errors_convert_with_question_mark() {
    fn fails() -> RasterResult<()> {
        Err(anyhow::anyhow!("worker stalled"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, RasterError::Other(_)));
}
