pub type GlyphTraceResult<T> = Result<T, GlyphTraceError>;

#[derive(thiserror::Error, Debug)]
pub enum GlyphTraceError {
    /// One glyph's path data is malformed. Non-fatal to a batch rebuild: the
    /// builder substitutes an empty path for the offending glyph and keeps
    /// going.
    #[error("path parse error: {0}")]
    Parse(String),

    /// A setter was called in an order or with a value the animator cannot
    /// accept (e.g. a uniform color before any glyph strings exist).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A color table's length does not match the glyph count. Detected
    /// eagerly at rebuild time, never as an out-of-bounds access mid-frame.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphTraceError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GlyphTraceError::parse("x")
                .to_string()
                .contains("path parse error:")
        );
        assert!(
            GlyphTraceError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            GlyphTraceError::dimension_mismatch("x")
                .to_string()
                .contains("dimension mismatch:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GlyphTraceError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
