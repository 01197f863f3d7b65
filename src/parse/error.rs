use thiserror::Error;

/// Errors produced when parsing rule DSL text.
///
/// The message carries the offending line and column as rendered by the
/// parser, followed by what was expected there.
#[derive(Debug, Error)]
#[error("invalid rule text: {message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    #[test]
    fn error_display() {
        let err = ParseError::new("expected when clause");
        assert_eq!(err.to_string(), "invalid rule text: expected when clause");
    }

    #[test]
    fn missing_watch_is_reported() {
        let err = parse("rule r:\n    when value == \"a\"").unwrap_err();
        assert!(err.message().contains("watch clause"), "{err}");
    }

    #[test]
    fn unterminated_string_fails() {
        assert!(parse("rule r:\n    watch x\n    when value == \"open").is_err());
    }

    #[test]
    fn trailing_garbage_fails() {
        assert!(parse("rule r:\n    watch x\n    when value == \"a\"\n    ???").is_err());
    }
}
