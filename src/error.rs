//! Assertion failure type shared by every helper in the crate.
//!
//! `check_*` functions return an [`AssertionFailure`]; `assert_*` functions
//! hand the same value to [`crate::report::raise`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// What kind of check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Digits of agreement fell below the threshold.
    Agreement,
    /// One value was absent while the other was present.
    NullMismatch,
    /// Two collections have different lengths.
    SizeMismatch,
    /// Two lists differ at some index, or a set lacks an element.
    ElementMismatch,
    /// A map lacks one of the expected keys.
    MissingKey,
    /// A map holds a different value under an expected key.
    ValueMismatch,
    /// The operation succeeded when an error was expected.
    NoError,
    /// The operation failed with an error of another type.
    WrongErrorKind,
    /// The error had the right type but the wrong message.
    WrongErrorMessage,
    /// The closure returned instead of panicking.
    NoPanic,
    /// The panic payload did not match the expected message.
    WrongPanicMessage,
}

impl FailureKind {
    /// Short human description.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Agreement => "insufficient digits of agreement",
            Self::NullMismatch => "one value is absent",
            Self::SizeMismatch => "sizes differ",
            Self::ElementMismatch => "elements differ",
            Self::MissingKey => "key missing",
            Self::ValueMismatch => "values differ",
            Self::NoError => "no error returned",
            Self::WrongErrorKind => "wrong error type",
            Self::WrongErrorMessage => "wrong error message",
            Self::NoPanic => "no panic",
            Self::WrongPanicMessage => "wrong panic message",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A failed assertion, carrying the rendered values for an
/// expected-vs-actual report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message} (expected: {expected}, actual: {actual})")]
pub struct AssertionFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Diagnostic line, including any caller-supplied message.
    pub message: String,
    /// Rendered expected value.
    pub expected: String,
    /// Rendered actual value.
    pub actual: String,
}

impl AssertionFailure {
    pub fn new(
        kind: FailureKind,
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Prefixes `detail` with a caller message, separated by a space.
pub(crate) fn with_custom(custom: &str, detail: &str) -> String {
    if custom.is_empty() {
        detail.to_string()
    } else {
        format!("{custom} {detail}")
    }
}

/// Appends a caller message as `; custom`.
pub(crate) fn append_custom(detail: String, custom: &str) -> String {
    if custom.is_empty() {
        detail
    } else {
        format!("{detail}; {custom}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_values() {
        let failure = AssertionFailure::new(FailureKind::Agreement, "<LRE: 1.5>", "1.0", "1.1");
        let text = failure.to_string();
        assert!(text.starts_with("insufficient digits of agreement"));
        assert!(text.contains("expected: 1.0"));
        assert!(text.contains("actual: 1.1"));
    }

    #[test]
    fn custom_message_joining() {
        assert_eq!(with_custom("", "LRE: <3>"), "LRE: <3>");
        assert_eq!(with_custom("abc", "LRE: <3>"), "abc LRE: <3>");
        assert_eq!(append_custom("Expected X".into(), ""), "Expected X");
        assert_eq!(append_custom("Expected X".into(), "ctx"), "Expected X; ctx");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::NullMismatch).unwrap();
        assert_eq!(json, "\"null_mismatch\"");
    }
}
