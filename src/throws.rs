//! Assertions that an operation fails in a specific way.
//!
//! The operation is always a closure. Errors are matched by downcasting an
//! [`anyhow::Error`], so an error wrapped in `.context(..)` still matches
//! its source type. Panics are caught with [`std::panic::catch_unwind`].

use std::any::{type_name, Any};
use std::error::Error as StdError;
use std::panic::{self, UnwindSafe};

use crate::error::{append_custom, AssertionFailure, FailureKind};
use crate::report::raise_on_err;

fn no_error<E>(custom: &str) -> AssertionFailure {
    AssertionFailure::new(
        FailureKind::NoError,
        append_custom(
            format!("Expected {}, but no error was returned", type_name::<E>()),
            custom,
        ),
        type_name::<E>(),
        "Ok(..)",
    )
}

/// Runs `thrower` and checks that it fails with an error of type `E`.
///
/// Returns the caught error so further checks can inspect it.
pub fn check_throws<E, T, F>(thrower: F, custom: &str) -> Result<anyhow::Error, AssertionFailure>
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
{
    let Err(err) = thrower() else {
        return Err(no_error::<E>(custom));
    };
    if err.downcast_ref::<E>().is_some() {
        return Ok(err);
    }
    Err(AssertionFailure::new(
        FailureKind::WrongErrorKind,
        append_custom(format!("Expected {}, but was {err:?}", type_name::<E>()), custom),
        type_name::<E>(),
        format!("{err:#}"),
    ))
}

/// Like [`check_throws`], and the error's message must equal
/// `expected_message` exactly.
pub fn check_throws_with_message<E, T, F>(
    expected_message: &str,
    thrower: F,
    custom: &str,
) -> Result<anyhow::Error, AssertionFailure>
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
{
    let Err(err) = thrower() else {
        return Err(no_error::<E>(custom));
    };
    let actual_message = err
        .downcast_ref::<E>()
        .map(ToString::to_string);
    if actual_message.as_deref() == Some(expected_message) {
        return Ok(err);
    }
    Err(AssertionFailure::new(
        FailureKind::WrongErrorMessage,
        append_custom(
            format!(
                "Expected {} with message {expected_message}, but was {err:?} with message {}",
                type_name::<E>(),
                actual_message.unwrap_or_else(|| err.to_string()),
            ),
            custom,
        ),
        expected_message,
        err.to_string(),
    ))
}

/// Asserts that `thrower` fails with `E`.
#[track_caller]
pub fn assert_throws<E, T, F>(thrower: F) -> anyhow::Error
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
{
    raise_on_err(check_throws::<E, T, F>(thrower, ""))
}

/// [`assert_throws`] with a custom message appended to the failure.
#[track_caller]
pub fn assert_throws_with_custom<E, T, F>(thrower: F, custom: &str) -> anyhow::Error
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
{
    raise_on_err(check_throws::<E, T, F>(thrower, custom))
}

/// Asserts that `thrower` fails with `E` carrying `expected_message`.
#[track_caller]
pub fn assert_throws_with_message<E, T, F>(expected_message: &str, thrower: F) -> anyhow::Error
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
{
    raise_on_err(check_throws_with_message::<E, T, F>(expected_message, thrower, ""))
}

/// Asserts that `thrower` fails with `E`, then hands the typed error to
/// `inspect` for further assertions.
#[track_caller]
pub fn assert_throws_and_inspect<E, T, F, I>(thrower: F, inspect: I)
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
    I: FnOnce(&E),
{
    assert_throws_and_inspect_with_custom::<E, T, F, I>(thrower, "", inspect);
}

/// [`assert_throws_and_inspect`] with a custom message appended to the
/// failure.
#[track_caller]
pub fn assert_throws_and_inspect_with_custom<E, T, F, I>(thrower: F, custom: &str, inspect: I)
where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
    I: FnOnce(&E),
{
    let err = raise_on_err(check_throws::<E, T, F>(thrower, custom));
    if let Some(typed) = err.downcast_ref::<E>() {
        inspect(typed);
    }
}

/// Asserts that `thrower` fails with `E` carrying `expected_message`, then
/// hands the typed error to `inspect`.
#[track_caller]
pub fn assert_throws_with_message_and_inspect<E, T, F, I>(
    expected_message: &str,
    thrower: F,
    custom: &str,
    inspect: I,
) where
    E: StdError + Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T>,
    I: FnOnce(&E),
{
    let err = raise_on_err(check_throws_with_message::<E, T, F>(
        expected_message,
        thrower,
        custom,
    ));
    if let Some(typed) = err.downcast_ref::<E>() {
        inspect(typed);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}

/// Runs `f` and checks that it panics. Returns the panic message when the
/// payload is a string.
pub fn check_panics<F, T>(f: F) -> Result<Option<String>, AssertionFailure>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(_) => Err(AssertionFailure::new(
            FailureKind::NoPanic,
            "Expected a panic, but the closure returned",
            "panic",
            "return",
        )),
        Err(payload) => Ok(panic_message(payload.as_ref()).map(str::to_string)),
    }
}

/// Runs `f` and checks that it panics with exactly `expected_message`.
pub fn check_panics_with_message<F, T>(expected_message: &str, f: F) -> Result<(), AssertionFailure>
where
    F: FnOnce() -> T + UnwindSafe,
{
    let message = check_panics(f)?;
    if message.as_deref() == Some(expected_message) {
        return Ok(());
    }
    Err(AssertionFailure::new(
        FailureKind::WrongPanicMessage,
        "panic message differs",
        expected_message,
        message.unwrap_or_else(|| "<non-string payload>".to_string()),
    ))
}

#[track_caller]
pub fn assert_panics<F, T>(f: F) -> Option<String>
where
    F: FnOnce() -> T + UnwindSafe,
{
    raise_on_err(check_panics(f))
}

#[track_caller]
pub fn assert_panics_with_message<F, T>(expected_message: &str, f: F)
where
    F: FnOnce() -> T + UnwindSafe,
{
    raise_on_err(check_panics_with_message(expected_message, f));
}

#[cfg(test)]
mod tests {
    use std::num::{ParseFloatError, ParseIntError};

    use anyhow::Context;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse_float(text: &str) -> anyhow::Result<f64> {
        Ok(text.parse::<f64>()?)
    }

    #[test]
    fn throws_expected_kind() {
        let err = assert_throws::<ParseFloatError, _, _>(|| parse_float("a"));
        assert!(err.to_string().contains("invalid float literal"));
    }

    #[test]
    fn throws_matches_through_context() {
        assert_throws::<ParseFloatError, _, _>(|| parse_float("a").context("reading config"));
    }

    #[test]
    fn throws_wrong_kind() {
        let failure = check_throws::<ParseIntError, _, _>(|| parse_float("a"), "").unwrap_err();
        assert_eq!(failure.kind, FailureKind::WrongErrorKind);
        assert!(failure.message.starts_with("Expected "));
        assert!(failure.message.contains("ParseIntError, but was"));
    }

    #[test]
    fn throws_missing_error() {
        let failure = check_throws::<ParseFloatError, _, _>(|| parse_float("1.0"), "ctx").unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoError);
        assert!(failure.message.ends_with("but no error was returned; ctx"));
    }

    #[test]
    fn throws_with_message() {
        assert_throws_with_message::<ParseFloatError, _, _>("invalid float literal", || parse_float("a"));

        let failure =
            check_throws_with_message::<ParseFloatError, _, _>("other", || parse_float("a"), "").unwrap_err();
        assert_eq!(failure.kind, FailureKind::WrongErrorMessage);
        assert_eq!(failure.expected, "other");
        assert_eq!(failure.actual, "invalid float literal");

        let failure = check_throws_with_message::<ParseIntError, _, _>(
            "invalid float literal",
            || parse_float("a"),
            "",
        )
        .unwrap_err();
        assert_eq!(failure.kind, FailureKind::WrongErrorMessage);

        let failure =
            check_throws_with_message::<ParseFloatError, _, _>("x", || parse_float("2"), "").unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoError);
    }

    #[test]
    fn throws_and_inspect() {
        let mut seen = None;
        assert_throws_and_inspect::<ParseFloatError, _, _, _>(
            || parse_float(""),
            |err| seen = Some(err.to_string()),
        );
        assert_eq!(seen.as_deref(), Some("cannot parse float from empty string"));
    }

    #[test]
    fn throws_with_message_and_inspect() {
        let mut seen = None;
        assert_throws_with_message_and_inspect::<ParseFloatError, _, _, _>(
            "invalid float literal",
            || parse_float("a").context("reading config"),
            "parsing",
            |err| seen = Some(err.to_string()),
        );
        assert_eq!(seen.as_deref(), Some("invalid float literal"));
    }

    #[test]
    #[should_panic(expected = "with message other, but was")]
    fn throws_with_message_and_inspect_wrong_message() {
        assert_throws_with_message_and_inspect::<ParseFloatError, _, _, _>(
            "other",
            || parse_float("a"),
            "",
            |_| panic!("inspect must not run"),
        );
    }

    #[test]
    #[should_panic(expected = "but no error was returned; parsing")]
    fn throws_and_inspect_with_custom_panics() {
        assert_throws_and_inspect_with_custom::<ParseFloatError, _, _, _>(
            || parse_float("3"),
            "parsing",
            |_| panic!("inspect must not run"),
        );
    }

    #[test]
    fn throws_and_inspect_with_custom() {
        let mut calls = 0;
        assert_throws_and_inspect_with_custom::<ParseIntError, _, _, _>(
            || Ok("x".parse::<i32>()?),
            "parsing",
            |_| calls += 1,
        );
        assert_eq!(calls, 1);
    }

    #[test]
    #[should_panic(expected = "but no error was returned; parsing")]
    fn assert_throws_with_custom_panics() {
        assert_throws_with_custom::<ParseFloatError, _, _>(|| parse_float("3"), "parsing");
    }

    #[test]
    fn panics_captured() {
        let message = assert_panics(|| panic!("boom {}", 1));
        assert_eq!(message.as_deref(), Some("boom 1"));
        assert_panics_with_message("static", || panic!("static"));
    }

    #[test]
    fn panics_missing_or_different() {
        let failure = check_panics(|| 1 + 1).unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoPanic);

        let failure = check_panics_with_message("a", || panic!("b")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::WrongPanicMessage);
        assert_eq!(failure.actual, "b");
    }
}
