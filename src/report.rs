//! Turns an [`AssertionFailure`] into a test failure.
//!
//! The panic text mirrors `assert_eq!` so agreement failures read like any
//! other equality failure in test output.

use pretty_assertions::StrComparison;

use crate::error::AssertionFailure;

/// Renders the panic message for a failure.
pub fn render(failure: &AssertionFailure) -> String {
    let header = if failure.message.is_empty() {
        format!("assertion failed: `(expected == actual)` ({})", failure.kind)
    } else {
        format!(
            "assertion failed: `(expected == actual)` ({}): {}",
            failure.kind, failure.message
        )
    };
    format!(
        "{header}\n\n{}\n",
        StrComparison::new(&failure.expected, &failure.actual)
    )
}

/// Fails the current test with `failure`.
#[track_caller]
pub fn raise(failure: &AssertionFailure) -> ! {
    panic!("{}", render(failure))
}

/// Raises the failure carried by `result`, if any.
#[track_caller]
pub fn raise_on_err<T>(result: Result<T, AssertionFailure>) -> T {
    match result {
        Ok(value) => value,
        Err(failure) => raise(&failure),
    }
}
