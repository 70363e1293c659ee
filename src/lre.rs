//! Log relative error (LRE) agreement assertions.
//!
//! LRE counts the significant decimal digits two values share. Binary
//! floats are measured analytically with logarithms; `BigDecimal` values
//! keep their exact digits, so those are compared lexically instead.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]

use std::fmt;

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::error::{with_custom, AssertionFailure, FailureKind};
use crate::report::raise_on_err;

/// Computed agreement between an expected and an actual value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Digits {
    /// The values are equal; every threshold is met.
    Exact,
    /// Analytic LRE of two floats, possibly negative or NaN.
    Measured(f64),
    /// Matching characters of two decimal strings.
    Counted(usize),
}

impl Digits {
    /// Whether this agreement satisfies a threshold of `lre` digits.
    pub fn meets(self, lre: i32) -> bool {
        match self {
            Self::Exact => true,
            // `as` saturates infinities and maps NaN to zero
            Self::Measured(value) => value.floor() as i32 >= lre,
            Self::Counted(count) => count >= usize::try_from(lre).unwrap_or(0),
        }
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("<LRE: exact>"),
            Self::Measured(value) => write!(f, "<LRE: {value:.6}>"),
            Self::Counted(count) => write!(f, "LRE: <{count}>"),
        }
    }
}

/// Log relative error of `actual` against `expected`.
///
/// Returns infinity when the two are exactly equal. With a zero `expected`
/// the relative error is undefined, so the result measures how close
/// `actual` itself is to zero.
#[must_use]
pub fn log_relative_error(expected: f64, actual: f64) -> f64 {
    if expected == actual {
        return f64::INFINITY;
    }
    if expected == 0.0 {
        -actual.abs().log10()
    } else {
        -(actual - expected).abs().log10() + expected.abs().log10()
    }
}

/// Counts leading characters two decimal renderings share.
///
/// Stops at the first mismatch or at an exponent marker on the expected
/// side. A matched decimal point is skipped without being counted.
#[must_use]
pub fn lexical_digits_of_agreement(expected: &str, actual: &str) -> usize {
    let mut count = 0;
    for (e, a) in expected.chars().zip(actual.chars()) {
        if e != a || e == 'E' || e == 'e' {
            break;
        }
        if e == '.' {
            continue;
        }
        count += 1;
    }
    count
}

/// Values whose digits of agreement can be measured.
pub trait Agreement {
    /// Digits of agreement between `self` (expected) and `actual`.
    fn digits_of_agreement(&self, actual: &Self) -> Digits;

    /// Rendering used in failure reports.
    fn render(&self) -> String;

    /// Checks that `actual` agrees with `self` to at least `lre` digits.
    fn check_agreement(&self, actual: &Self, lre: i32, message: &str) -> Result<(), AssertionFailure> {
        let digits = self.digits_of_agreement(actual);
        if digits.meets(lre) {
            return Ok(());
        }
        Err(AssertionFailure::new(
            FailureKind::Agreement,
            with_custom(message, &digits.to_string()),
            self.render(),
            actual.render(),
        ))
    }
}

impl Agreement for f64 {
    fn digits_of_agreement(&self, actual: &Self) -> Digits {
        if self == actual {
            Digits::Exact
        } else {
            Digits::Measured(log_relative_error(*self, *actual))
        }
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl Agreement for f32 {
    fn digits_of_agreement(&self, actual: &Self) -> Digits {
        f64::from(*self).digits_of_agreement(&f64::from(*actual))
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl Agreement for BigDecimal {
    fn digits_of_agreement(&self, actual: &Self) -> Digits {
        let expected_text = self.to_string();
        let actual_text = actual.to_string();
        // `==` on BigDecimal is numeric, so 0.0 and 0.0000 are equal
        if expected_text == actual_text || self == actual {
            Digits::Exact
        } else {
            Digits::Counted(lexical_digits_of_agreement(&expected_text, &actual_text))
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl<T: Agreement> Agreement for Option<T> {
    /// An absent value shares no digits with a present one.
    fn digits_of_agreement(&self, actual: &Self) -> Digits {
        match (self, actual) {
            (Some(expected), Some(actual)) => expected.digits_of_agreement(actual),
            (None, None) => Digits::Exact,
            _ => Digits::Counted(0),
        }
    }

    fn render(&self) -> String {
        self.as_ref()
            .map_or_else(|| "None".to_string(), |value| format!("Some({})", value.render()))
    }

    fn check_agreement(&self, actual: &Self, lre: i32, message: &str) -> Result<(), AssertionFailure> {
        match (self, actual) {
            (Some(expected), Some(actual)) => expected.check_agreement(actual, lre, message),
            (None, None) => Ok(()),
            _ => Err(AssertionFailure::new(
                FailureKind::NullMismatch,
                message,
                self.render(),
                actual.render(),
            )),
        }
    }
}

/// Checks that `actual` agrees with `expected` to at least `lre` digits.
pub fn check_agreement<T: Agreement + ?Sized>(
    expected: &T,
    actual: &T,
    lre: i32,
) -> Result<(), AssertionFailure> {
    expected.check_agreement(actual, lre, "")
}

/// [`check_agreement`] with a caller message embedded in the failure.
pub fn check_agreement_with_message<T: Agreement + ?Sized>(
    message: &str,
    expected: &T,
    actual: &T,
    lre: i32,
) -> Result<(), AssertionFailure> {
    expected.check_agreement(actual, lre, message)
}

/// Asserts that `actual` agrees with `expected` to at least `lre`
/// significant digits.
///
/// ```
/// use assert_extensions::assert_agreement;
///
/// assert_agreement(&1234.5678_f64, &1234.5679, 6);
/// ```
#[track_caller]
pub fn assert_agreement<T: Agreement + ?Sized>(expected: &T, actual: &T, lre: i32) {
    raise_on_err(check_agreement(expected, actual, lre));
}

/// [`assert_agreement`] with a caller message embedded in the failure.
#[track_caller]
pub fn assert_agreement_with_message<T: Agreement + ?Sized>(
    message: &str,
    expected: &T,
    actual: &T,
    lre: i32,
) {
    raise_on_err(check_agreement_with_message(message, expected, actual, lre));
}
