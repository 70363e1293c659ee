//! assert-extensions: extra assertions for Rust tests.
//!
//! Digits-of-agreement (LRE) checks for floats and decimals, structural
//! equality for collections, and expectations on failing operations.

pub mod cases;
pub mod collections;
pub mod error;
pub mod lre;
pub mod report;
pub mod throws;

pub use collections::{
    assert_list_eq, assert_map_eq, assert_presence, assert_set_eq, assert_sets_eq_as_lists,
    check_list_eq, check_map_eq, check_presence, check_set_eq, check_sets_eq_as_lists,
};
pub use error::{AssertionFailure, FailureKind};
pub use lre::{
    assert_agreement, assert_agreement_with_message, check_agreement, check_agreement_with_message,
    lexical_digits_of_agreement, log_relative_error, Agreement, Digits,
};
pub use throws::{
    assert_panics, assert_panics_with_message, assert_throws, assert_throws_and_inspect,
    assert_throws_and_inspect_with_custom, assert_throws_with_custom, assert_throws_with_message,
    assert_throws_with_message_and_inspect, check_panics, check_panics_with_message,
    check_throws, check_throws_with_message,
};

/// Asserts digits of agreement, optionally with a formatted message.
///
/// ```
/// use assert_extensions::assert_agreement;
///
/// assert_agreement!(0.0_f64, 1e-12, 12);
/// assert_agreement!(1.23456e-50_f64, 1.23499e-50, 3, "case {}", 4);
/// ```
#[macro_export]
macro_rules! assert_agreement {
    ($expected:expr, $actual:expr, $lre:expr $(,)?) => {
        $crate::lre::assert_agreement(&$expected, &$actual, $lre)
    };
    ($expected:expr, $actual:expr, $lre:expr, $($arg:tt)+) => {
        $crate::lre::assert_agreement_with_message(&::std::format!($($arg)+), &$expected, &$actual, $lre)
    };
}
