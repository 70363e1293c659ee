//! Structural equality assertions for lists, sets and maps.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use crate::error::{AssertionFailure, FailureKind};
use crate::report::raise_on_err;

/// Set types that can be compared by membership.
pub trait SetLike<T> {
    fn item_count(&self) -> usize;
    fn contains_item(&self, item: &T) -> bool;
    fn items(&self) -> Vec<&T>;
}

impl<T: Eq + Hash, S: BuildHasher> SetLike<T> for HashSet<T, S> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn contains_item(&self, item: &T) -> bool {
        self.contains(item)
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T: Ord> SetLike<T> for BTreeSet<T> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn contains_item(&self, item: &T) -> bool {
        self.contains(item)
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

/// Map types that can be compared key by key.
pub trait MapLike<K, V> {
    fn entry_count(&self) -> usize;
    fn lookup(&self, key: &K) -> Option<&V>;
    fn entries(&self) -> Vec<(&K, &V)>;
}

impl<K: Eq + Hash, V, S: BuildHasher> MapLike<K, V> for HashMap<K, V, S> {
    fn entry_count(&self) -> usize {
        self.len()
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

impl<K: Ord, V> MapLike<K, V> for BTreeMap<K, V> {
    fn entry_count(&self) -> usize {
        self.len()
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}

/// Checks that two optional values are both present or both absent.
///
/// Returns the pair when both are present, `None` when both are absent.
pub fn check_presence<'a, T: Debug + ?Sized>(
    expected: Option<&'a T>,
    actual: Option<&'a T>,
) -> Result<Option<(&'a T, &'a T)>, AssertionFailure> {
    match (expected, actual) {
        (Some(expected), Some(actual)) => Ok(Some((expected, actual))),
        (None, None) => Ok(None),
        _ => Err(AssertionFailure::new(
            FailureKind::NullMismatch,
            "One object is null",
            format!("{expected:?}"),
            format!("{actual:?}"),
        )),
    }
}

fn check_size(what: &str, expected: usize, actual: usize) -> Result<(), AssertionFailure> {
    if expected == actual {
        return Ok(());
    }
    Err(AssertionFailure::new(
        FailureKind::SizeMismatch,
        format!("{what} have unequal sizes"),
        expected.to_string(),
        actual.to_string(),
    ))
}

/// Checks two lists element by element.
pub fn check_list_eq<T: PartialEq + Debug>(expected: &[T], actual: &[T]) -> Result<(), AssertionFailure> {
    check_size("Lists", expected.len(), actual.len())?;
    match expected.iter().zip(actual).position(|(e, a)| e != a) {
        None => Ok(()),
        Some(index) => Err(AssertionFailure::new(
            FailureKind::ElementMismatch,
            format!("At least one element of the lists are different (index {index})"),
            format!("{:?}", expected[index]),
            format!("{:?}", actual[index]),
        )),
    }
}

/// Checks that two sets have the same size and `actual` holds every
/// expected element.
pub fn check_set_eq<T, S>(expected: &S, actual: &S) -> Result<(), AssertionFailure>
where
    T: Debug,
    S: SetLike<T> + ?Sized,
{
    check_size("Sets", expected.item_count(), actual.item_count())?;
    match expected.items().into_iter().find(|item| !actual.contains_item(item)) {
        None => Ok(()),
        Some(missing) => Err(AssertionFailure::new(
            FailureKind::ElementMismatch,
            "actual does not contain all of expected",
            format!("{missing:?}"),
            format!("{:?}", actual.items()),
        )),
    }
}

/// Checks that two maps hold the same keys with equal values.
pub fn check_map_eq<K, V, M>(expected: &M, actual: &M) -> Result<(), AssertionFailure>
where
    K: Debug,
    V: PartialEq + Debug,
    M: MapLike<K, V> + ?Sized,
{
    check_size("Maps", expected.entry_count(), actual.entry_count())?;
    for (key, value) in expected.entries() {
        let Some(found) = actual.lookup(key) else {
            return Err(AssertionFailure::new(
                FailureKind::MissingKey,
                "maps do not contain the same keys",
                format!("{key:?}"),
                "<absent>",
            ));
        };
        if found != value {
            return Err(AssertionFailure::new(
                FailureKind::ValueMismatch,
                format!("maps do not have the same value for key {key:?}"),
                format!("{value:?}"),
                format!("{found:?}"),
            ));
        }
    }
    Ok(())
}

/// Compares two collections as lists in their iteration order.
///
/// Only meaningful when both sides iterate in a defined order, such as
/// `BTreeSet`.
pub fn check_sets_eq_as_lists<'a, T, I>(expected: I, actual: I) -> Result<(), AssertionFailure>
where
    T: PartialEq + Debug + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let expected: Vec<&T> = expected.into_iter().collect();
    let actual: Vec<&T> = actual.into_iter().collect();
    check_list_eq(&expected, &actual)
}

#[track_caller]
pub fn assert_presence<'a, T: Debug + ?Sized>(
    expected: Option<&'a T>,
    actual: Option<&'a T>,
) -> Option<(&'a T, &'a T)> {
    raise_on_err(check_presence(expected, actual))
}

#[track_caller]
pub fn assert_list_eq<T: PartialEq + Debug>(expected: &[T], actual: &[T]) {
    raise_on_err(check_list_eq(expected, actual));
}

#[track_caller]
pub fn assert_set_eq<T, S>(expected: &S, actual: &S)
where
    T: Debug,
    S: SetLike<T> + ?Sized,
{
    raise_on_err(check_set_eq(expected, actual));
}

#[track_caller]
pub fn assert_map_eq<K, V, M>(expected: &M, actual: &M)
where
    K: Debug,
    V: PartialEq + Debug,
    M: MapLike<K, V> + ?Sized,
{
    raise_on_err(check_map_eq(expected, actual));
}

#[track_caller]
pub fn assert_sets_eq_as_lists<'a, T, I>(expected: I, actual: I)
where
    T: PartialEq + Debug + 'a,
    I: IntoIterator<Item = &'a T>,
{
    raise_on_err(check_sets_eq_as_lists(expected, actual));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn presence_combinations() {
        let list = vec![1.0, 2.0];
        assert_eq!(check_presence::<Vec<f64>>(None, None), Ok(None));
        assert!(check_presence(Some(&list), Some(&list)).unwrap().is_some());

        let failure = check_presence(None, Some(&list)).unwrap_err();
        assert_eq!(failure.kind, FailureKind::NullMismatch);
        assert_eq!(failure.expected, "None");

        let failure = check_presence(Some(&list), None).unwrap_err();
        assert_eq!(failure.actual, "None");
    }

    #[test]
    fn list_equality() {
        let mut expected = vec![1.0, 2.0];
        let actual = vec![1.0, 2.0];
        assert_list_eq(&expected, &actual);

        expected.push(3.0);
        let failure = check_list_eq(&expected, &actual).unwrap_err();
        assert_eq!(failure.kind, FailureKind::SizeMismatch);
        assert_eq!((failure.expected.as_str(), failure.actual.as_str()), ("3", "2"));

        expected.remove(0);
        let failure = check_list_eq(&expected, &actual).unwrap_err();
        assert_eq!(failure.kind, FailureKind::ElementMismatch);
        assert!(failure.message.contains("index 0"));
    }

    #[test]
    fn empty_lists_are_equal() {
        assert!(check_list_eq::<i32>(&[], &[]).is_ok());
    }

    #[test]
    fn set_equality() {
        let mut expected: HashSet<i32> = [1, 2].into_iter().collect();
        let actual: HashSet<i32> = [2, 1].into_iter().collect();
        assert_set_eq(&expected, &actual);

        expected.insert(3);
        let failure = check_set_eq(&expected, &actual).unwrap_err();
        assert_eq!(failure.kind, FailureKind::SizeMismatch);

        expected.remove(&1);
        let failure = check_set_eq(&expected, &actual).unwrap_err();
        assert_eq!(failure.kind, FailureKind::ElementMismatch);
        assert_eq!(failure.expected, "3");
    }

    #[test]
    fn btree_set_equality() {
        let expected: BTreeSet<&str> = ["a", "b"].into_iter().collect();
        let actual: BTreeSet<&str> = ["b", "c"].into_iter().collect();
        assert!(check_set_eq(&expected, &expected).is_ok());
        assert!(check_set_eq(&expected, &actual).is_err());
    }

    #[test]
    fn map_equality() {
        let mut expected: HashMap<String, f64> =
            [("A".to_string(), 1.0), ("B".to_string(), 2.0)].into_iter().collect();
        let actual = expected.clone();
        assert_map_eq(&expected, &actual);

        expected.insert("C".to_string(), 3.0);
        let failure = check_map_eq(&expected, &actual).unwrap_err();
        assert_eq!(failure.kind, FailureKind::SizeMismatch);

        expected.remove("A");
        let failure = check_map_eq(&expected, &actual).unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingKey);
        assert_eq!(failure.expected, "\"C\"");
    }

    #[test]
    fn map_value_mismatch() {
        let expected: BTreeMap<&str, i32> = [("A", 1), ("B", 2)].into_iter().collect();
        let actual: BTreeMap<&str, i32> = [("A", 1), ("B", 5)].into_iter().collect();
        let failure = check_map_eq(&expected, &actual).unwrap_err();
        assert_eq!(failure.kind, FailureKind::ValueMismatch);
        assert_eq!((failure.expected.as_str(), failure.actual.as_str()), ("2", "5"));
    }

    #[test]
    fn ordered_sets_as_lists() {
        let expected: BTreeSet<u32> = (0..5).collect();
        let actual: BTreeSet<u32> = (0..5).rev().collect();
        assert_sets_eq_as_lists(&expected, &actual);

        let shorter: BTreeSet<u32> = (0..4).collect();
        assert!(check_sets_eq_as_lists(&expected, &shorter).is_err());
    }

    #[test]
    #[should_panic(expected = "Lists have unequal sizes")]
    fn assert_list_eq_panics() {
        assert_list_eq(&[1], &[1, 2]);
    }
}
