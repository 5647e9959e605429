//! Set operations over normalized elements.
//!
//! All comparisons here run on the [normalized](crate::normalize::normalize)
//! form of each element, so two distinct values with the same plain-data
//! form count as equal. The operations return new collections of the same
//! kind holding clones of the original elements.

use std::collections::HashSet;
use std::convert::Infallible;

use serde_json::Value;

use crate::collection::{AnyCollection, Collection};
use crate::convert::Element;
use crate::error::{CollectionError, Result};
use crate::key::{Kind, KindId};
use crate::normalize::{contains, normalize, serialized};

impl<K: Kind> Collection<K>
where
    K::Item: Element + Clone + 'static,
{
    /// Elements of `self` whose normalized form does not appear in `other`.
    ///
    /// Elements are compared by their serialized normalized form.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::TypeMismatch`] when `other` is a collection
    /// of a different kind.
    ///
    /// # Example
    ///
    /// ```
    /// use assort::List;
    ///
    /// let a = List::from_iterable([1, 2, 3, 4, 5]);
    /// let b = List::from_iterable([1, 2, 3, 6, 7]);
    ///
    /// assert_eq!(a.diff(&b).unwrap().values(), vec![4, 5]);
    /// assert_eq!(b.diff(&a).unwrap().values(), vec![6, 7]);
    /// ```
    pub fn diff(&self, other: &dyn AnyCollection) -> Result<Self> {
        let other = other.as_any().downcast_ref::<Self>().ok_or_else(|| {
            CollectionError::TypeMismatch {
                expected: KindId::of::<K>().name(),
                actual: other.kind_id().name(),
            }
        })?;

        let excluded: HashSet<String> = other.items().map(|item| serialized(&normalize(item))).collect();

        Ok(self
            .items()
            .filter(|item| !excluded.contains(&serialized(&normalize(*item))))
            .cloned()
            .collect())
    }

    /// Elements seen before, in original order.
    ///
    /// The first occurrence of each value is never part of the result; every
    /// later occurrence is. With `uniques` the result is deduplicated so each
    /// repeated value appears once. Equality is strict (type and value) or
    /// loose (coerced) per `strict`.
    ///
    /// The cursor is rewound when the scan ends, including when normalizing
    /// an element panics.
    pub fn duplicates(&mut self, strict: bool, uniques: bool) -> Self {
        let mut seen: Vec<Value> = Vec::with_capacity(self.entries.len());
        let scan = self.walk_from(0, true, Self::new(), |mut duplicates, item, _| {
            let value = normalize(item);
            if contains(&seen, &value, strict) {
                duplicates.append(item.clone());
            } else {
                seen.push(value);
            }
            Ok::<Self, Infallible>(duplicates)
        });
        let duplicates = match scan {
            Ok(duplicates) => duplicates,
            Err(never) => match never {},
        };

        if uniques {
            duplicates.unique()
        } else {
            duplicates
        }
    }

    /// First occurrence of each element under loose equality, in order.
    pub fn unique(&self) -> Self {
        let mut seen: Vec<Value> = Vec::with_capacity(self.entries.len());
        let mut unique = Self::new();

        for item in self.items() {
            let value = normalize(item);
            if !contains(&seen, &value, false) {
                seen.push(value);
                unique.append(item.clone());
            }
        }
        unique
    }

    /// Elements in reverse order, keys reassigned by the kind's key rule.
    pub fn reverse(&self) -> Self {
        self.items().rev().cloned().collect()
    }
}

impl<K: Kind> Collection<K>
where
    K::Item: Element,
{
    /// Returns `true` if the normalized form of `value` appears among the
    /// normalized elements.
    ///
    /// ```
    /// use assort::List;
    ///
    /// let list = List::from_iterable([1, 2, 3]);
    /// assert!(list.has(&2, true));
    /// assert!(!list.has(&"2", true));
    /// assert!(list.has(&"2", false));
    /// ```
    pub fn has<V: Element + ?Sized>(&self, value: &V, strict: bool) -> bool {
        contains(&self.to_list(), &normalize(value), strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ToStringValue;
    use crate::key::{Key, Plain};
    use crate::List;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Label(String, u32);

    impl ToStringValue for Label {
        fn to_string_value(&self) -> String {
            self.0.clone()
        }
    }

    impl Element for Label {
        fn as_to_string(&self) -> Option<&dyn ToStringValue> {
            Some(self)
        }
    }

    fn label(text: &str, id: u32) -> Label {
        Label(text.to_string(), id)
    }

    #[test]
    fn diff_both_directions() {
        let a = List::from_iterable([1, 2, 3, 4, 5]);
        let b = List::from_iterable([1, 2, 3, 6, 7]);

        assert_eq!(a.diff(&b).unwrap().values(), vec![4, 5]);
        assert_eq!(b.diff(&a).unwrap().values(), vec![6, 7]);
    }

    #[test]
    fn diff_uses_normalized_form() {
        let a = List::from_iterable([label("x", 1), label("y", 2)]);
        let b = List::from_iterable([label("x", 99)]);

        assert_eq!(a.diff(&b).unwrap().values(), vec![label("y", 2)]);
    }

    #[test]
    fn diff_rejects_other_kind() {
        let a = List::from_iterable([1i64, 2]);
        let c: Collection<Plain<String>> = Collection::from_iterable(["1".to_string()]);

        let err = a.diff(&c).unwrap_err();
        assert!(matches!(err, CollectionError::TypeMismatch { .. }));
        assert!(err.to_string().contains("same type"));
    }

    #[test]
    fn diff_strict_by_serialization() {
        let a = List::from_iterable([json!(1), json!("1"), json!(1.0)]);
        let b = List::from_iterable([json!(1)]);

        assert_eq!(a.diff(&b).unwrap().values(), vec![json!("1"), json!(1.0)]);
    }

    #[test]
    fn duplicates_keep_repeats_in_order() {
        let mut list = List::from_iterable([1, 2, 3, 4, 1, 2, 4]);
        assert_eq!(list.duplicates(true, false).values(), vec![1, 2, 4]);
    }

    #[test]
    fn duplicates_with_uniques() {
        let mut list = List::from_iterable(["a", "a", "a", "b", "b", "c", "d"]);
        assert_eq!(list.duplicates(true, false).values(), vec!["a", "a", "b"]);
        assert_eq!(list.duplicates(true, true).values(), vec!["a", "b"]);
    }

    #[test]
    fn duplicates_strict_versus_loose() {
        let mut list = List::from_iterable([json!(1), json!("1"), json!(1.0), json!(2)]);
        assert!(list.duplicates(true, false).empty());
        assert_eq!(
            list.duplicates(false, false).values(),
            vec![json!("1"), json!(1.0)]
        );
    }

    #[test]
    fn duplicates_rewinds_cursor() {
        let mut list = List::from_iterable([1, 1, 2]);
        list.advance();
        list.advance();
        assert_eq!(list.current(), Some(&2));

        list.duplicates(true, false);
        assert_eq!(list.current(), Some(&1));
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Fragile(&'static str);

    impl ToStringValue for Fragile {
        fn to_string_value(&self) -> String {
            if self.0 == "boom" {
                panic!("cannot render {}", self.0);
            }
            self.0.to_string()
        }
    }

    impl Element for Fragile {
        fn as_to_string(&self) -> Option<&dyn ToStringValue> {
            Some(self)
        }
    }

    #[test]
    fn duplicates_rewinds_when_normalizing_panics() {
        let mut list = List::from_iterable([Fragile("a"), Fragile("b"), Fragile("boom")]);
        list.advance();
        list.advance();
        assert_eq!(list.current(), Some(&Fragile("boom")));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            list.duplicates(true, false);
        }));

        assert!(outcome.is_err());
        assert_eq!(list.current(), Some(&Fragile("a")));
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let list = List::from_iterable([1, 2, 3, 4, 1, 2, 2, 3, 3, 4, 2, 1, 2, 1, 1, 2]);
        let unique = list.unique();

        assert_eq!(list.count(), 16);
        assert_eq!(unique.count(), 4);
        assert_eq!(unique.to_array(), json!([1, 2, 3, 4]));
    }

    #[test]
    fn unique_is_loose() {
        let list = List::from_iterable([json!(1), json!("1"), json!(true), json!(0)]);
        assert_eq!(list.unique().values(), vec![json!(1), json!(0)]);
    }

    #[test]
    fn reverse_reassigns_keys() {
        let list = List::from_iterable([1, 2, 3, 4, 5]);
        let reversed = list.reverse();

        assert_eq!(reversed.values(), vec![5, 4, 3, 2, 1]);
        assert_eq!(reversed.keys()[0], Key::Index(0));
    }

    #[test]
    fn has_strict_and_loose() {
        let list = List::from_iterable([label("10", 1), label("abc", 2)]);
        assert!(list.has(&"10", true));
        assert!(!list.has(&10, true));
        assert!(list.has(&10, false));
        assert!(list.has(&label("abc", 7), true));
        assert!(!list.has(&"ABC", false));
    }
}
