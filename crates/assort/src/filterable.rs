//! Filtering and grouping operations on collections.

use std::convert::Infallible;

use crate::collection::Collection;
use crate::convert::Element;
use crate::filter::CollectionFilter;
use crate::group::{CollectionFilters, Groups};
use crate::key::{Key, Kind};

impl<K: Kind> Collection<K>
where
    K::Item: Element,
{
    /// Elements that expose the filterable capability and satisfy `filter`,
    /// in order.
    ///
    /// Elements without the filterable capability never match.
    pub fn filter(&self, filter: &dyn CollectionFilter) -> Self
    where
        K::Item: Clone,
    {
        self.items()
            .filter(|item| {
                item.as_filter_item()
                    .is_some_and(|item| filter.is_satisfied_by(item))
            })
            .cloned()
            .collect()
    }

    /// Groups the elements by `filters`.
    ///
    /// See [`CollectionFilters::groups_for`].
    pub fn group_by(&self, remove_empty: bool, filters: &CollectionFilters) -> Groups<'_, K::Item> {
        filters.groups_for(self, remove_empty)
    }
}

impl<K: Kind> Collection<K> {
    /// Builds a new collection from the `Some` results of
    /// `function(element, key)`, walking from the cursor on.
    ///
    /// Traversal follows the same cursor policy as
    /// [`try_each`](Collection::try_each).
    pub fn try_filter_with<E, F>(&mut self, mut function: F, rewind: bool) -> Result<Self, E>
    where
        F: FnMut(&K::Item, &Key) -> Result<Option<K::Item>, E>,
    {
        let mut filtered = Self::new();
        self.try_each(
            |item, key| {
                if let Some(kept) = function(item, key)? {
                    filtered.append(kept);
                }
                Ok(())
            },
            rewind,
        )?;
        Ok(filtered)
    }

    /// Builds a new collection from the `Some` results of
    /// `function(element, key)`, walking from the cursor on.
    ///
    /// ```
    /// use assort::List;
    ///
    /// let mut list = List::from_iterable([1, 2, 3, 4]);
    /// let evens = list.filter_with(|n, _| (n % 2 == 0).then(|| n * 10), true);
    ///
    /// assert_eq!(evens.values(), vec![20, 40]);
    /// ```
    pub fn filter_with<F>(&mut self, mut function: F, rewind: bool) -> Self
    where
        F: FnMut(&K::Item, &Key) -> Option<K::Item>,
    {
        match self.try_filter_with(|item, key| Ok::<_, Infallible>(function(item, key)), rewind) {
            Ok(filtered) => filtered,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::convert::Element;
    use crate::filter::{FilterItem, GroupByData, KeyInFilter, PredicateFilter};
    use crate::group::CollectionFilters;
    use crate::key::Key;
    use crate::List;

    #[derive(Debug, Clone, PartialEq)]
    enum Entry {
        Item(&'static str),
        Number(i64),
        Text(&'static str),
    }

    impl FilterItem for Entry {
        fn group_by_key(&self, _custom: Option<&GroupByData>) -> String {
            match self {
                Entry::Item(key) | Entry::Text(key) => key.to_string(),
                Entry::Number(n) => n.to_string(),
            }
        }
    }

    impl Element for Entry {
        fn as_filter_item(&self) -> Option<&dyn FilterItem> {
            match self {
                Entry::Item(_) => Some(self),
                _ => None,
            }
        }
    }

    fn mixed() -> List<Entry> {
        List::from_iterable([
            Entry::Number(1),
            Entry::Item("a"),
            Entry::Item("b"),
            Entry::Item("c"),
            Entry::Item("d"),
            Entry::Text("a"),
        ])
    }

    #[test]
    fn filter_keeps_satisfied_filterable_elements() {
        let filter = KeyInFilter::new("a or c", ["a", "c"]);
        let filtered = mixed().filter(&filter);

        assert_eq!(filtered.values(), vec![Entry::Item("a"), Entry::Item("c")]);
        assert_eq!(filtered.keys(), vec![Key::Index(0), Key::Index(1)]);
    }

    #[test]
    fn filter_with_no_match_is_empty() {
        let list = List::from_iterable([Entry::Number(1), Entry::Item("b"), Entry::Text("a")]);
        let filter = KeyInFilter::new("a or c", ["a", "c"]);
        assert!(list.filter(&filter).empty());
    }

    #[test]
    fn filter_skips_non_filterable_even_when_always_true() {
        let filter = PredicateFilter::new("all", |_: &dyn FilterItem| true);
        assert_eq!(mixed().filter(&filter).count(), 4);
    }

    #[test]
    fn filter_with_transforms_and_rewinds() {
        let mut list = List::from_iterable([1, 2, 3, 4, 5]);
        list.advance();

        let kept = list.filter_with(|n, key| (key.as_index() != Some(3)).then_some(n + 100), true);
        assert_eq!(kept.values(), vec![102, 103, 105]);
        assert_eq!(list.current(), Some(&1));
    }

    #[test]
    fn try_filter_with_propagates_error() {
        let mut list = List::from_iterable([1, 2, 3]);
        let result = list.try_filter_with(
            |n, _| if *n == 2 { Err("two") } else { Ok(Some(*n)) },
            false,
        );

        assert_eq!(result.err(), Some("two"));
        assert_eq!(list.current(), Some(&2));
    }

    #[test]
    fn group_by_collects_groups() {
        let list = mixed();
        let filters = CollectionFilters::new()
            .with(KeyInFilter::new("a or c", ["a", "c"]))
            .with(KeyInFilter::new("b", ["b"]))
            .with(KeyInFilter::new("x", ["x"]));

        let groups = list.group_by(false, &filters);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups["a or c"].len(), 2);
        assert_eq!(groups["b"].len(), 1);
        assert_eq!(groups["x"].len(), 0);

        let groups = list.group_by(true, &filters);
        assert_eq!(groups.keys(), vec!["a or c", "b"]);
    }
}
