//! Grouping a collection by a list of filters.
//!
//! [`CollectionFilters::groups_for`] makes one pass over a collection and,
//! for every filterable element, evaluates each filter in turn. Matching
//! elements are stored in the filter's [`Group`] under the element's
//! group-by key. A later element with the same group-by key replaces the
//! earlier one.

use std::collections::HashMap;
use std::fmt;

use crate::collection::Collection;
use crate::convert::Element;
use crate::filter::CollectionFilter;
use crate::key::Kind;

/// Ordered list of filters used for grouping.
///
/// Filters are kept in insertion order, duplicates included. Filters that
/// share a key feed the same group.
#[derive(Default)]
pub struct CollectionFilters {
    filters: Vec<Box<dyn CollectionFilter>>,
}

impl CollectionFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter and returns `self` for chaining.
    pub fn add(&mut self, filter: impl CollectionFilter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Builder form of [`add`](CollectionFilters::add).
    pub fn with(mut self, filter: impl CollectionFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Moves every filter of `other` to the end of this list.
    pub fn extend_from(&mut self, other: CollectionFilters) -> &mut Self {
        self.filters.extend(other.filters);
        self
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter keys in order, duplicates included.
    pub fn keys(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.key()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn CollectionFilter> + '_ {
        self.filters.iter().map(|filter| &**filter)
    }

    /// Groups the filterable elements of `collection` by filter.
    ///
    /// The result has one group per distinct filter key, in first-seen
    /// order. The pass costs one evaluation per element and filter; group
    /// lookups are hashed. Elements without the filterable capability are skipped. With
    /// `remove_empty`, groups that matched nothing are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use assort::{CollectionFilters, Element, FilterItem, GroupByData, KeyInFilter, List};
    ///
    /// #[derive(Clone)]
    /// struct Tag(&'static str);
    ///
    /// impl FilterItem for Tag {
    ///     fn group_by_key(&self, _custom: Option<&GroupByData>) -> String {
    ///         self.0.to_string()
    ///     }
    /// }
    ///
    /// impl Element for Tag {
    ///     fn as_filter_item(&self) -> Option<&dyn FilterItem> {
    ///         Some(self)
    ///     }
    /// }
    ///
    /// let tags = List::from_iterable([Tag("a"), Tag("b"), Tag("c")]);
    /// let filters = CollectionFilters::new()
    ///     .with(KeyInFilter::new("vowels", ["a", "e"]))
    ///     .with(KeyInFilter::new("none", ["z"]));
    ///
    /// let groups = filters.groups_for(&tags, true);
    /// assert_eq!(groups.keys(), vec!["vowels"]);
    /// assert!(groups["vowels"].contains_key("a"));
    /// ```
    pub fn groups_for<'a, K>(&self, collection: &'a Collection<K>, remove_empty: bool) -> Groups<'a, K::Item>
    where
        K: Kind,
        K::Item: Element,
    {
        let mut groups: Groups<'a, K::Item> = Groups::default();
        let slots: Vec<usize> = self
            .filters
            .iter()
            .map(|filter| groups.slot(filter.key()))
            .collect();

        for element in collection.items() {
            let Some(item) = element.as_filter_item() else {
                continue;
            };
            for (filter, &slot) in self.filters.iter().zip(&slots) {
                if filter.is_satisfied_by(item) {
                    let group_key = item.group_by_key(filter.custom_group_by_data());
                    groups.entries[slot].1.insert(group_key, element);
                }
            }
        }

        if remove_empty {
            groups.remove_empty();
        }

        tracing::debug!(
            filters = self.filters.len(),
            elements = collection.count(),
            groups = groups.len(),
            remove_empty,
            "grouped collection by filters"
        );
        groups
    }
}

impl fmt::Debug for CollectionFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

impl Extend<Box<dyn CollectionFilter>> for CollectionFilters {
    fn extend<I: IntoIterator<Item = Box<dyn CollectionFilter>>>(&mut self, iter: I) {
        self.filters.extend(iter);
    }
}

impl FromIterator<Box<dyn CollectionFilter>> for CollectionFilters {
    fn from_iter<I: IntoIterator<Item = Box<dyn CollectionFilter>>>(iter: I) -> Self {
        CollectionFilters {
            filters: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Groups
// ============================================================================

/// Filter key to [`Group`], in first-seen filter order.
pub struct Groups<'a, T> {
    entries: Vec<(String, Group<'a, T>)>,
    positions: HashMap<String, usize>,
}

impl<'a, T> Groups<'a, T> {
    fn slot(&mut self, key: &str) -> usize {
        if let Some(&position) = self.positions.get(key) {
            return position;
        }
        let position = self.entries.len();
        self.entries.push((key.to_string(), Group::default()));
        self.positions.insert(key.to_string(), position);
        position
    }

    fn remove_empty(&mut self) {
        self.entries.retain(|(_, group)| !group.is_empty());
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, (key, _))| (key.clone(), position))
            .collect();
    }

    pub fn get(&self, key: &str) -> Option<&Group<'a, T>> {
        let position = *self.positions.get(key)?;
        self.entries.get(position).map(|(_, group)| group)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Group<'a, T>)> + '_ {
        self.entries.iter().map(|(key, group)| (key.as_str(), group))
    }
}

impl<T> Default for Groups<'_, T> {
    fn default() -> Self {
        Groups {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<'a, T> std::ops::Index<&str> for Groups<'a, T> {
    type Output = Group<'a, T>;

    /// # Panics
    ///
    /// Panics if there is no group for `key`.
    fn index(&self, key: &str) -> &Self::Output {
        match self.get(key) {
            Some(group) => group,
            None => panic!("no group for filter key {:?}", key),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Groups<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Group-by key to element, in first-insertion order.
pub struct Group<'a, T> {
    items: Vec<(String, &'a T)>,
    positions: HashMap<String, usize>,
}

impl<'a, T> Group<'a, T> {
    /// Stores `item` under `key`, replacing any earlier item in place.
    fn insert(&mut self, key: String, item: &'a T) {
        match self.positions.get(&key) {
            Some(&position) => self.items[position].1 = item,
            None => {
                self.positions.insert(key.clone(), self.items.len());
                self.items.push((key, item));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a T> {
        let position = *self.positions.get(key)?;
        self.items.get(position).map(|(_, item)| *item)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Number of elements in the group.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.items.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&'a T> {
        self.items.iter().map(|(_, item)| *item).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a T)> + '_ {
        self.items.iter().map(|(key, item)| (key.as_str(), *item))
    }
}

impl<T> Default for Group<'_, T> {
    fn default() -> Self {
        Group {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Group<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterItem, GroupByData, KeyInFilter, PredicateFilter};
    use crate::List;
    use serde_json::{json, Value};

    #[derive(Debug, Clone, PartialEq)]
    enum Entry {
        Item(&'static str, u32),
        Number(i64),
    }

    impl FilterItem for Entry {
        fn group_by_key(&self, custom: Option<&GroupByData>) -> String {
            let key = match self {
                Entry::Item(key, _) => *key,
                Entry::Number(_) => "",
            };
            let reverse = custom
                .and_then(|data| data.get("reverseKey"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if reverse {
                key.chars().rev().collect()
            } else {
                key.to_string()
            }
        }
    }

    impl Element for Entry {
        fn as_filter_item(&self) -> Option<&dyn FilterItem> {
            match self {
                Entry::Item(..) => Some(self),
                Entry::Number(_) => None,
            }
        }
    }

    fn items(keys: &[&'static str]) -> List<Entry> {
        let mut list = List::new();
        list.add(Entry::Number(1));
        for (id, key) in keys.iter().copied().enumerate() {
            list.add(Entry::Item(key, id as u32));
        }
        list.add(Entry::Number(2));
        list
    }

    fn filters() -> CollectionFilters {
        CollectionFilters::new()
            .with(KeyInFilter::new("a or c", ["a", "c"]))
            .with(KeyInFilter::new("b", ["b"]))
            .with(KeyInFilter::new("x", ["x"]))
    }

    #[test]
    fn groups_keep_empty_groups() {
        let list = items(&["a", "b", "c", "d"]);
        let groups = filters().groups_for(&list, false);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups.keys(), vec!["a or c", "b", "x"]);
        assert_eq!(groups["a or c"].len(), 2);
        assert_eq!(groups["b"].len(), 1);
        assert!(groups["x"].is_empty());
        assert_eq!(groups["a or c"].keys(), vec!["a", "c"]);
    }

    #[test]
    fn groups_remove_empty_groups() {
        let list = items(&["a", "b", "c", "d"]);
        let groups = filters().groups_for(&list, true);

        assert_eq!(groups.len(), 2);
        assert!(!groups.contains_key("x"));
        assert!(groups.get("x").is_none());
    }

    #[test]
    fn groups_point_at_collection_elements() {
        let list = items(&["a", "b"]);
        let groups = filters().groups_for(&list, true);

        let element = groups["b"].get("b");
        assert_eq!(element, Some(&Entry::Item("b", 1)));
        assert!(std::ptr::eq(element.unwrap(), list.get(2).unwrap()));
    }

    #[test]
    fn colliding_group_keys_last_write_wins() {
        let list = items(&["a", "c", "a"]);
        let groups = filters().groups_for(&list, false);

        let group = &groups["a or c"];
        assert_eq!(group.len(), 2);
        assert_eq!(group.keys(), vec!["a", "c"]);
        assert_eq!(group.get("a"), Some(&Entry::Item("a", 2)));
    }

    #[test]
    fn custom_data_changes_group_key() {
        let mut data = GroupByData::new();
        data.insert("reverseKey".to_string(), json!(true));

        let list = items(&["ab", "b", "c"]);
        let filters = CollectionFilters::new()
            .with(
                PredicateFilter::new("reversed", |item: &dyn FilterItem| {
                    let mut data = GroupByData::new();
                    data.insert("reverseKey".to_string(), json!(true));
                    item.group_by_key(Some(&data)) == "ba"
                })
                .with_custom_group_by_data(data),
            )
            .with(KeyInFilter::new("plain", ["ab"]));

        let groups = filters.groups_for(&list, false);
        assert_eq!(groups["reversed"].keys(), vec!["ba"]);
        assert_eq!(groups["plain"].keys(), vec!["ab"]);
    }

    #[test]
    fn shared_filter_keys_share_a_group() {
        let list = items(&["a", "b", "c"]);
        let filters = CollectionFilters::new()
            .with(KeyInFilter::new("same", ["a"]))
            .with(KeyInFilter::new("same", ["b"]))
            .with(KeyInFilter::new("other", ["c"]));

        assert_eq!(filters.len(), 3);
        assert_eq!(filters.keys(), vec!["same", "same", "other"]);

        let groups = filters.groups_for(&list, false);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["same"].keys(), vec!["a", "b"]);
    }

    #[test]
    fn non_filterable_elements_are_skipped() {
        let list = List::from_iterable([Entry::Number(1), Entry::Number(2)]);
        let everything = CollectionFilters::new()
            .with(PredicateFilter::new("all", |_: &dyn FilterItem| true));

        let groups = everything.groups_for(&list, false);
        assert_eq!(groups.len(), 1);
        assert!(groups["all"].is_empty());
    }

    #[test]
    fn extend_from_flattens() {
        let mut filters = filters();
        let mut more = CollectionFilters::new();
        more.add(KeyInFilter::new("d", ["d"]));

        filters.extend_from(more);
        assert_eq!(filters.keys(), vec!["a or c", "b", "x", "d"]);
        assert_eq!(filters.iter().count(), 4);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(String, usize);

    impl FilterItem for Tag {
        fn group_by_key(&self, _custom: Option<&GroupByData>) -> String {
            self.0.clone()
        }
    }

    impl Element for Tag {
        fn as_filter_item(&self) -> Option<&dyn FilterItem> {
            Some(self)
        }
    }

    #[test]
    fn large_groups_keep_first_position_and_last_value() {
        const DISTINCT: usize = 50_000;

        let tags = (0..DISTINCT)
            .chain(0..DISTINCT / 2)
            .enumerate()
            .map(|(id, n)| Tag(format!("tag-{}", n), id));
        let list = List::from_iterable(tags);

        let filters = CollectionFilters::new()
            .with(PredicateFilter::new("all", |_: &dyn FilterItem| true))
            .with(KeyInFilter::new("first", ["tag-0"]))
            .with(KeyInFilter::new("none", ["missing"]));

        let groups = filters.groups_for(&list, true);
        assert_eq!(groups.keys(), vec!["all", "first"]);

        let all = &groups["all"];
        assert_eq!(all.len(), DISTINCT);
        assert_eq!(all.keys()[0], "tag-0");
        assert_eq!(all.keys()[DISTINCT - 1], format!("tag-{}", DISTINCT - 1));
        assert_eq!(all.get("tag-0").map(|tag| tag.1), Some(DISTINCT));
        assert_eq!(all.get("tag-1").map(|tag| tag.1), Some(DISTINCT + 1));
        assert_eq!(
            all.get(&format!("tag-{}", DISTINCT - 1)).map(|tag| tag.1),
            Some(DISTINCT - 1)
        );
        assert_eq!(groups["first"].values(), vec![list.get(DISTINCT).unwrap()]);
    }

    #[test]
    fn no_filters_no_groups() {
        let list = items(&["a"]);
        let groups = CollectionFilters::new().groups_for(&list, false);
        assert!(groups.is_empty());
    }
}
