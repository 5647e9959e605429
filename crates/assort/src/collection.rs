//! Ordered, keyed collection.
//!
//! A [`Collection`] owns its elements in insertion order, each stored under
//! a [`Key`] chosen by the collection's [`Kind`]. It also carries a cursor
//! that the traversal methods (`each`, `map`, `reduce`) start from and
//! update according to their rewind policy.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::convert::{Element, ToArray};
use crate::key::{Key, Kind, KindId};
use crate::normalize::normalize;

/// An ordered, mutable sequence of keyed elements.
///
/// Keys are unique. Appending an element whose kind-assigned key already
/// exists replaces that element in place. Names spelling a decimal integer
/// are stored as integer keys (see [`Key::canonical`]).
///
/// # Example
///
/// ```
/// use assort::{Key, List};
///
/// let mut list = List::from_iterable([10, 20]);
/// list.add(30).add(40);
///
/// assert_eq!(list.count(), 4);
/// assert_eq!(list.keys(), vec![Key::Index(0), Key::Index(1), Key::Index(2), Key::Index(3)]);
/// assert_eq!(list.current(), Some(&10));
/// ```
pub struct Collection<K: Kind> {
    pub(crate) entries: Vec<(Key, K::Item)>,
    // key to position; auto-sorted kinds binary search instead
    positions: HashMap<Key, usize>,
    pub(crate) cursor: usize,
    next_index: i64,
    // false after `sort_by` until the next key sort
    key_ordered: bool,
}

impl<K: Kind> Collection<K> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Collection {
            entries: Vec::new(),
            positions: HashMap::new(),
            cursor: 0,
            next_index: 0,
            key_ordered: true,
        }
    }

    /// Builds a collection by draining any finite iterable in order.
    pub fn from_iterable<I>(source: I) -> Self
    where
        I: IntoIterator<Item = K::Item>,
    {
        let mut collection = Self::new();
        collection.extend(source);
        collection
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Appends an element using the kind's key rule.
    ///
    /// The cursor keeps pointing at the same element.
    pub fn append(&mut self, item: K::Item) {
        let key = K::key_of(&item).unwrap_or(Key::Index(self.next_index));
        self.offset_set(key, item);
    }

    /// Appends an element and returns `self` for chaining.
    pub fn add(&mut self, item: K::Item) -> &mut Self {
        self.append(item);
        self
    }

    /// Stores an element under an explicit key.
    ///
    /// An existing element with the same key is replaced in place.
    /// Auto-sorted kinds insert new keys at their ordered position.
    pub fn offset_set(&mut self, key: impl Into<Key>, item: K::Item) {
        let key = key.into().canonical();
        if let Key::Index(index) = key {
            self.next_index = self.next_index.max(index.saturating_add(1));
        }

        if let Some(position) = self.position(&key) {
            self.entries[position].1 = item;
        } else if K::SORT_BY_KEY && self.key_ordered {
            let position = self.entries.partition_point(|(k, _)| *k < key);
            self.insert_at(position, key, item);
        } else {
            self.entries.push((key, item));
            self.reindex_from(self.entries.len() - 1);
        }

        if K::SORT_BY_KEY && !self.key_ordered {
            self.sort_by_key();
        }
    }

    /// Returns the element stored under `key`.
    pub fn offset_get(&self, key: &Key) -> Option<&K::Item> {
        self.position(key).map(|position| &self.entries[position].1)
    }

    /// Returns a mutable reference to the element stored under `key`.
    pub fn offset_get_mut(&mut self, key: &Key) -> Option<&mut K::Item> {
        let position = self.position(key)?;
        Some(&mut self.entries[position].1)
    }

    /// Returns `true` if an element is stored under `key`.
    pub fn offset_exists(&self, key: &Key) -> bool {
        self.position(key).is_some()
    }

    /// Removes and returns the element stored under `key`.
    ///
    /// When the removed element sits before the cursor, the cursor moves
    /// back so it keeps pointing at the same element.
    pub fn offset_unset(&mut self, key: &Key) -> Option<K::Item> {
        let position = self.position(key)?;
        let (key, item) = self.entries.remove(position);
        self.positions.remove(&key);
        self.reindex_from(position);
        if position < self.cursor {
            self.cursor -= 1;
        }
        Some(item)
    }

    /// Removes every element and resets the cursor.
    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self.positions.clear();
        self.cursor = 0;
        self.key_ordered = true;
        self
    }

    /// Orders entries by key.
    pub fn sort_by_key(&mut self) -> &mut Self {
        self.key_ordered = true;
        self.reorder(|entries| entries.sort_by(|(a, _), (b, _)| a.cmp(b)));
        self
    }

    /// Orders entries by element, keeping each element's key.
    ///
    /// Auto-sorted kinds return to key order on the next insertion.
    pub fn sort_by<F>(&mut self, mut compare: F) -> &mut Self
    where
        F: FnMut(&K::Item, &K::Item) -> std::cmp::Ordering,
    {
        self.key_ordered = false;
        self.reorder(|entries| entries.sort_by(|(_, a), (_, b)| compare(a, b)));
        self
    }

    fn reorder(&mut self, sort: impl FnOnce(&mut Vec<(Key, K::Item)>)) {
        let current = self.key().cloned();
        sort(&mut self.entries);
        self.reindex_from(0);
        if let Some(key) = current {
            self.cursor = self.position(&key).unwrap_or(self.entries.len());
        }
    }

    fn insert_at(&mut self, position: usize, key: Key, item: K::Item) {
        if position <= self.cursor && self.cursor < self.entries.len() {
            self.cursor += 1;
        }
        self.entries.insert(position, (key, item));
        self.reindex_from(position);
    }

    fn reindex_from(&mut self, start: usize) {
        if K::SORT_BY_KEY {
            return;
        }
        for (position, (key, _)) in self.entries.iter().enumerate().skip(start) {
            match self.positions.get_mut(key) {
                Some(slot) => *slot = position,
                None => {
                    self.positions.insert(key.clone(), position);
                }
            }
        }
    }

    fn position(&self, key: &Key) -> Option<usize> {
        let canonical;
        let key = match key.integer_name() {
            Some(index) => {
                canonical = Key::Index(index);
                &canonical
            }
            None => key,
        };

        if !K::SORT_BY_KEY {
            self.positions.get(key).copied()
        } else if self.key_ordered {
            self.entries.binary_search_by(|(k, _)| k.cmp(key)).ok()
        } else {
            self.entries.iter().position(|(k, _)| k == key)
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the collection has no elements.
    pub fn empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns `true` if the collection has no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the collection holds more than one element.
    pub fn has_multiple_items(&self) -> bool {
        self.count() > 1
    }

    /// Snapshot of all keys in order.
    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Snapshot of all elements in order.
    pub fn values(&self) -> Vec<K::Item>
    where
        K::Item: Clone,
    {
        self.entries.iter().map(|(_, item)| item.clone()).collect()
    }

    /// Iterates over `(key, element)` pairs in order.
    ///
    /// Iteration is independent of the cursor.
    pub fn iter(&self) -> Iter<'_, K::Item> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterates over elements in order.
    pub fn items(&self) -> impl DoubleEndedIterator<Item = &K::Item> + ExactSizeIterator + '_ {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Returns the element at `position`, independent of its key.
    pub fn get(&self, position: usize) -> Option<&K::Item> {
        self.entries.get(position).map(|(_, item)| item)
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Moves the cursor to the first element.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the following element.
    ///
    /// Past the last element the cursor becomes invalid and stays there.
    pub fn advance(&mut self) {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Returns `true` if the cursor points at an element.
    pub fn valid(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Element under the cursor.
    pub fn current(&self) -> Option<&K::Item> {
        self.entries.get(self.cursor).map(|(_, item)| item)
    }

    /// Key under the cursor.
    pub fn key(&self) -> Option<&Key> {
        self.entries.get(self.cursor).map(|(key, _)| key)
    }

    // ========================================================================
    // Chunking
    // ========================================================================

    /// Splits the elements into consecutive collections of at most `size`
    /// elements.
    ///
    /// A `size` of zero yields a single chunk holding everything.
    pub fn chunk(&self, size: usize) -> Vec<Self>
    where
        K::Item: Clone,
    {
        if size < 1 {
            return vec![self.clone()];
        }

        self.entries
            .chunks(size)
            .map(|chunk| Self::from_iterable(chunk.iter().map(|(_, item)| item.clone())))
            .collect()
    }

    /// Calls `function` once per chunk, in order.
    pub fn each_chunk<F>(&self, size: usize, mut function: F) -> &Self
    where
        K::Item: Clone,
        F: FnMut(Self),
    {
        for chunk in self.chunk(size) {
            function(chunk);
        }
        self
    }
}

impl<K: Kind> Collection<K>
where
    K::Item: Element,
{
    /// Normalized elements in order, without keys.
    pub fn to_list(&self) -> Vec<Value> {
        self.items().map(normalize).collect()
    }

    /// Normalized form of the whole collection.
    ///
    /// Collections keyed `0..n` in order become a JSON array; any other key
    /// layout becomes an object keyed by the key's string form. Stored keys
    /// are canonical, so no two entries share a string form.
    pub fn to_array(&self) -> Value {
        let sequential = self
            .entries
            .iter()
            .enumerate()
            .all(|(position, (key, _))| key.as_index() == Some(position as i64));

        if sequential {
            return Value::Array(self.to_list());
        }

        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, item)| (key.to_string(), normalize(item)))
            .collect();
        Value::Object(object)
    }
}

/// Iterator over `(key, element)` pairs of a [`Collection`].
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, (Key, T)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Key, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, item)| (key, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, item)| (key, item))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, K: Kind> IntoIterator for &'a Collection<K> {
    type Item = (&'a Key, &'a K::Item);
    type IntoIter = Iter<'a, K::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Kind> IntoIterator for Collection<K> {
    type Item = (Key, K::Item);
    type IntoIter = std::vec::IntoIter<(Key, K::Item)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Kind> FromIterator<K::Item> for Collection<K> {
    fn from_iter<I: IntoIterator<Item = K::Item>>(iter: I) -> Self {
        Self::from_iterable(iter)
    }
}

impl<K: Kind> Extend<K::Item> for Collection<K> {
    fn extend<I: IntoIterator<Item = K::Item>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

impl<K: Kind> Default for Collection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kind> Clone for Collection<K>
where
    K::Item: Clone,
{
    fn clone(&self) -> Self {
        Collection {
            entries: self.entries.clone(),
            positions: self.positions.clone(),
            cursor: self.cursor,
            next_index: self.next_index,
            key_ordered: self.key_ordered,
        }
    }
}

impl<K: Kind> fmt::Debug for Collection<K>
where
    K::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, item)| (key, item)))
            .finish()
    }
}

/// Equality of keys and elements, ignoring the cursor.
impl<K: Kind> PartialEq for Collection<K>
where
    K::Item: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Kind> ToArray for Collection<K>
where
    K::Item: Element,
{
    fn to_array(&self) -> Value {
        Collection::to_array(self)
    }
}

impl<K: Kind> Element for Collection<K>
where
    K::Item: Element,
{
    fn as_to_array(&self) -> Option<&dyn ToArray> {
        Some(self)
    }
}

/// Type-erased view of a collection, used where the concrete collection
/// type is only known at runtime.
pub trait AnyCollection {
    /// Identity of the collection's kind.
    fn kind_id(&self) -> KindId;

    /// Upcast for downcasting to the concrete collection type.
    fn as_any(&self) -> &dyn Any;

    /// Number of elements.
    fn count(&self) -> usize;
}

impl<K: Kind> AnyCollection for Collection<K>
where
    K::Item: 'static,
{
    fn kind_id(&self) -> KindId {
        KindId::of::<K>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn count(&self) -> usize {
        self.entries.len()
    }
}
