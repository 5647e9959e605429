//! Ordered key → value bags.
//!
//! [`KeyValue`] accepts any [`Key`]. [`EnumKeyValue`] is keyed by the cases
//! of an [`EnumKey`] enum, some of which may be required.

use std::any::type_name;
use std::fmt;
use std::ops::Index;

use serde_json::{Map, Value};

use crate::convert::{Element, ToArray};
use crate::error::{CollectionError, Result};
use crate::key::Key;

static NULL: Value = Value::Null;

/// Ordered mapping from [`Key`] to plain value.
///
/// Setting an existing key replaces its value in place; new keys are
/// appended. Keys are [canonical](Key::canonical), so `"1"` and `1` are the
/// same key. Indexing a missing key yields `Value::Null`.
///
/// ```
/// use assort::KeyValue;
/// use serde_json::json;
///
/// let mut kv = KeyValue::from_iterable([("name", json!("My Name")), ("age", json!(23))]);
/// kv.set("age", 46).remove("name");
///
/// assert_eq!(kv["age"], json!(46));
/// assert_eq!(kv["name"], json!(null));
/// assert_eq!(kv.to_array(), json!({"age": 46}));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValue {
    entries: Vec<(Key, Value)>,
}

impl KeyValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from `(key, value)` pairs in order.
    pub fn from_iterable<I, K, V>(source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut bag = Self::new();
        for (key, value) in source {
            bag.set(key, value);
        }
        bag
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        let key = key.into().canonical();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Value under `key`, or `default` when the key is absent.
    pub fn get_or(&self, key: impl Into<Key>, default: impl Into<Value>) -> Value {
        match self.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> &mut Self {
        let key = key.into().canonical();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` if present.
    pub fn remove(&mut self, key: impl Into<Key>) -> &mut Self {
        let key = key.into().canonical();
        self.entries.retain(|(k, _)| *k != key);
        self
    }

    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, value)| value.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> + '_ {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Object form, keyed by each key's string form.
    pub fn to_array(&self) -> Value {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        Value::Object(object)
    }
}

impl<Q: Into<Key>> Index<Q> for KeyValue {
    type Output = Value;

    fn index(&self, key: Q) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for KeyValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_iterable(iter)
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for KeyValue {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl IntoIterator for KeyValue {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl ToArray for KeyValue {
    fn to_array(&self) -> Value {
        KeyValue::to_array(self)
    }
}

impl Element for KeyValue {
    fn as_to_array(&self) -> Option<&dyn ToArray> {
        Some(self)
    }
}

// ============================================================================
// EnumKeyValue
// ============================================================================

/// Enum whose cases name the keys of an [`EnumKeyValue`].
///
/// ```
/// use assort::{EnumKey, EnumKeyValue};
/// use serde_json::json;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Field {
///     Id,
///     Label,
/// }
///
/// impl EnumKey for Field {
///     const CASES: &'static [Self] = &[Field::Id, Field::Label];
///
///     fn key(&self) -> &'static str {
///         match self {
///             Field::Id => "id",
///             Field::Label => "label",
///         }
///     }
///
///     fn required(&self) -> bool {
///         matches!(self, Field::Id)
///     }
/// }
///
/// let mut bag = EnumKeyValue::new();
/// bag.set(Field::Label, "first");
/// assert!(bag.get(Field::Id).is_err());
///
/// bag.set(Field::Id, 7);
/// assert_eq!(bag.get(Field::Id).unwrap(), Some(&json!(7)));
/// assert!(bag.remove(Field::Id).is_err());
/// ```
pub trait EnumKey: Copy + PartialEq + 'static {
    /// Every case, in declaration order.
    const CASES: &'static [Self];

    /// String form of the case.
    fn key(&self) -> &'static str;

    /// Required keys cannot be read while missing or removed while set.
    fn required(&self) -> bool {
        false
    }

    /// Case whose [`key`](EnumKey::key) is `key`.
    fn from_key(key: &str) -> Option<Self> {
        Self::CASES.iter().copied().find(|case| case.key() == key)
    }
}

/// Ordered mapping from [`EnumKey`] cases to plain values.
#[derive(Clone, PartialEq)]
pub struct EnumKeyValue<E: EnumKey> {
    entries: Vec<(E, Value)>,
}

impl<E: EnumKey> EnumKeyValue<E> {
    pub fn new() -> Self {
        EnumKeyValue {
            entries: Vec::new(),
        }
    }

    /// Builds a bag from `(name, value)` pairs, resolving each name to a
    /// case of `E`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidEnumKey`] for the first name that
    /// matches no case.
    pub fn from_iterable<I, K, V>(source: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: Into<Value>,
    {
        let mut bag = Self::new();
        for (name, value) in source {
            let name = name.to_string();
            let key = E::from_key(&name).ok_or(CollectionError::InvalidEnumKey {
                key: name,
                kind: type_name::<E>(),
            })?;
            bag.set(key, value);
        }
        Ok(bag)
    }

    /// Value under `key`, `None` when an optional key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::RequiredKeyMissing`] when `key` is required
    /// and absent.
    pub fn get(&self, key: E) -> Result<Option<&Value>> {
        let value = self.find(key);
        if value.is_none() && key.required() {
            return Err(CollectionError::RequiredKeyMissing { key: key.key() });
        }
        Ok(value)
    }

    /// Value under `key`, or `default` when an optional key is absent.
    ///
    /// # Errors
    ///
    /// Same as [`get`](EnumKeyValue::get).
    pub fn get_or(&self, key: E, default: impl Into<Value>) -> Result<Value> {
        Ok(match self.get(key)? {
            Some(value) => value.clone(),
            None => default.into(),
        })
    }

    pub fn set(&mut self, key: E, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn has(&self, key: E) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` if present.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::RemovingRequiredKey`] when `key` is
    /// required and set. Removing an absent required key is a no-op.
    pub fn remove(&mut self, key: E) -> Result<&mut Self> {
        if key.required() && self.has(key) {
            return Err(CollectionError::RemovingRequiredKey { key: key.key() });
        }
        self.entries.retain(|(k, _)| *k != key);
        Ok(self)
    }

    /// Set keys in insertion order.
    pub fn keys(&self) -> Vec<E> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    /// String forms of the set keys in insertion order.
    pub fn key_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(key, _)| key.key()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, value)| value.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (E, &Value)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Object form, keyed by each case's string form.
    pub fn to_array(&self) -> Value {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, value)| (key.key().to_string(), value.clone()))
            .collect();
        Value::Object(object)
    }

    fn find(&self, key: E) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }
}

impl<E: EnumKey> Default for EnumKeyValue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnumKey> fmt::Debug for EnumKeyValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key.key(), value)))
            .finish()
    }
}

impl<E: EnumKey> ToArray for EnumKeyValue<E> {
    fn to_array(&self) -> Value {
        EnumKeyValue::to_array(self)
    }
}

impl<E: EnumKey> Element for EnumKeyValue<E> {
    fn as_to_array(&self) -> Option<&dyn ToArray> {
        Some(self)
    }
}
