//! Keys and concrete collection types.
//!
//! Every element of a [`Collection`](crate::Collection) is stored under a
//! [`Key`]. How that key is chosen is decided by the collection's [`Kind`]:
//! by default keys are auto-incrementing integers, but a kind may key its
//! elements by a semantic field and keep them sorted by that key.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

/// Key of an element within a collection.
///
/// Integer keys order before string keys, so a sorted collection with mixed
/// keys lists its positional entries first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Positional or numeric key.
    Index(i64),
    /// Named key.
    Name(String),
}

impl Key {
    /// Returns `true` if this is an integer key.
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }

    /// Extracts the integer key, if present.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    /// Extracts the named key, if present.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(s) => Some(s),
            Key::Index(_) => None,
        }
    }

    /// Turns a name spelling a decimal integer into the integer key.
    ///
    /// Only the canonical spelling converts: `"7"` and `"-3"` do, `"07"`,
    /// `"+7"` and `"-0"` stay names. Canonical keys have distinct string
    /// forms, so `"7"` and `7` always address the same entry.
    pub fn canonical(self) -> Key {
        match self.integer_name() {
            Some(index) => Key::Index(index),
            None => self,
        }
    }

    pub(crate) fn integer_name(&self) -> Option<i64> {
        let name = self.as_name()?;
        let index: i64 = name.parse().ok()?;
        (index.to_string() == name).then_some(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Index(i as i64)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

/// A concrete collection type.
///
/// Implement this on a marker type (or use [`define_collection!`]) to get a
/// distinct `Collection<Self>` type. Two collections are only comparable by
/// [`diff`](crate::Collection::diff) when they share the same kind.
///
/// # Example
///
/// ```
/// use assort::{Collection, Key, Kind};
///
/// struct Tags;
///
/// impl Kind for Tags {
///     type Item = String;
///     const SORT_BY_KEY: bool = true;
///
///     fn key_of(item: &String) -> Option<Key> {
///         Some(Key::Name(item.clone()))
///     }
/// }
///
/// let tags: Collection<Tags> = ["rust", "cli", "rust"].map(String::from).into_iter().collect();
/// assert_eq!(tags.values(), vec!["cli", "rust"]);
/// ```
pub trait Kind: 'static {
    /// Element type stored by collections of this kind.
    type Item;

    /// Keep entries ordered by key on every insertion.
    const SORT_BY_KEY: bool = false;

    /// Returns the key an element is stored under.
    ///
    /// `None` means the next auto-incrementing integer key.
    fn key_of(_item: &Self::Item) -> Option<Key> {
        None
    }
}

/// Generic kind with sequential integer keys.
pub struct Plain<T>(PhantomData<fn() -> T>);

impl<T: 'static> Kind for Plain<T> {
    type Item = T;
}

/// Runtime identity of a concrete collection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindId {
    type_id: TypeId,
    name: &'static str,
}

impl KindId {
    /// Returns the identity of kind `K`.
    pub fn of<K: Kind>() -> Self {
        KindId {
            type_id: TypeId::of::<K>(),
            name: std::any::type_name::<K>(),
        }
    }

    /// Returns the fully qualified type name of the kind.
    pub fn name(self) -> &'static str {
        self.name
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declares a concrete collection type.
///
/// `define_collection!(pub Name(NameKind): Item)` creates the marker kind
/// `NameKind` and the alias `Name = Collection<NameKind>`. An optional key
/// function switches from auto-incrementing keys to semantic keys, and the
/// trailing `sorted` flag keeps entries ordered by key.
///
/// ```
/// use assort::{define_collection, Key};
///
/// define_collection!(pub Numbers(NumbersKind): i64);
/// define_collection!(pub SortedNumbers(SortedNumbersKind): i64, key = |n: &i64| Key::Index(*n), sorted);
///
/// let numbers = Numbers::from_iterable([3, 1, 2]);
/// assert_eq!(numbers.values(), vec![3, 1, 2]);
///
/// let sorted = SortedNumbers::from_iterable([3, 1, 2]);
/// assert_eq!(sorted.values(), vec![1, 2, 3]);
/// ```
#[macro_export]
macro_rules! define_collection {
    (@kind $vis:vis $name:ident, $kind:ident, $item:ty, $sorted:expr, $key_fn:expr) => {
        $vis enum $kind {}

        impl $crate::Kind for $kind {
            type Item = $item;
            const SORT_BY_KEY: bool = $sorted;

            fn key_of(item: &$item) -> ::std::option::Option<$crate::Key> {
                let key_fn: fn(&$item) -> ::std::option::Option<$crate::Key> = $key_fn;
                key_fn(item)
            }
        }

        $vis type $name = $crate::Collection<$kind>;
    };
    ($vis:vis $name:ident ($kind:ident) : $item:ty) => {
        $crate::define_collection!(@kind $vis $name, $kind, $item, false, |_item: &$item| None);
    };
    ($vis:vis $name:ident ($kind:ident) : $item:ty, key = $key:expr, sorted) => {
        $crate::define_collection!(@kind $vis $name, $kind, $item, true, |item: &$item| {
            Some(($key)(item))
        });
    };
    ($vis:vis $name:ident ($kind:ident) : $item:ty, key = $key:expr) => {
        $crate::define_collection!(@kind $vis $name, $kind, $item, false, |item: &$item| {
            Some(($key)(item))
        });
    };
}
