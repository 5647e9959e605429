//! Assort - Typed ordered collections with set algebra, filters and grouping.
//!
//! Assort provides an ordered, keyed, mutable [`Collection`] whose concrete
//! type is fixed by a [`Kind`]. On top of it sit:
//!
//! - Construction from any finite iterable, chaining `add`, chunking
//! - Callback traversal (`each`, `map`, `reduce`) with a cursor rewind policy
//! - Set algebra on normalized elements: `diff`, `duplicates`, `unique`, `has`
//! - Composable filters (AND / OR / XOR / custom) and grouping by filter
//! - Mapping a collection to a plain `{id: value}` object
//! - Ordered key-value bags, including enum-keyed bags with required keys
//!
//! # Quick Start
//!
//! ```rust
//! use assort::{define_collection, Key, List};
//!
//! // A generic list with sequential integer keys
//! let mut numbers = List::from_iterable([1, 2, 3, 4, 1, 2]);
//! numbers.add(5);
//!
//! assert_eq!(numbers.unique().values(), vec![1, 2, 3, 4, 5]);
//! assert_eq!(numbers.duplicates(true, false).values(), vec![1, 2]);
//!
//! let total = numbers.reduce(|acc, n, _| acc + n, 0, true);
//! assert_eq!(total, 18);
//!
//! // A concrete collection type keyed by the element itself, kept sorted
//! define_collection!(Words(WordsKind): String, key = |w: &String| Key::Name(w.to_lowercase()), sorted);
//!
//! let words: Words = ["pear", "Apple", "apple", "fig"].map(String::from).into_iter().collect();
//! assert_eq!(words.values(), vec!["apple", "fig", "pear"]);
//! ```
//!
//! # Normalization
//!
//! Comparisons and plain-data export run on the normalized form of each
//! element. [`normalize`] queries the element's [`Element`] capabilities in
//! a fixed order and uses the first that applies:
//!
//! ```text
//! to-array  >  to-string  >  to-int  >  display  >  plain
//! ```
//!
//! # Cursor
//!
//! Every collection carries a cursor. `each`, `map` and `reduce` start at
//! the cursor and, when asked to rewind, reset it to the first element on
//! every exit path, including callback errors and panics.
//!
//! | Operation | Starts at | `rewind = true` | `rewind = false` |
//! |-----------|-----------|-----------------|------------------|
//! | completes | cursor | first element | past the end |
//! | callback fails | cursor | first element | failing element |

mod algebra;
mod collection;
mod convert;
mod error;
mod filter;
mod filterable;
mod group;
mod key;
mod key_value;
mod mapper;
mod normalize;
mod operator;
mod traverse;

// Re-export public API
pub use collection::{AnyCollection, Collection, Iter};
pub use convert::{Element, ToArray, ToInt, ToStringValue};
pub use error::{CollectionError, Result};
pub use filter::{
    BaseFilter, CollectionFilter, CompositeFilter, FilterItem, GroupByData, KeyInFilter,
    KeyPatternFilter, PredicateFilter,
};
pub use group::{CollectionFilters, Group, Groups};
pub use key::{Key, Kind, KindId, Plain};
pub use key_value::{EnumKey, EnumKeyValue, KeyValue};
pub use mapper::{CallerProvider, DefaultMapper, Mapper, MapperCallers};
pub use normalize::{contains, loose_eq, normalize, serialized, strict_eq, truthy};
pub use operator::{And, FilterOperator, FnOperator, Or, Xor};

/// Generic collection with sequential integer keys.
pub type List<T> = Collection<Plain<T>>;
