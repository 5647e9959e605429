//! Mapping collections to plain id → value objects.
//!
//! A [`DefaultMapper`] is configured with the collection kinds it serves.
//! For each kind a [`CallerProvider`] supplies a [`MapperCallers`] pair: one
//! function extracting an element's id and one extracting its value.
//! [`Mapper::map`] then turns a collection of a registered kind into a
//! `{id: value}` object.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::collection::{AnyCollection, Collection};
use crate::error::{CollectionError, Result};
use crate::key::{Kind, KindId};

/// Maps a collection to a plain `{id: value}` object.
pub trait Mapper {
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidCollection`] if the collection's
    /// kind is not served by this mapper.
    fn map(&self, collection: &dyn AnyCollection) -> Result<Map<String, Value>>;
}

type MapFn = dyn Fn(&dyn AnyCollection) -> Option<Map<String, Value>>;

/// Id and value extractors for one collection kind.
pub struct MapperCallers {
    kind: KindId,
    map_fn: Box<MapFn>,
}

impl MapperCallers {
    /// Creates the extractor pair for collections of kind `K`.
    ///
    /// When two elements produce the same id, the later value wins.
    pub fn new<K: Kind>(
        get_id: impl Fn(&K::Item) -> String + 'static,
        get_value: impl Fn(&K::Item) -> Value + 'static,
    ) -> Self {
        let map_fn = move |collection: &dyn AnyCollection| {
            let collection = collection.as_any().downcast_ref::<Collection<K>>()?;
            Some(
                collection
                    .items()
                    .map(|item| (get_id(item), get_value(item)))
                    .collect(),
            )
        };
        MapperCallers {
            kind: KindId::of::<K>(),
            map_fn: Box::new(map_fn),
        }
    }

    /// Kind these extractors apply to.
    pub fn kind(&self) -> KindId {
        self.kind
    }

    fn map(&self, collection: &dyn AnyCollection) -> Option<Map<String, Value>> {
        (self.map_fn)(collection)
    }
}

impl fmt::Debug for MapperCallers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperCallers")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Supplies extractor pairs by collection kind.
///
/// Implemented for any `Fn(KindId) -> Option<MapperCallers>`.
pub trait CallerProvider {
    /// Extractors for `kind`, or `None` if the kind is not supported.
    fn callers(&self, kind: KindId) -> Option<MapperCallers>;
}

impl<F> CallerProvider for F
where
    F: Fn(KindId) -> Option<MapperCallers>,
{
    fn callers(&self, kind: KindId) -> Option<MapperCallers> {
        self(kind)
    }
}

/// Mapper serving a fixed set of collection kinds.
///
/// # Example
///
/// ```
/// use assort::{define_collection, DefaultMapper, KindId, Mapper, MapperCallers};
/// use serde_json::{json, Value};
///
/// #[derive(Clone)]
/// struct Score {
///     name: &'static str,
///     points: i64,
/// }
///
/// define_collection!(Scores(ScoresKind): Score);
///
/// let provider = |kind: KindId| {
///     (kind == KindId::of::<ScoresKind>()).then(|| {
///         MapperCallers::new::<ScoresKind>(|s: &Score| s.name.to_string(), |s: &Score| Value::from(s.points))
///     })
/// };
/// let mapper = DefaultMapper::new(&provider, [KindId::of::<ScoresKind>()]).unwrap();
///
/// let scores = Scores::from_iterable([
///     Score { name: "ada", points: 3 },
///     Score { name: "bob", points: 5 },
/// ]);
/// assert_eq!(
///     serde_json::Value::Object(mapper.map(&scores).unwrap()),
///     json!({"ada": 3, "bob": 5})
/// );
/// ```
#[derive(Debug, Default)]
pub struct DefaultMapper {
    callers: HashMap<KindId, MapperCallers>,
}

impl DefaultMapper {
    /// Registers extractors for every kind in `kinds`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidCollectionClass`] for the first
    /// kind the provider has no extractors for, or whose extractors were
    /// built for a different kind.
    pub fn new<P, I>(provider: &P, kinds: I) -> Result<Self>
    where
        P: CallerProvider + ?Sized,
        I: IntoIterator<Item = KindId>,
    {
        let mut callers = HashMap::new();
        for kind in kinds {
            let registered = provider
                .callers(kind)
                .filter(|callers| callers.kind() == kind)
                .ok_or(CollectionError::InvalidCollectionClass { kind: kind.name() })?;
            tracing::debug!(kind = kind.name(), "registered mapper callers");
            callers.insert(kind, registered);
        }
        Ok(DefaultMapper { callers })
    }

    /// Returns `true` if collections of `kind` can be mapped.
    pub fn supports(&self, kind: KindId) -> bool {
        self.callers.contains_key(&kind)
    }
}

impl Mapper for DefaultMapper {
    fn map(&self, collection: &dyn AnyCollection) -> Result<Map<String, Value>> {
        let kind = collection.kind_id();
        let mapped = self
            .callers
            .get(&kind)
            .and_then(|callers| callers.map(collection))
            .ok_or(CollectionError::InvalidCollection { kind: kind.name() })?;

        tracing::trace!(
            kind = kind.name(),
            elements = collection.count(),
            entries = mapped.len(),
            "mapped collection"
        );
        Ok(mapped)
    }
}
