//! Named predicates over filterable items.
//!
//! A [`CollectionFilter`] decides whether a [`FilterItem`] belongs to it.
//! Filters carry a key, used to name the group they produce in
//! [`CollectionFilters::groups_for`](crate::CollectionFilters::groups_for),
//! and optional custom data that is handed to
//! [`FilterItem::group_by_key`] when grouping.
//!
//! The building blocks:
//!
//! - [`PredicateFilter`] wraps a closure
//! - [`KeyPatternFilter`] matches the item's group-by key against a regex
//! - [`KeyInFilter`] matches the group-by key against a fixed set
//! - [`CompositeFilter`] folds child filters with a [`FilterOperator`]

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::operator::FilterOperator;

/// Custom data a filter passes to [`FilterItem::group_by_key`].
pub type GroupByData = Map<String, Value>;

/// An element that can be filtered and grouped.
///
/// Elements expose this capability through
/// [`Element::as_filter_item`](crate::Element::as_filter_item). Elements
/// that do not are skipped by every filter operation.
pub trait FilterItem {
    /// Key the item is stored under inside a filter's group.
    fn group_by_key(&self, custom: Option<&GroupByData>) -> String;
}

/// A named predicate over filterable items.
pub trait CollectionFilter {
    /// Name of the group this filter produces.
    fn key(&self) -> &str;

    /// Returns `true` if `item` passes the filter.
    fn is_satisfied_by(&self, item: &dyn FilterItem) -> bool;

    /// Data passed to [`FilterItem::group_by_key`] when grouping.
    fn custom_group_by_data(&self) -> Option<&GroupByData> {
        None
    }
}

impl<F: CollectionFilter + ?Sized> CollectionFilter for Box<F> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn is_satisfied_by(&self, item: &dyn FilterItem) -> bool {
        (**self).is_satisfied_by(item)
    }

    fn custom_group_by_data(&self) -> Option<&GroupByData> {
        (**self).custom_group_by_data()
    }
}

// ============================================================================
// BaseFilter
// ============================================================================

/// Key and custom grouping data shared by the concrete filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseFilter {
    key: String,
    custom_group_by_data: Option<GroupByData>,
}

impl BaseFilter {
    pub fn new(key: impl Into<String>) -> Self {
        BaseFilter {
            key: key.into(),
            custom_group_by_data: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn custom_group_by_data(&self) -> Option<&GroupByData> {
        self.custom_group_by_data.as_ref()
    }

    /// Replaces the grouping data. `None` clears it.
    pub fn set_custom_group_by_data(&mut self, data: impl Into<Option<GroupByData>>) -> &mut Self {
        self.custom_group_by_data = data.into();
        self
    }
}

// Builder methods for filters that embed a `BaseFilter`.
macro_rules! delegate_base {
    ($($ty:ident $(<$param:ident>)?),* $(,)?) => {
        $(
            impl$(<$param>)? $ty$(<$param>)? {
                /// Sets the data passed to [`FilterItem::group_by_key`] when
                /// grouping. `None` clears it.
                pub fn set_custom_group_by_data(&mut self, data: impl Into<Option<GroupByData>>) -> &mut Self {
                    self.base.set_custom_group_by_data(data);
                    self
                }

                /// Builder form of
                #[doc = concat!("[`set_custom_group_by_data`](", stringify!($ty), "::set_custom_group_by_data).")]
                pub fn with_custom_group_by_data(mut self, data: GroupByData) -> Self {
                    self.base.set_custom_group_by_data(data);
                    self
                }
            }
        )*
    };
}

delegate_base!(PredicateFilter<F>, KeyPatternFilter, KeyInFilter, CompositeFilter);

// ============================================================================
// PredicateFilter
// ============================================================================

/// Filter backed by a closure.
///
/// ```
/// use assort::{CollectionFilter, FilterItem, GroupByData, PredicateFilter};
///
/// struct Tag(&'static str);
///
/// impl FilterItem for Tag {
///     fn group_by_key(&self, _custom: Option<&GroupByData>) -> String {
///         self.0.to_string()
///     }
/// }
///
/// let filter = PredicateFilter::new("short", |item: &dyn FilterItem| {
///     item.group_by_key(None).len() < 4
/// });
///
/// assert_eq!(filter.key(), "short");
/// assert!(filter.is_satisfied_by(&Tag("cli")));
/// assert!(!filter.is_satisfied_by(&Tag("rust-lang")));
/// ```
pub struct PredicateFilter<F> {
    base: BaseFilter,
    predicate: F,
}

impl<F> PredicateFilter<F>
where
    F: Fn(&dyn FilterItem) -> bool,
{
    pub fn new(key: impl Into<String>, predicate: F) -> Self {
        PredicateFilter {
            base: BaseFilter::new(key),
            predicate,
        }
    }
}

impl<F> CollectionFilter for PredicateFilter<F>
where
    F: Fn(&dyn FilterItem) -> bool,
{
    fn key(&self) -> &str {
        self.base.key()
    }

    fn is_satisfied_by(&self, item: &dyn FilterItem) -> bool {
        (self.predicate)(item)
    }

    fn custom_group_by_data(&self) -> Option<&GroupByData> {
        self.base.custom_group_by_data()
    }
}

impl<F> fmt::Debug for PredicateFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// KeyPatternFilter
// ============================================================================

/// Matches items whose group-by key matches a regular expression.
///
/// The group-by key is computed with this filter's own custom data, so the
/// pattern sees the same key the item is grouped under.
#[derive(Debug, Clone)]
pub struct KeyPatternFilter {
    base: BaseFilter,
    pattern: Regex,
}

impl KeyPatternFilter {
    /// Compiles `pattern` into a new filter.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidPattern`](crate::CollectionError::InvalidPattern)
    /// if the pattern does not compile.
    pub fn new(key: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(KeyPatternFilter {
            base: BaseFilter::new(key),
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CollectionFilter for KeyPatternFilter {
    fn key(&self) -> &str {
        self.base.key()
    }

    fn is_satisfied_by(&self, item: &dyn FilterItem) -> bool {
        self.pattern
            .is_match(&item.group_by_key(self.base.custom_group_by_data()))
    }

    fn custom_group_by_data(&self) -> Option<&GroupByData> {
        self.base.custom_group_by_data()
    }
}

// ============================================================================
// KeyInFilter
// ============================================================================

/// Matches items whose group-by key is one of a fixed set.
#[derive(Debug, Clone)]
pub struct KeyInFilter {
    base: BaseFilter,
    keys: HashSet<String>,
}

impl KeyInFilter {
    pub fn new<I, S>(key: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyInFilter {
            base: BaseFilter::new(key),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl CollectionFilter for KeyInFilter {
    fn key(&self) -> &str {
        self.base.key()
    }

    fn is_satisfied_by(&self, item: &dyn FilterItem) -> bool {
        self.keys
            .contains(&item.group_by_key(self.base.custom_group_by_data()))
    }

    fn custom_group_by_data(&self) -> Option<&GroupByData> {
        self.base.custom_group_by_data()
    }
}

// ============================================================================
// CompositeFilter
// ============================================================================

/// Boolean combination of child filters.
///
/// Children are evaluated left to right. The running result starts at the
/// operator's [initial value](FilterOperator::initial_value) and evaluation
/// stops as soon as it equals the operator's
/// [exit value](FilterOperator::exit_condition_value).
///
/// # Example
///
/// ```
/// use assort::{And, CompositeFilter, CollectionFilter, FilterItem, GroupByData, KeyInFilter, KeyPatternFilter};
///
/// struct Tag(&'static str);
///
/// impl FilterItem for Tag {
///     fn group_by_key(&self, _custom: Option<&GroupByData>) -> String {
///         self.0.to_string()
///     }
/// }
///
/// let filter = CompositeFilter::new("short-r", And)
///     .with(KeyPatternFilter::new("starts-r", "^r").unwrap())
///     .with(KeyInFilter::new("known", ["rust", "ruby", "go"]));
///
/// assert!(filter.is_satisfied_by(&Tag("rust")));
/// assert!(!filter.is_satisfied_by(&Tag("go")));
/// assert!(!filter.is_satisfied_by(&Tag("rye")));
/// ```
pub struct CompositeFilter {
    base: BaseFilter,
    operator: Box<dyn FilterOperator>,
    filters: Vec<Box<dyn CollectionFilter>>,
}

impl CompositeFilter {
    pub fn new(key: impl Into<String>, operator: impl FilterOperator + 'static) -> Self {
        CompositeFilter {
            base: BaseFilter::new(key),
            operator: Box::new(operator),
            filters: Vec::new(),
        }
    }

    /// Appends a child filter.
    pub fn with(mut self, filter: impl CollectionFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Appends a child filter in place.
    pub fn push(&mut self, filter: impl CollectionFilter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Number of child filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl CollectionFilter for CompositeFilter {
    fn key(&self) -> &str {
        self.base.key()
    }

    fn is_satisfied_by(&self, item: &dyn FilterItem) -> bool {
        let exit = self.operator.exit_condition_value();
        let mut result = self.operator.initial_value();

        for (evaluated, filter) in self.filters.iter().enumerate() {
            result = self.operator.calculate(result, filter.is_satisfied_by(item));
            if result == exit {
                tracing::trace!(
                    filter = self.base.key(),
                    evaluated = evaluated + 1,
                    total = self.filters.len(),
                    result,
                    "composite filter short-circuited"
                );
                return exit;
            }
        }
        result
    }

    fn custom_group_by_data(&self) -> Option<&GroupByData> {
        self.base.custom_group_by_data()
    }
}

impl fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("base", &self.base)
            .field(
                "filters",
                &self.filters.iter().map(|f| f.key()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
