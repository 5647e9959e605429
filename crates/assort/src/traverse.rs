//! Callback traversal with cursor rewind semantics.
//!
//! `each`, `map` and `reduce` walk the collection starting at the current
//! cursor position. When `rewind` is `true` the cursor returns to the first
//! element on every exit path: normal completion, a callback error, or a
//! panic unwinding through the traversal. When `rewind` is `false` the
//! cursor is left where the walk stopped: past the end after a complete
//! walk, or on the element whose callback failed.
//!
//! Every traversal takes `&mut self`, so a callback can never start a
//! second traversal of the same collection.

use std::convert::Infallible;

use crate::collection::Collection;
use crate::key::{Key, Kind};

/// Restores the cursor when a traversal ends, however it ends.
struct CursorGuard<'a> {
    cursor: &'a mut usize,
    position: usize,
    rewind: bool,
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        *self.cursor = if self.rewind { 0 } else { self.position };
    }
}

impl<K: Kind> Collection<K> {
    fn walk<A, E, F>(&mut self, rewind: bool, initial: A, step: F) -> Result<A, E>
    where
        F: FnMut(A, &K::Item, &Key) -> Result<A, E>,
    {
        let start = self.cursor;
        self.walk_from(start, rewind, initial, step)
    }

    /// Folds over the elements from `start` on, applying the cursor policy
    /// however the fold ends.
    pub(crate) fn walk_from<A, E, F>(&mut self, start: usize, rewind: bool, initial: A, mut step: F) -> Result<A, E>
    where
        F: FnMut(A, &K::Item, &Key) -> Result<A, E>,
    {
        let Collection {
            entries, cursor, ..
        } = self;
        let mut guard = CursorGuard {
            position: start,
            cursor,
            rewind,
        };

        let mut accumulator = initial;
        while let Some((key, item)) = entries.get(guard.position) {
            accumulator = step(accumulator, item, key)?;
            guard.position += 1;
        }
        Ok(accumulator)
    }

    /// Calls `function(element, key)` for each element from the cursor on,
    /// stopping at the first error.
    ///
    /// The error is returned after the cursor policy has been applied.
    ///
    /// # Example
    ///
    /// ```
    /// use assort::List;
    ///
    /// let mut list = List::from_iterable([1, 2, 3, 4, 5]);
    /// let result = list.try_each(
    ///     |n, _| if *n == 3 { Err("three") } else { Ok(()) },
    ///     false,
    /// );
    ///
    /// assert_eq!(result.err(), Some("three"));
    /// assert_eq!(list.current(), Some(&3));
    /// ```
    pub fn try_each<E, F>(&mut self, mut function: F, rewind: bool) -> Result<&mut Self, E>
    where
        F: FnMut(&K::Item, &Key) -> Result<(), E>,
    {
        self.walk(rewind, (), |(), item, key| function(item, key))?;
        Ok(self)
    }

    /// Calls `function(element, key)` for each element from the cursor on.
    pub fn each<F>(&mut self, mut function: F, rewind: bool) -> &mut Self
    where
        F: FnMut(&K::Item, &Key),
    {
        let result = self.try_each(
            |item, key| {
                function(item, key);
                Ok::<(), Infallible>(())
            },
            rewind,
        );
        match result {
            Ok(this) => this,
            Err(never) => match never {},
        }
    }

    /// Collects `function(element, key)` for each element from the cursor
    /// on, stopping at the first error.
    pub fn try_map<R, E, F>(&mut self, mut function: F, rewind: bool) -> Result<Vec<R>, E>
    where
        F: FnMut(&K::Item, &Key) -> Result<R, E>,
    {
        let capacity = self.entries.len().saturating_sub(self.cursor);
        self.walk(rewind, Vec::with_capacity(capacity), |mut mapped, item, key| {
            mapped.push(function(item, key)?);
            Ok(mapped)
        })
    }

    /// Collects `function(element, key)` for each element from the cursor on.
    pub fn map<R, F>(&mut self, mut function: F, rewind: bool) -> Vec<R>
    where
        F: FnMut(&K::Item, &Key) -> R,
    {
        match self.try_map(|item, key| Ok::<R, Infallible>(function(item, key)), rewind) {
            Ok(mapped) => mapped,
            Err(never) => match never {},
        }
    }

    /// Folds `function(accumulator, element, key)` over each element from
    /// the cursor on, stopping at the first error.
    pub fn try_reduce<A, E, F>(&mut self, function: F, initial: A, rewind: bool) -> Result<A, E>
    where
        F: FnMut(A, &K::Item, &Key) -> Result<A, E>,
    {
        self.walk(rewind, initial, function)
    }

    /// Folds `function(accumulator, element, key)` over each element from
    /// the cursor on.
    pub fn reduce<A, F>(&mut self, mut function: F, initial: A, rewind: bool) -> A
    where
        F: FnMut(A, &K::Item, &Key) -> A,
    {
        match self.try_reduce(
            |acc, item, key| Ok::<A, Infallible>(function(acc, item, key)),
            initial,
            rewind,
        ) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::key::Key;
    use crate::List;

    #[test]
    fn each_visits_all_and_rewinds() {
        let mut list = List::from_iterable([1, 2, 3, 4, 5]);
        let mut doubled = Vec::new();
        list.each(|n, _| doubled.push(n * 2), true);

        assert_eq!(doubled, vec![2, 4, 6, 8, 10]);
        assert_eq!(list.current(), Some(&1));
    }

    #[test]
    fn each_without_rewind_ends_past_the_end() {
        let mut list = List::from_iterable([1, 2, 3, 4, 5]);
        list.each(|_, _| {}, false);

        assert!(!list.valid());
        assert_eq!(list.current(), None);
    }

    #[test]
    fn each_starts_at_cursor() {
        let mut list = List::from_iterable([1, 2, 3]);
        list.advance();

        let mut seen = Vec::new();
        list.each(|n, key| seen.push((*n, key.clone())), true);
        assert_eq!(seen, vec![(2, Key::Index(1)), (3, Key::Index(2))]);
    }

    #[test]
    fn error_with_rewind_resets_cursor() {
        let mut list = List::from_iterable([1, 2, 3, 4, 5]);
        let mut calls = 0;
        let result = list.try_each(
            |n, _| {
                calls += 1;
                if *n == 3 {
                    Err(format!("failed on {}", n))
                } else {
                    Ok(())
                }
            },
            true,
        );

        assert_eq!(result.err(), Some("failed on 3".to_string()));
        assert_eq!(calls, 3);
        assert_eq!(list.current(), Some(&1));
    }

    #[test]
    fn error_without_rewind_stays_on_failing_element() {
        let mut list = List::from_iterable([1, 2, 3, 4, 5]);
        let result = list.try_each(|n, _| if *n == 3 { Err(()) } else { Ok(()) }, false);

        assert!(result.is_err());
        assert_eq!(list.current(), Some(&3));
        assert_eq!(list.key(), Some(&Key::Index(2)));
    }

    #[test]
    fn panic_with_rewind_resets_cursor() {
        let mut list = List::from_iterable([1, 2, 3]);
        list.advance();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            list.each(
                |n, _| {
                    if *n == 3 {
                        panic!("boom");
                    }
                },
                true,
            );
        }));

        assert!(outcome.is_err());
        assert_eq!(list.current(), Some(&1));
    }

    #[test]
    fn map_collects_results() {
        let mut list = List::from_iterable([1, 2, 3]);
        let mapped = list.map(|n, key| format!("{}={}", key, n), true);
        assert_eq!(mapped, vec!["0=1", "1=2", "2=3"]);
        assert_eq!(list.current(), Some(&1));
    }

    #[test]
    fn try_map_propagates_error() {
        let mut list = List::from_iterable([1, 2, 3]);
        let mapped: Result<Vec<i64>, &str> =
            list.try_map(|n, _| if *n < 3 { Ok(n * 10) } else { Err("too big") }, false);

        assert_eq!(mapped, Err("too big"));
        assert_eq!(list.current(), Some(&3));
    }

    #[test]
    fn reduce_folds() {
        let mut list = List::from_iterable([1, 2, 3, 4]);
        let sum = list.reduce(|acc, n, _| acc + n, 0, true);
        assert_eq!(sum, 10);

        let keys = list.reduce(
            |mut acc: Vec<Key>, _, key| {
                acc.push(key.clone());
                acc
            },
            Vec::new(),
            false,
        );
        assert_eq!(keys.len(), 4);
        assert!(!list.valid());
    }

    #[test]
    fn try_reduce_propagates_error() {
        let mut list = List::from_iterable([1, 2, 3, 4]);
        let result = list.try_reduce(
            |acc: i64, n, _| if *n == 2 { Err("two") } else { Ok(acc + n) },
            0,
            true,
        );
        assert_eq!(result, Err("two"));
        assert_eq!(list.current(), Some(&1));
    }

    #[test]
    fn reduce_on_empty_returns_initial() {
        let mut list: List<i64> = List::new();
        assert_eq!(list.reduce(|acc, n, _| acc + n, 7, true), 7);
    }
}
