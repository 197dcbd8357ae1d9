//! Single-window row cache.
//!
//! [`RowWindowCache`] holds the last [`RowWindow`] returned by a [`Loader`]
//! and answers row queries against it. A new window is only requested when
//! the index being asked about falls outside the cached one, so stepping
//! through a page costs one loader call.
//!
//! The cache keeps no reference to the state or the loader; both are passed
//! into each call by the owning [`PagedModel`](crate::PagedModel).

use log::debug;
use log::trace;
use log::warn;

use crate::error::PagingError;
use crate::loader::Loader;
use crate::state::NO_ROW;
use crate::state::PagingState;
use crate::window::RowWindow;

/// Caches at most one row window and resolves row queries against it.
#[derive(Debug)]
pub struct RowWindowCache<E> {
    /// Last resolved window. Replaced, never modified.
    window: Option<RowWindow<E>>,
    /// Answer for [`NO_ROW`] queries.
    no_row: RowWindow<E>,
    /// Where the next row count lookup should fetch when no row is selected.
    next_likely_index: Option<i32>,
}

impl<E> Default for RowWindowCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RowWindowCache<E> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            window: None,
            no_row: RowWindow::empty(NO_ROW),
            next_likely_index: None,
        }
    }

    /// Returns the cached window, if any.
    pub fn window(&self) -> Option<&RowWindow<E>> {
        self.window.as_ref()
    }

    /// Returns the hint recorded by [`RowWindowCache::clear_cached_row_count`].
    pub fn next_likely_index(&self) -> Option<i32> {
        self.next_likely_index
    }

    /// Drops the cached window so the next query fetches again.
    pub fn invalidate(&mut self) {
        if self.window.take().is_some() {
            debug!("Row window invalidated");
        }
    }

    /// Returns a window containing `row_index`, loading one if needed.
    ///
    /// If the loader returns nothing, or a window that does not contain
    /// `row_index`, the empty window for `row_index` is cached instead. A
    /// known total on the new window is stored in `state`. When the loader
    /// fails the previously cached window is kept.
    pub fn resolve<L>(
        &mut self,
        row_index: i32,
        state: &mut PagingState,
        loader: &L,
    ) -> Result<&RowWindow<E>, PagingError>
    where
        L: Loader<E> + ?Sized,
    {
        if row_index == NO_ROW {
            return Ok(&self.no_row);
        }

        let cached = self
            .window
            .as_ref()
            .is_some_and(|window| window.contains(row_index));

        if cached {
            trace!("Row {} served from cached window", row_index);
        } else {
            let window = Self::load(row_index, state, loader)?;
            if let Some(total) = window.total_row_count() {
                state.set_total_row_count(Some(total));
            }
            self.window = Some(window);
        }

        Ok(self.window.get_or_insert_with(|| RowWindow::empty(row_index)))
    }

    fn load<L>(row_index: i32, state: &PagingState, loader: &L) -> Result<RowWindow<E>, PagingError>
    where
        L: Loader<E> + ?Sized,
    {
        debug!(
            "Loading rows for index {} (page size {})",
            row_index,
            state.page_size()
        );

        let loaded = loader
            .get_rows(&state.snapshot_at(row_index))
            .map_err(PagingError::Loader)?;

        let window = match loaded {
            Some(window) if window.contains(row_index) => window,
            Some(window) => {
                warn!(
                    "Loader returned rows {}..{} which do not contain index {}",
                    window.offset(),
                    i64::from(window.offset()) + i64::from(window.size()),
                    row_index
                );
                RowWindow::empty(row_index)
            }
            None => {
                debug!("Loader returned no rows for index {}", row_index);
                RowWindow::empty(row_index)
            }
        };
        Ok(window)
    }

    /// Returns `true` if a row is available at `row_index`.
    pub fn is_row_available<L>(
        &mut self,
        row_index: i32,
        state: &mut PagingState,
        loader: &L,
    ) -> Result<bool, PagingError>
    where
        L: Loader<E> + ?Sized,
    {
        Ok(self.resolve(row_index, state, loader)?.is_row_available(row_index))
    }

    /// Returns the row at `row_index`.
    ///
    /// Fails with [`PagingError::NoRowAvailable`] if the resolved window has
    /// no row there, including for [`NO_ROW`].
    pub fn row_data<L>(
        &mut self,
        row_index: i32,
        state: &mut PagingState,
        loader: &L,
    ) -> Result<&E, PagingError>
    where
        L: Loader<E> + ?Sized,
    {
        self.resolve(row_index, state, loader)?
            .row_data(row_index)
            .ok_or_else(|| PagingError::no_row(row_index))
    }

    /// Returns the total row count, or `None` if it is unknown.
    ///
    /// The count stored in `state` is used when present. Otherwise a window
    /// is resolved at the current cursor or, with no cursor, at the next
    /// likely index before falling back to the first row, and its total is
    /// stored. The window may come from the cache. Totals that do not fit in
    /// an `i32` are reported as unknown.
    pub fn row_count<L>(&mut self, state: &mut PagingState, loader: &L) -> Result<Option<i32>, PagingError>
    where
        L: Loader<E> + ?Sized,
    {
        if state.total_row_count().is_none() {
            let total = self.discover_total(state, loader)?;
            if total.is_some() {
                state.set_total_row_count(total);
            }
        }

        Ok(state.total_row_count().and_then(|total| {
            let count = i32::try_from(total).ok();
            if count.is_none() {
                warn!("Total row count {} exceeds i32::MAX, reporting unknown", total);
            }
            count
        }))
    }

    fn discover_total<L>(&mut self, state: &mut PagingState, loader: &L) -> Result<Option<u64>, PagingError>
    where
        L: Loader<E> + ?Sized,
    {
        let row_index = state.row_index();
        if row_index != NO_ROW {
            return Ok(self.resolve(row_index, state, loader)?.total_row_count());
        }

        if let Some(hint) = self.next_likely_index.take() {
            let window = self.resolve(hint, state, loader)?;
            if window.is_row_available(hint) {
                return Ok(window.total_row_count());
            }
            debug!("No row at next likely index {}, counting from the first row", hint);
        }
        Ok(self.resolve(0, state, loader)?.total_row_count())
    }

    /// Forgets the total row count stored in `state`.
    ///
    /// `next_likely_index` is where the next row count lookup should fetch
    /// when no row is selected; pass [`NO_ROW`] for the first row.
    pub fn clear_cached_row_count(&mut self, state: &mut PagingState, next_likely_index: i32) {
        state.set_total_row_count(None);
        self.next_likely_index = (next_likely_index >= 0).then_some(next_likely_index);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::BoxError;
    use crate::state::StateSnapshot;

    /// Pages of "Data {i}" rows with a fixed total, counting calls.
    struct Counting {
        calls: Cell<usize>,
        total: u64,
    }

    impl Counting {
        fn new(total: u64) -> Self {
            Self {
                calls: Cell::new(0),
                total,
            }
        }
    }

    impl Loader<String> for Counting {
        fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<String>>, BoxError> {
            self.calls.set(self.calls.get() + 1);
            let offset = state.page_offset();
            let end = (i64::from(offset) + i64::from(state.page_size())).min(self.total as i64) as i32;
            let rows = (offset..end.max(offset)).map(|i| format!("Data {}", i)).collect();
            Ok(Some(
                RowWindow::new(offset, state.page_size(), rows)?.with_total_row_count(self.total),
            ))
        }
    }

    struct Failing;

    impl Loader<String> for Failing {
        fn get_rows(&self, _state: &StateSnapshot<'_>) -> Result<Option<RowWindow<String>>, BoxError> {
            Err("connection reset".into())
        }
    }

    #[test]
    fn test_no_row_never_loads() {
        let loader = Counting::new(100);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();

        assert!(!cache.is_row_available(NO_ROW, &mut state, &loader).unwrap());
        assert!(matches!(
            cache.row_data(NO_ROW, &mut state, &loader),
            Err(PagingError::NoRowAvailable { row_index: -1 })
        ));
        assert_eq!(loader.calls.get(), 0);
    }

    #[test]
    fn test_reuses_window_within_page() {
        let loader = Counting::new(100);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();

        for i in 0..10 {
            assert_eq!(cache.row_data(i, &mut state, &loader).unwrap(), &format!("Data {}", i));
        }
        assert_eq!(loader.calls.get(), 1);

        cache.row_data(10, &mut state, &loader).unwrap();
        assert_eq!(loader.calls.get(), 2);
        assert_eq!(state.total_row_count(), Some(100));
        // loading does not move the cursor
        assert_eq!(state.row_index(), NO_ROW);
    }

    #[test]
    fn test_short_page_rows_are_unavailable_without_refetch() {
        let loader = Counting::new(13);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();

        assert!(cache.is_row_available(12, &mut state, &loader).unwrap());
        assert!(!cache.is_row_available(13, &mut state, &loader).unwrap());
        assert!(!cache.is_row_available(19, &mut state, &loader).unwrap());
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn test_substitutes_empty_window() {
        let loader = crate::loader::from_fn(|_state| Ok(None::<RowWindow<String>>));
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();

        assert!(!cache.is_row_available(4, &mut state, &loader).unwrap());
        let window = cache.window().unwrap();
        assert!(window.contains(4));
        assert!(!window.contains(5));
    }

    #[test]
    fn test_substitutes_window_missing_index() {
        let loader = crate::loader::from_fn(|_state| {
            Ok(Some(RowWindow::new(0, 5, vec!["a".to_string()])?.with_total_row_count(1)))
        });
        let mut state = PagingState::new(5).unwrap();
        let mut cache = RowWindowCache::new();

        assert!(cache.row_data(30, &mut state, &loader).is_err());
        assert_eq!(cache.window().map(RowWindow::offset), Some(30));
        assert_eq!(state.total_row_count(), None);
    }

    #[test]
    fn test_failed_load_keeps_previous_window() {
        let loader = Counting::new(100);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();
        cache.resolve(3, &mut state, &loader).unwrap();

        let err = cache.resolve(50, &mut state, &Failing).unwrap_err();
        assert!(err.is_loader_error());
        assert_eq!(cache.window().map(RowWindow::offset), Some(0));
        assert_eq!(cache.row_data(3, &mut state, &loader).unwrap(), "Data 3");
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn test_row_count_prefers_cached_total() {
        let loader = Counting::new(100);
        let mut state = PagingState::new(10).unwrap();
        state.set_total_row_count(Some(7));
        let mut cache = RowWindowCache::new();

        assert_eq!(cache.row_count(&mut state, &loader).unwrap(), Some(7));
        assert_eq!(loader.calls.get(), 0);
    }

    #[test]
    fn test_row_count_uses_next_likely_index() {
        let loader = Counting::new(100);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();

        cache.clear_cached_row_count(&mut state, 40);
        assert_eq!(cache.row_count(&mut state, &loader).unwrap(), Some(100));
        assert_eq!(loader.calls.get(), 1);
        assert_eq!(cache.window().map(RowWindow::offset), Some(40));
        assert_eq!(cache.next_likely_index(), None);
    }

    #[test]
    fn test_row_count_falls_back_to_first_row() {
        let loader = Counting::new(15);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();

        cache.clear_cached_row_count(&mut state, 90);
        assert_eq!(cache.row_count(&mut state, &loader).unwrap(), Some(15));
        assert_eq!(loader.calls.get(), 2);
        assert_eq!(cache.window().map(RowWindow::offset), Some(0));
    }

    #[test]
    fn test_row_count_caps_oversized_total() {
        let loader = Counting::new(i32::MAX as u64 + 1);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();

        assert_eq!(cache.row_count(&mut state, &loader).unwrap(), None);
        assert_eq!(state.total_row_count(), Some(i32::MAX as u64 + 1));
    }

    #[test]
    fn test_row_count_unknown_total() {
        let loader = crate::loader::from_fn(|state| {
            Ok(Some(RowWindow::new(
                state.page_offset(),
                state.page_size(),
                vec![1, 2, 3],
            )?))
        });
        let mut state = PagingState::new(3).unwrap();
        let mut cache = RowWindowCache::new();

        assert_eq!(cache.row_count(&mut state, &loader).unwrap(), None);
        assert!(cache.is_row_available(2, &mut state, &loader).unwrap());
    }

    #[test]
    fn test_row_count_reads_total_from_cached_window() {
        let loader = Counting::new(100);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();
        state.set_row_index(5);
        cache.row_data(5, &mut state, &loader).unwrap();

        cache.clear_cached_row_count(&mut state, 5);
        assert_eq!(state.total_row_count(), None);
        assert_eq!(cache.row_count(&mut state, &loader).unwrap(), Some(100));
        assert_eq!(state.total_row_count(), Some(100));
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn test_row_count_hint_inside_cached_window() {
        let loader = Counting::new(100);
        let mut state = PagingState::new(10).unwrap();
        let mut cache = RowWindowCache::new();
        cache.row_data(5, &mut state, &loader).unwrap();

        cache.clear_cached_row_count(&mut state, 3);
        assert_eq!(cache.row_count(&mut state, &loader).unwrap(), Some(100));
        assert_eq!(loader.calls.get(), 1);
        assert_eq!(cache.next_likely_index(), None);
    }
}
