//! Lazy-list adapter.

use serde::Deserialize;
use serde::Serialize;

use crate::error::BoxError;
use crate::loader::Loader;
use crate::order::Direction;
use crate::state::Filters;
use crate::state::StateSnapshot;
use crate::window::RowWindow;

use super::fit_to_page;

/// Sort order as understood by lazy-list sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
    /// No sort column selected.
    #[default]
    Unsorted,
}

impl From<Option<Direction>> for SortOrder {
    fn from(direction: Option<Direction>) -> Self {
        match direction {
            Some(Direction::Asc) => Self::Ascending,
            Some(Direction::Desc) => Self::Descending,
            None => Self::Unsorted,
        }
    }
}

/// A source following the lazy-list contract.
///
/// `load` returns the rows starting at `first`; `row_count` reports the total
/// as known after the most recent `load`.
pub trait LazyListSource<E> {
    /// Loads up to `page_size` rows starting at `first`.
    fn load(
        &self,
        first: i32,
        page_size: i32,
        sort_field: Option<&str>,
        sort_order: SortOrder,
        filters: &Filters,
    ) -> Result<Vec<E>, BoxError>;

    /// Returns the total row count, if known.
    fn row_count(&self) -> Option<u64>;
}

/// A [`Loader`] backed by a [`LazyListSource`].
#[derive(Debug, Clone)]
pub struct LazyListLoader<S> {
    source: S,
}

impl<S> LazyListLoader<S> {
    /// Wraps a lazy-list source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consumes the loader and returns the wrapped source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<E, S: LazyListSource<E>> Loader<E> for LazyListLoader<S> {
    fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError> {
        let first = state.page_offset();
        let sort = state.sort();
        let rows = self.source.load(
            first,
            state.page_size(),
            sort.map(|(column, _)| column),
            SortOrder::from(sort.map(|(_, direction)| direction)),
            state.filters(),
        )?;
        let rows = fit_to_page(rows, state.page_size());

        let window = RowWindow::new(first, state.page_size(), rows)?
            .with_optional_total_row_count(self.source.row_count());
        Ok(Some(window))
    }
}
