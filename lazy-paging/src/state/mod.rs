//! Paging state: cursor, page size, sort, filters and the cached total.
//!
//! [`PagingState`] is the only piece of a [`PagedModel`](crate::PagedModel)
//! meant to outlive a request. It can be persisted with the helpers in this
//! module and handed back to [`PagedModel::from_state`](crate::PagedModel::from_state).
//! The loaded rows are never part of it.

mod persist;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::config::PagingConfig;
use crate::error::PagingError;
use crate::error::check_page_size;
use crate::order::Direction;

/// Row index meaning "no row selected".
pub const NO_ROW: i32 = -1;

/// Column-to-value filter map passed through to the loader.
pub type Filters = BTreeMap<String, String>;

/// Mutable paging parameters plus the cursor and the last known total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingState {
    row_index: i32,
    page_size: i32,
    sort_column: Option<String>,
    sort_ascending: bool,
    filters: Filters,
    total_row_count: Option<u64>,
}

impl PagingState {
    /// Creates a state with the given page size and no cursor.
    pub fn new(page_size: i32) -> Result<Self, PagingError> {
        Ok(Self {
            row_index: NO_ROW,
            page_size: check_page_size(page_size)?,
            sort_column: None,
            sort_ascending: true,
            filters: Filters::new(),
            total_row_count: None,
        })
    }

    /// Creates a state from a validated config.
    pub fn from_config(config: &PagingConfig) -> Result<Self, PagingError> {
        config.validate()?;
        let mut state = Self::new(config.page_size)?;
        state.sort_column = config.sort_column.clone();
        state.sort_ascending = config.sort_ascending;
        Ok(state)
    }

    /// Returns the current cursor, or [`NO_ROW`].
    pub fn row_index(&self) -> i32 {
        self.row_index
    }

    /// Returns the page size.
    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Returns the sort column, if any.
    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    /// Returns `true` if sorting is ascending.
    pub fn sort_ascending(&self) -> bool {
        self.sort_ascending
    }

    /// Returns the active filters.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Returns the last known total row count.
    pub fn total_row_count(&self) -> Option<u64> {
        self.total_row_count
    }

    /// Returns a read-only view of this state positioned at `row_index`.
    ///
    /// The stored cursor is left untouched.
    pub fn snapshot_at(&self, row_index: i32) -> StateSnapshot<'_> {
        StateSnapshot {
            row_index,
            state: self,
        }
    }

    /// Returns a read-only view of this state at the current cursor.
    pub fn snapshot(&self) -> StateSnapshot<'_> {
        self.snapshot_at(self.row_index)
    }

    pub(crate) fn set_row_index(&mut self, row_index: i32) {
        self.row_index = row_index;
    }

    pub(crate) fn set_page_size(&mut self, page_size: i32) {
        self.page_size = page_size;
        self.total_row_count = None;
    }

    pub(crate) fn set_sort_column(&mut self, column: Option<String>) {
        self.sort_column = column;
        self.total_row_count = None;
    }

    pub(crate) fn set_sort_ascending(&mut self, ascending: bool) {
        self.sort_ascending = ascending;
        self.total_row_count = None;
    }

    pub(crate) fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.total_row_count = None;
    }

    pub(crate) fn set_total_row_count(&mut self, total: Option<u64>) {
        self.total_row_count = total;
    }

    pub(crate) fn check(&self) -> Result<(), PagingError> {
        check_page_size(self.page_size)?;
        if self.row_index < NO_ROW {
            return Err(PagingError::InvalidRowIndex(self.row_index));
        }
        Ok(())
    }
}

impl Default for PagingState {
    fn default() -> Self {
        Self {
            row_index: NO_ROW,
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            sort_column: None,
            sort_ascending: true,
            filters: Filters::new(),
            total_row_count: None,
        }
    }
}

/// Read-only view of a [`PagingState`] handed to a [`Loader`](crate::Loader).
///
/// The row index is the one the cache needs rows for, which may differ from
/// the model's cursor.
#[derive(Debug, Clone, Copy)]
pub struct StateSnapshot<'a> {
    row_index: i32,
    state: &'a PagingState,
}

impl<'a> StateSnapshot<'a> {
    /// Returns the row index the loader should return a window for.
    pub fn row_index(&self) -> i32 {
        self.row_index
    }

    /// Returns the requested page size. Loaders may return fewer rows.
    pub fn page_size(&self) -> i32 {
        self.state.page_size
    }

    /// Returns the sort column, if any.
    pub fn sort_column(&self) -> Option<&'a str> {
        self.state.sort_column.as_deref()
    }

    /// Returns `true` if sorting is ascending.
    pub fn sort_ascending(&self) -> bool {
        self.state.sort_ascending
    }

    /// Returns the sort column with its direction, if a column is set.
    pub fn sort(&self) -> Option<(&'a str, Direction)> {
        self.sort_column()
            .map(|column| (column, Direction::from_ascending(self.sort_ascending())))
    }

    /// Returns the active filters.
    pub fn filters(&self) -> &'a Filters {
        &self.state.filters
    }

    /// Returns the offset of the page holding `row_index`.
    ///
    /// Returns `0` when no row is selected.
    pub fn page_offset(&self) -> i32 {
        if self.row_index <= 0 {
            return 0;
        }
        self.row_index - self.row_index % self.state.page_size
    }
}
