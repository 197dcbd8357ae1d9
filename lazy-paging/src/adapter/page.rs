//! Page-result adapter.

use std::marker::PhantomData;

use crate::error::BoxError;
use crate::loader::Loader;
use crate::order::Direction;
use crate::state::Filters;
use crate::state::StateSnapshot;
use crate::window::RowWindow;

use super::fit_to_page;

/// A page of rows with an optional total count.
///
/// # Example
///
/// ```
/// use lazy_paging::adapter::Page;
///
/// let page = Page::new(vec!["a", "b"]).with_total_count(12);
/// assert_eq!(page.len(), 2);
/// assert_eq!(page.total_count(), Some(12));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    content: Vec<E>,
    /// Total row count across all pages, if the source reported it.
    total_count: Option<u64>,
    /// Whether the source has rows past this page.
    has_more: bool,
}

impl<E> Page<E> {
    /// Creates a new page that may be followed by more rows.
    pub fn new(content: Vec<E>) -> Self {
        Self {
            content,
            total_count: None,
            has_more: true,
        }
    }

    /// Creates the final page of a source.
    pub fn last(content: Vec<E>) -> Self {
        Self {
            content,
            total_count: None,
            has_more: false,
        }
    }

    /// Sets the total row count.
    pub fn with_total_count(mut self, count: u64) -> Self {
        self.total_count = Some(count);
        self
    }

    /// Returns the rows in this page.
    pub fn content(&self) -> &[E] {
        &self.content
    }

    /// Consumes the page and returns the rows.
    pub fn into_content(self) -> Vec<E> {
        self.content
    }

    /// Returns the total row count, if it was reported.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if there are more rows after this page.
    pub fn has_more(&self) -> bool {
        self.has_more
    }
}

/// A page result that can be split into rows and a total.
pub trait PageResult<E> {
    /// Consumes the result and returns its rows.
    fn unwrap_content(self) -> Vec<E>;

    /// Returns the total row count, if the result carries one.
    fn unwrap_total(&self) -> Option<u64>;

    /// Returns `true` if no rows follow this result.
    ///
    /// Lets the total be derived when the source does not report one.
    fn is_last(&self) -> bool {
        false
    }
}

impl<E> PageResult<E> for Page<E> {
    fn unwrap_content(self) -> Vec<E> {
        self.content
    }

    fn unwrap_total(&self) -> Option<u64> {
        self.total_count
    }

    fn is_last(&self) -> bool {
        !self.has_more
    }
}

impl<E> PageResult<E> for Vec<E> {
    fn unwrap_content(self) -> Vec<E> {
        self
    }

    fn unwrap_total(&self) -> Option<u64> {
        None
    }
}

impl<E> PageResult<E> for (Vec<E>, u64) {
    fn unwrap_content(self) -> Vec<E> {
        self.0
    }

    fn unwrap_total(&self) -> Option<u64> {
        Some(self.1)
    }
}

/// A page-numbered request derived from the paging state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest<'a> {
    page_number: i32,
    page_size: i32,
    sort: Option<(&'a str, Direction)>,
    filters: &'a Filters,
}

impl<'a> PageRequest<'a> {
    /// Builds the request for the page holding the snapshot's row index.
    pub fn from_snapshot(state: &StateSnapshot<'a>) -> Self {
        Self {
            page_number: state.page_offset() / state.page_size(),
            page_size: state.page_size(),
            sort: state.sort(),
            filters: state.filters(),
        }
    }

    /// Returns the zero-based page number.
    pub fn page_number(&self) -> i32 {
        self.page_number
    }

    /// Returns the page size.
    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Returns the index of the first row on the page.
    pub fn offset(&self) -> i32 {
        self.page_number * self.page_size
    }

    /// Returns the sort column and direction, if sorting.
    pub fn sort(&self) -> Option<(&'a str, Direction)> {
        self.sort
    }

    /// Returns the active filters.
    pub fn filters(&self) -> &'a Filters {
        self.filters
    }
}

/// A [`Loader`] that answers [`PageRequest`]s with a [`PageResult`].
///
/// Created with [`page_loader`].
pub struct PageLoader<F, R> {
    f: F,
    _result: PhantomData<fn() -> R>,
}

impl<F, R> std::fmt::Debug for PageLoader<F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader").finish_non_exhaustive()
    }
}

/// Creates a [`Loader`] from a closure returning page results.
///
/// Rows past the page size are dropped. When the result reports no total but
/// says it is the last page, the total is taken from its position.
///
/// # Example
///
/// ```
/// use lazy_paging::PagedModel;
/// use lazy_paging::adapter::{page_loader, Page};
///
/// let loader = page_loader(|request| {
///     let rows = (request.offset()..request.offset() + request.page_size()).collect();
///     Ok(Some(Page::new(rows).with_total_count(1_000)))
/// });
///
/// let mut model = PagedModel::new(loader);
/// model.set_row_index(57).unwrap();
/// assert_eq!(*model.row_data().unwrap(), 57);
/// ```
pub fn page_loader<E, R, F>(f: F) -> PageLoader<F, R>
where
    F: Fn(&PageRequest<'_>) -> Result<Option<R>, BoxError>,
    R: PageResult<E>,
{
    PageLoader {
        f,
        _result: PhantomData,
    }
}

impl<E, R, F> Loader<E> for PageLoader<F, R>
where
    F: Fn(&PageRequest<'_>) -> Result<Option<R>, BoxError>,
    R: PageResult<E>,
{
    fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError> {
        let request = PageRequest::from_snapshot(state);
        let Some(result) = (self.f)(&request)? else {
            return Ok(None);
        };

        let total = result.unwrap_total();
        let last = result.is_last();
        let rows = fit_to_page(result.unwrap_content(), request.page_size());
        let total = total.or_else(|| last.then(|| request.offset() as u64 + rows.len() as u64));

        let window = RowWindow::new(request.offset(), request.page_size(), rows)?
            .with_optional_total_row_count(total);
        Ok(Some(window))
    }
}
