//! Loader trait and in-memory loaders.

use crate::error::BoxError;
use crate::state::StateSnapshot;
use crate::window::RowWindow;

/// Fetches a window of rows for the given paging state.
///
/// Implementations should return a window containing
/// [`StateSnapshot::row_index`]. The page size is a hint: a window holding
/// fewer rows than requested is valid when the source runs out. Returning
/// `Ok(None)`, or a window that does not contain the requested index, is
/// treated as "no rows here" by the cache.
///
/// # Example
///
/// ```
/// use lazy_paging::{BoxError, Loader, RowWindow, StateSnapshot};
///
/// struct Numbers;
///
/// impl Loader<u32> for Numbers {
///     fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<u32>>, BoxError> {
///         let offset = state.page_offset();
///         let rows = (offset..offset + state.page_size()).map(|i| i as u32).collect();
///         Ok(Some(RowWindow::new(offset, state.page_size(), rows)?))
///     }
/// }
/// ```
pub trait Loader<E> {
    /// Returns the rows around `state.row_index()`, or `None` if there are none.
    fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError>;
}

impl<E, L: Loader<E> + ?Sized> Loader<E> for Box<L> {
    fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError> {
        (**self).get_rows(state)
    }
}

impl<E, L: Loader<E> + ?Sized> Loader<E> for &L {
    fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError> {
        (**self).get_rows(state)
    }
}

/// A [`Loader`] backed by a closure. Created with [`from_fn`].
#[derive(Clone)]
pub struct FnLoader<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnLoader").finish_non_exhaustive()
    }
}

/// Creates a [`Loader`] from a closure.
///
/// # Example
///
/// ```
/// use lazy_paging::{from_fn, PagedModel, RowWindow};
///
/// let loader = from_fn(|state| {
///     let offset = state.page_offset();
///     let rows = (offset..offset + state.page_size())
///         .map(|i| format!("Row {}", i))
///         .collect();
///     Ok(Some(RowWindow::new(offset, state.page_size(), rows)?.with_total_row_count(100)))
/// });
///
/// let mut model = PagedModel::new(loader);
/// model.set_row_index(42).unwrap();
/// assert_eq!(model.row_data().unwrap(), "Row 42");
/// ```
pub fn from_fn<E, F>(f: F) -> FnLoader<F>
where
    F: Fn(&StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError>,
{
    FnLoader { f }
}

impl<E, F> Loader<E> for FnLoader<F>
where
    F: Fn(&StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError>,
{
    fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError> {
        (self.f)(state)
    }
}

/// An in-memory [`Loader`] paging over an owned vector.
///
/// Sort and filter parameters are ignored; the rows are served in the order
/// given. The total row count is always reported.
#[derive(Debug, Clone, Default)]
pub struct VecLoader<E> {
    rows: Vec<E>,
}

impl<E: Clone> VecLoader<E> {
    /// Creates a loader serving `rows`.
    pub fn new(rows: Vec<E>) -> Self {
        Self { rows }
    }

    /// Returns all rows served by this loader.
    pub fn rows(&self) -> &[E] {
        &self.rows
    }
}

impl<E: Clone> Loader<E> for VecLoader<E> {
    fn get_rows(&self, state: &StateSnapshot<'_>) -> Result<Option<RowWindow<E>>, BoxError> {
        let offset = state.page_offset();
        let start = (offset as usize).min(self.rows.len());
        let end = start
            .saturating_add(state.page_size() as usize)
            .min(self.rows.len());
        let window = RowWindow::new(offset, state.page_size(), self.rows[start..end].to_vec())?
            .with_total_row_count(self.rows.len() as u64);
        Ok(Some(window))
    }
}
