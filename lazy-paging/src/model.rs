//! Cursor-driven paged model.

use log::debug;

use crate::cache::RowWindowCache;
use crate::config::PagingConfig;
use crate::error::PagingError;
use crate::error::check_page_size;
use crate::listener::RowListener;
use crate::loader::Loader;
use crate::state::Filters;
use crate::state::NO_ROW;
use crate::state::PagingState;
use crate::window::RowWindow;

/// A lazily loaded, paged view over rows fetched by a [`Loader`].
///
/// The model tracks a cursor (the row index) and loads rows one window at a
/// time as the cursor moves. Changing the page size, sort or filters resets
/// the cursor and drops everything loaded so far.
///
/// A model serves a single cursor and is not meant to be shared between
/// threads. Only its [`PagingState`] should be persisted between requests;
/// rebuild the model with [`PagedModel::from_state`] and rows will be loaded
/// again on first access.
///
/// # Example
///
/// ```
/// use lazy_paging::{PagedModel, PagingConfig, VecLoader};
///
/// let rows: Vec<String> = (0..95).map(|i| format!("Data {}", i)).collect();
/// let config = PagingConfig::default().with_page_size(20);
/// let mut model = PagedModel::with_config(VecLoader::new(rows), config).unwrap();
///
/// assert_eq!(model.row_count().unwrap(), Some(95));
///
/// model.set_row_index(42).unwrap();
/// assert_eq!(model.row_data().unwrap(), "Data 42");
///
/// model.set_row_index(95).unwrap();
/// assert!(!model.is_row_available().unwrap());
/// ```
pub struct PagedModel<E, L> {
    state: PagingState,
    cache: RowWindowCache<E>,
    loader: L,
    listeners: Vec<Box<dyn RowListener<E>>>,
}

impl<E, L> std::fmt::Debug for PagedModel<E, L>
where
    E: std::fmt::Debug,
    L: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedModel")
            .field("state", &self.state)
            .field("cache", &self.cache)
            .field("loader", &self.loader)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E, L: Loader<E>> PagedModel<E, L> {
    /// Creates a model with the default [`PagingConfig`].
    pub fn new(loader: L) -> Self {
        Self::from_parts(loader, PagingState::default())
    }

    /// Creates a model with the given config.
    ///
    /// Fails if the page size is not positive.
    pub fn with_config(loader: L, config: PagingConfig) -> Result<Self, PagingError> {
        Ok(Self::from_parts(loader, PagingState::from_config(&config)?))
    }

    /// Rebuilds a model from previously persisted state.
    ///
    /// The cursor, parameters and any known total are restored. Rows are
    /// loaded again on first access.
    pub fn from_state(loader: L, state: PagingState) -> Result<Self, PagingError> {
        state.check()?;
        Ok(Self::from_parts(loader, state))
    }

    fn from_parts(loader: L, state: PagingState) -> Self {
        Self {
            state,
            cache: RowWindowCache::new(),
            loader,
            listeners: Vec::new(),
        }
    }

    /// Returns the paging state, suitable for persisting.
    pub fn state(&self) -> &PagingState {
        &self.state
    }

    /// Consumes the model and returns its paging state.
    pub fn into_state(self) -> PagingState {
        self.state
    }

    /// Returns the loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Returns the currently cached window, if any.
    pub fn window(&self) -> Option<&RowWindow<E>> {
        self.cache.window()
    }

    /// Returns the current cursor, or [`NO_ROW`].
    pub fn row_index(&self) -> i32 {
        self.state.row_index()
    }

    /// Moves the cursor to `row_index`, or clears it with [`NO_ROW`].
    ///
    /// Registered listeners are notified of every actual cursor change. For
    /// a row this loads its window if needed, and the cursor only moves once
    /// that load succeeded. Clearing the cursor notifies with no row and never
    /// loads. Indexes below `-1` are rejected and leave the model unchanged.
    pub fn set_row_index(&mut self, row_index: i32) -> Result<(), PagingError> {
        if row_index < NO_ROW {
            return Err(PagingError::InvalidRowIndex(row_index));
        }
        if row_index == self.state.row_index() {
            return Ok(());
        }
        if row_index == NO_ROW {
            self.clear_cursor();
            return Ok(());
        }

        if self.listeners.is_empty() {
            self.state.set_row_index(row_index);
            return Ok(());
        }
        let window = self.cache.resolve(row_index, &mut self.state, &self.loader)?;
        self.state.set_row_index(row_index);
        let row_data = window.row_data(row_index);
        for listener in &mut self.listeners {
            listener.on_row_selected(row_index, row_data);
        }
        Ok(())
    }

    fn clear_cursor(&mut self) {
        self.state.set_row_index(NO_ROW);
        for listener in &mut self.listeners {
            listener.on_row_selected(NO_ROW, None);
        }
    }

    /// Returns the page size.
    pub fn page_size(&self) -> i32 {
        self.state.page_size()
    }

    /// Sets the page size, resetting the cursor if it changed.
    pub fn set_page_size(&mut self, page_size: i32) -> Result<(), PagingError> {
        check_page_size(page_size)?;
        if page_size != self.state.page_size() {
            self.reset();
            self.state.set_page_size(page_size);
        }
        Ok(())
    }

    /// Returns the sort column, if any.
    pub fn sort_column(&self) -> Option<&str> {
        self.state.sort_column()
    }

    /// Sets or clears the sort column, resetting the cursor if it changed.
    pub fn set_sort_column(&mut self, column: Option<&str>) {
        if column != self.state.sort_column() {
            self.reset();
            self.state.set_sort_column(column.map(str::to_owned));
        }
    }

    /// Returns `true` if sorting is ascending.
    pub fn sort_ascending(&self) -> bool {
        self.state.sort_ascending()
    }

    /// Sets the sort direction, resetting the cursor if it changed.
    pub fn set_sort_ascending(&mut self, ascending: bool) {
        if ascending != self.state.sort_ascending() {
            self.reset();
            self.state.set_sort_ascending(ascending);
        }
    }

    /// Sorts by `column`, flipping the direction if it is already the sort
    /// column and sorting ascending otherwise.
    pub fn toggle_sort(&mut self, column: &str) {
        if self.state.sort_column() == Some(column) {
            let ascending = !self.state.sort_ascending();
            self.set_sort_ascending(ascending);
        } else {
            self.set_sort_column(Some(column));
            self.set_sort_ascending(true);
        }
    }

    /// Returns the active filters.
    pub fn filters(&self) -> &Filters {
        self.state.filters()
    }

    /// Replaces the filters, resetting the cursor if they changed.
    pub fn set_filters(&mut self, filters: Filters) {
        if &filters != self.state.filters() {
            self.reset();
            self.state.set_filters(filters);
        }
    }

    /// Forgets the known total row count.
    ///
    /// `next_likely_index` is the row the caller is about to show; the next
    /// [`PagedModel::row_count`] with no cursor loads that row's window
    /// rather than the first one. Pass [`NO_ROW`] for no hint.
    pub fn clear_cached_row_count(&mut self, next_likely_index: i32) {
        self.cache.clear_cached_row_count(&mut self.state, next_likely_index);
    }

    /// Returns the total row count, or `None` if the loader cannot report it
    /// or it does not fit in an `i32`.
    pub fn row_count(&mut self) -> Result<Option<i32>, PagingError> {
        self.cache.row_count(&mut self.state, &self.loader)
    }

    /// Returns `true` if a row is available at the cursor.
    pub fn is_row_available(&mut self) -> Result<bool, PagingError> {
        let row_index = self.state.row_index();
        self.cache.is_row_available(row_index, &mut self.state, &self.loader)
    }

    /// Returns the row at the cursor.
    pub fn row_data(&mut self) -> Result<&E, PagingError> {
        let row_index = self.state.row_index();
        self.cache.row_data(row_index, &mut self.state, &self.loader)
    }

    /// Returns `true` if a row is available at `row_index`, without moving
    /// the cursor.
    pub fn is_row_available_at(&mut self, row_index: i32) -> Result<bool, PagingError> {
        if row_index < NO_ROW {
            return Err(PagingError::InvalidRowIndex(row_index));
        }
        self.cache.is_row_available(row_index, &mut self.state, &self.loader)
    }

    /// Returns the row at `row_index`, without moving the cursor.
    pub fn row_data_at(&mut self, row_index: i32) -> Result<&E, PagingError> {
        if row_index < NO_ROW {
            return Err(PagingError::InvalidRowIndex(row_index));
        }
        self.cache.row_data(row_index, &mut self.state, &self.loader)
    }

    /// Registers a closure notified whenever the cursor changes.
    pub fn add_row_listener<F>(&mut self, listener: F)
    where
        F: FnMut(i32, Option<&E>) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Registers a [`RowListener`].
    pub fn add_listener(&mut self, listener: impl RowListener<E> + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Removes all listeners.
    pub fn remove_row_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Returns the number of registered listeners.
    pub fn row_listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn reset(&mut self) {
        debug!("Paging parameters changed, resetting cursor");
        if self.state.row_index() != NO_ROW {
            self.clear_cursor();
        }
        self.cache.invalidate();
        self.cache.clear_cached_row_count(&mut self.state, NO_ROW);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::loader::VecLoader;

    fn model(rows: usize, page_size: i32) -> PagedModel<String, VecLoader<String>> {
        let rows = (0..rows).map(|i| format!("Row {}", i)).collect();
        let config = PagingConfig::default().with_page_size(page_size);
        PagedModel::with_config(VecLoader::new(rows), config).unwrap()
    }

    #[test]
    fn test_rejects_bad_row_index() {
        let mut model = model(10, 5);
        model.set_row_index(3).unwrap();
        assert!(matches!(
            model.set_row_index(-2),
            Err(PagingError::InvalidRowIndex(-2))
        ));
        assert_eq!(model.row_index(), 3);
        assert!(model.row_data_at(-9).is_err());
    }

    #[test]
    fn test_rejects_bad_page_size() {
        let mut model = model(10, 5);
        model.set_row_index(3).unwrap();
        assert!(model.set_page_size(0).is_err());
        assert_eq!(model.page_size(), 5);
        assert_eq!(model.row_index(), 3);

        let config = PagingConfig::default().with_page_size(-1);
        assert!(matches!(
            PagedModel::with_config(VecLoader::new(vec![1]), config),
            Err(PagingError::InvalidPageSize(-1))
        ));
    }

    #[test]
    fn test_listeners_see_row_data() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut model = model(12, 5);

        let log = Rc::clone(&seen);
        model.add_row_listener(move |index, row: Option<&String>| {
            log.borrow_mut().push((index, row.cloned()));
        });
        assert_eq!(model.row_listener_count(), 1);

        model.set_row_index(11).unwrap();
        model.set_row_index(11).unwrap();
        model.set_row_index(12).unwrap();
        model.set_row_index(NO_ROW).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (11, Some("Row 11".to_string())),
                (12, None),
                (NO_ROW, None),
            ]
        );

        model.remove_row_listeners();
        model.set_row_index(0).unwrap();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_listeners_see_resets() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut model = model(20, 10);

        let log = Rc::clone(&seen);
        model.add_row_listener(move |index, row: Option<&String>| {
            log.borrow_mut().push((index, row.cloned()));
        });

        model.set_row_index(4).unwrap();
        model.set_row_index(NO_ROW).unwrap();
        model.set_row_index(2).unwrap();
        model.set_page_size(5).unwrap();
        // no cursor to reset
        model.set_sort_column(Some("name"));

        assert_eq!(
            *seen.borrow(),
            vec![
                (4, Some("Row 4".to_string())),
                (NO_ROW, None),
                (2, Some("Row 2".to_string())),
                (NO_ROW, None),
            ]
        );
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut model = model(3, 3);
        for id in 0..3 {
            let order = Rc::clone(&order);
            model.add_row_listener(move |_, _| order.borrow_mut().push(id));
        }
        model.set_row_index(1).unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut model = model(10, 5);
        model.toggle_sort("name");
        assert_eq!(model.sort_column(), Some("name"));
        assert!(model.sort_ascending());

        model.set_row_index(4).unwrap();
        model.toggle_sort("name");
        assert!(!model.sort_ascending());
        assert_eq!(model.row_index(), NO_ROW);

        model.toggle_sort("age");
        assert_eq!(model.sort_column(), Some("age"));
        assert!(model.sort_ascending());
    }

    #[test]
    fn test_from_state_restores_cursor() {
        let mut model = model(30, 10);
        model.set_row_index(17).unwrap();
        model.set_filters(Filters::from([("name".to_string(), "Row".to_string())]));
        model.set_row_index(17).unwrap();
        assert_eq!(model.row_count().unwrap(), Some(30));

        let bytes = model.state().to_bytes().unwrap();
        let state = PagingState::from_bytes(&bytes).unwrap();
        let mut restored =
            PagedModel::from_state(VecLoader::new(vec!["only".to_string()]), state).unwrap();

        assert_eq!(restored.row_index(), 17);
        assert_eq!(restored.filters().get("name").map(String::as_str), Some("Row"));
        assert!(restored.window().is_none());
        // known total survives, rows do not
        assert_eq!(restored.row_count().unwrap(), Some(30));
        assert!(!restored.is_row_available().unwrap());
    }
}
