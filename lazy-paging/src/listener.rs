//! Row-changed notifications.

/// Receives a notification whenever the cursor of a
/// [`PagedModel`](crate::PagedModel) moves onto a row.
///
/// Listeners run synchronously inside
/// [`PagedModel::set_row_index`](crate::PagedModel::set_row_index), in
/// registration order. `row_data` is `None` when no row is available at the
/// new index.
pub trait RowListener<E> {
    /// Called after the cursor moved to `row_index`.
    fn on_row_selected(&mut self, row_index: i32, row_data: Option<&E>);
}

impl<E, F> RowListener<E> for F
where
    F: FnMut(i32, Option<&E>),
{
    fn on_row_selected(&mut self, row_index: i32, row_data: Option<&E>) {
        self(row_index, row_data)
    }
}
