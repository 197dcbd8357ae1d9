//! Row window type for lazily loaded rows.

use crate::error::PagingError;

/// A contiguous slice of the logical row sequence returned by a [`Loader`](crate::Loader).
///
/// A window covers the row positions `offset..offset + size`, where `size` is
/// the page size used to request it. The window may hold fewer rows than it
/// covers when the source is exhausted, so a window can *contain* an index
/// without that row being *available*.
///
/// # Example
///
/// ```
/// use lazy_paging::RowWindow;
///
/// let window = RowWindow::new(20, 10, vec!["a", "b", "c"])
///     .unwrap()
///     .with_total_row_count(23);
///
/// assert!(window.contains(29));
/// assert!(window.is_row_available(22));
/// assert!(!window.is_row_available(23));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RowWindow<E> {
    offset: i32,
    size: i32,
    contents: Vec<E>,
    /// Total rows in the underlying source, if the loader could report it.
    total_row_count: Option<u64>,
}

impl<E> RowWindow<E> {
    /// Creates a window of `size` positions starting at `offset`.
    ///
    /// Fails if `offset` is negative, `size` is not positive, `contents`
    /// holds more than `size` rows, or a row would sit past `i32::MAX`.
    pub fn new(offset: i32, size: i32, contents: Vec<E>) -> Result<Self, PagingError> {
        if offset < 0 {
            return Err(PagingError::invalid_window(format!(
                "offset must not be negative, got {}",
                offset
            )));
        }
        if size <= 0 {
            return Err(PagingError::invalid_window(format!(
                "size must be greater than zero, got {}",
                size
            )));
        }
        if contents.len() > size as usize {
            return Err(PagingError::invalid_window(format!(
                "{} rows do not fit a window of size {}",
                contents.len(),
                size
            )));
        }
        if i64::from(offset) + contents.len() as i64 > i64::from(i32::MAX) + 1 {
            return Err(PagingError::invalid_window(format!(
                "{} rows at offset {} run past the last row index",
                contents.len(),
                offset
            )));
        }
        Ok(Self {
            offset,
            size,
            contents,
            total_row_count: None,
        })
    }

    /// Creates the empty window for `row_index`.
    ///
    /// The empty window contains `row_index` and no other index, and never
    /// has a row available.
    pub fn empty(row_index: i32) -> Self {
        Self {
            offset: row_index,
            size: 1,
            contents: Vec::new(),
            total_row_count: None,
        }
    }

    /// Sets the total row count of the underlying source.
    pub fn with_total_row_count(mut self, total: u64) -> Self {
        self.total_row_count = Some(total);
        self
    }

    /// Sets or clears the total row count of the underlying source.
    pub fn with_optional_total_row_count(mut self, total: Option<u64>) -> Self {
        self.total_row_count = total;
        self
    }

    /// Returns the index of the first row position covered by this window.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Returns the number of row positions covered by this window.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns the total row count, if known.
    pub fn total_row_count(&self) -> Option<u64> {
        self.total_row_count
    }

    /// Returns `true` if `row_index` falls inside the covered positions.
    pub fn contains(&self, row_index: i32) -> bool {
        // widen to avoid overflow near i32::MAX
        let index = i64::from(row_index);
        let start = i64::from(self.offset);
        index >= start && index < start + i64::from(self.size)
    }

    /// Returns `true` if a row is actually present at `row_index`.
    pub fn is_row_available(&self, row_index: i32) -> bool {
        self.position(row_index).is_some()
    }

    /// Returns the row at `row_index`, if available.
    pub fn row_data(&self, row_index: i32) -> Option<&E> {
        self.position(row_index).map(|pos| &self.contents[pos])
    }

    /// Returns the rows held by this window.
    pub fn rows(&self) -> &[E] {
        &self.contents
    }

    /// Consumes the window and returns the rows.
    pub fn into_rows(self) -> Vec<E> {
        self.contents
    }

    /// Returns the number of rows actually held.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Returns `true` if this window holds no rows.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Returns an iterator of `(row_index, row)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &E)> {
        // rows never sit past i32::MAX, checked in `new`
        self.contents
            .iter()
            .enumerate()
            .map(move |(pos, row)| (self.offset + pos as i32, row))
    }

    fn position(&self, row_index: i32) -> Option<usize> {
        let pos = i64::from(row_index) - i64::from(self.offset);
        usize::try_from(pos)
            .ok()
            .filter(|&pos| pos < self.contents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_final_window() {
        let window = RowWindow::new(10, 10, vec![10, 11, 12]).unwrap();
        assert!(window.contains(10));
        assert!(window.contains(19));
        assert!(!window.contains(20));
        assert!(!window.contains(9));
        assert!(window.is_row_available(12));
        assert!(!window.is_row_available(13));
        assert_eq!(window.row_data(11), Some(&11));
        assert_eq!(window.row_data(15), None);
    }

    #[test]
    fn test_empty_window() {
        let window: RowWindow<String> = RowWindow::empty(5);
        assert!(window.contains(5));
        assert!(!window.contains(4));
        assert!(!window.contains(6));
        assert!(!window.is_row_available(5));
        assert_eq!(window.total_row_count(), None);

        let none: RowWindow<String> = RowWindow::empty(-1);
        assert!(none.contains(-1));
        assert!(!none.contains(0));
        assert!(!none.is_row_available(-1));
        assert!(!none.is_row_available(i32::MAX));
    }

    #[test]
    fn test_rejects_inconsistent_bounds() {
        assert!(RowWindow::new(-1, 10, vec![1]).is_err());
        assert!(RowWindow::new(0, 0, Vec::<i32>::new()).is_err());
        assert!(matches!(
            RowWindow::new(0, 2, vec![1, 2, 3]),
            Err(PagingError::InvalidWindow { .. })
        ));
        assert!(RowWindow::new(i32::MAX - 1, 10, vec!['a', 'b', 'c']).is_err());
    }

    #[test]
    fn test_contains_near_max() {
        let window = RowWindow::new(i32::MAX - 1, 10, vec!['x']).unwrap();
        assert!(window.contains(i32::MAX));
        assert!(window.is_row_available(i32::MAX - 1));
        assert!(!window.is_row_available(i32::MAX));
    }

    #[test]
    fn test_iter_yields_row_indexes() {
        let window = RowWindow::new(3, 5, vec!["d", "e"]).unwrap();
        let pairs: Vec<_> = window.iter().collect();
        assert_eq!(pairs, vec![(3, &"d"), (4, &"e")]);
    }

    #[test]
    fn test_iter_reaches_last_row_index() {
        let window = RowWindow::new(i32::MAX - 1, 10, vec!['y', 'z']).unwrap();
        let pairs: Vec<_> = window.iter().collect();
        assert_eq!(pairs, vec![(i32::MAX - 1, &'y'), (i32::MAX, &'z')]);
    }
}
