//! Paging configuration

use crate::error::PagingError;
use crate::error::check_page_size;

/// Default number of rows requested per window.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Initial paging parameters for a new [`PagedModel`](crate::PagedModel).
///
/// # Example
///
/// ```
/// use lazy_paging::PagingConfig;
///
/// let config = PagingConfig::default()
///     .with_page_size(25)
///     .with_sort_column("name")
///     .with_sort_ascending(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingConfig {
    /// Rows requested per window.
    ///
    /// Default: 10
    pub page_size: i32,

    /// Column to sort by, if any.
    ///
    /// Default: none
    pub sort_column: Option<String>,

    /// Whether sorting is ascending.
    ///
    /// Default: true
    pub sort_ascending: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_column: None,
            sort_ascending: true,
        }
    }
}

impl PagingConfig {
    /// Creates a new paging config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the initial sort column.
    pub fn with_sort_column(mut self, column: impl Into<String>) -> Self {
        self.sort_column = Some(column.into());
        self
    }

    /// Sets the initial sort direction.
    pub fn with_sort_ascending(mut self, ascending: bool) -> Self {
        self.sort_ascending = ascending;
        self
    }

    /// Checks that the configured values are usable.
    pub fn validate(&self) -> Result<(), PagingError> {
        check_page_size(self.page_size)?;
        Ok(())
    }
}
