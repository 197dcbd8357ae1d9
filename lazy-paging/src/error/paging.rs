//! Paging error types

use super::StateCodecError;

/// Boxed error returned by [`Loader`](crate::Loader) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while paging through a lazily loaded data set.
#[derive(Debug, thiserror::Error)]
pub enum PagingError {
    /// The requested row is not available in the resolved window.
    #[error("No row available at index {row_index}")]
    NoRowAvailable {
        /// The row index that was requested.
        row_index: i32,
    },

    /// A cursor below `-1` was supplied.
    #[error("Row index must be -1 or greater, got {0}")]
    InvalidRowIndex(i32),

    /// A page size of zero or less was supplied.
    #[error("Page size must be greater than zero, got {0}")]
    InvalidPageSize(i32),

    /// A row window was constructed with inconsistent bounds.
    #[error("Invalid row window: {message}")]
    InvalidWindow {
        /// Description of the violated bound.
        message: String,
    },

    /// The loader failed while fetching rows.
    #[error("Loader failed: {0}")]
    Loader(#[source] BoxError),

    /// Persisted state could not be encoded or decoded.
    #[error(transparent)]
    StateCodec(#[from] StateCodecError),
}

impl PagingError {
    /// Creates a new no-row-available error.
    pub fn no_row(row_index: i32) -> Self {
        Self::NoRowAvailable { row_index }
    }

    /// Creates a new invalid window error.
    pub fn invalid_window(message: impl Into<String>) -> Self {
        Self::InvalidWindow {
            message: message.into(),
        }
    }

    /// Wraps an error raised by a loader.
    pub fn loader(error: impl Into<BoxError>) -> Self {
        Self::Loader(error.into())
    }

    /// Returns `true` if this error came from the loader.
    pub fn is_loader_error(&self) -> bool {
        matches!(self, Self::Loader(_))
    }

    /// Returns the underlying loader error, if this is one.
    pub fn loader_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Loader(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

/// Validates a page size, returning it unchanged when it is positive.
pub(crate) fn check_page_size(page_size: i32) -> Result<i32, PagingError> {
    if page_size > 0 {
        Ok(page_size)
    } else {
        Err(PagingError::InvalidPageSize(page_size))
    }
}
