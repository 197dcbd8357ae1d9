//! Lazily loaded, windowed paging
//!
//! A cursor-addressable row model over an expensive data source. Rows are
//! fetched one window at a time through a [`Loader`], the last window is
//! cached, and the cache is dropped whenever the page size, sort or filters
//! change.

pub mod adapter;
pub mod error;

mod cache;
mod config;
mod listener;
mod loader;
mod model;
mod order;
mod state;
mod window;

pub use cache::RowWindowCache;
pub use config::DEFAULT_PAGE_SIZE;
pub use config::PagingConfig;
pub use error::BoxError;
pub use error::PagingError;
pub use listener::RowListener;
pub use loader::*;
pub use model::PagedModel;
pub use order::Direction;
pub use state::*;
pub use window::RowWindow;
