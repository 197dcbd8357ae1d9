//! Adapters from third-party paging conventions to [`Loader`](crate::Loader).
//!
//! - [`PageLoader`] - for sources that answer a [`PageRequest`] with a page
//!   result bundling rows and an optional total (see [`PageResult`])
//! - [`LazyListLoader`] - for sources following the lazy-list contract
//!   (`load(first, page_size, sort_field, sort_order, filters)` plus a row
//!   count), see [`LazyListSource`]
//!
//! The adapter is picked by the type handed to
//! [`PagedModel`](crate::PagedModel); nothing is detected at runtime.

mod lazy_list;
mod page;

pub use lazy_list::*;
pub use page::*;

use log::warn;

/// Cuts `rows` down to `page_size`, logging when rows are dropped.
fn fit_to_page<E>(mut rows: Vec<E>, page_size: i32) -> Vec<E> {
    let page_size = page_size as usize;
    if rows.len() > page_size {
        warn!(
            "Source returned {} rows for a page of {}, dropping the rest",
            rows.len(),
            page_size
        );
        rows.truncate(page_size);
    }
    rows
}
