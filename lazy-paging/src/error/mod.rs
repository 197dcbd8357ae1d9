//! Error types

mod codec;
mod paging;

pub use codec::*;
pub use paging::*;
