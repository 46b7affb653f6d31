//! Dataset loading: where the sales CSV lives and how it gets into memory.

pub mod source;

pub use source::{DATA_ENV_VAR, DEFAULT_DATA_URL, DataSource, load};
