pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod ingest;
pub mod io;
mod polars_ext;
pub mod prelude;
pub mod views;

pub use cache::{TableCache, load_and_merge, load_and_merge_with_report};
