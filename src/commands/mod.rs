//! Scrape phase implementations

pub mod backfill;
pub mod fetch;
pub mod index;

pub use backfill::*;
pub use fetch::*;
pub use index::*;
