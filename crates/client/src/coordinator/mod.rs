//! Concurrent fetching of aggregate batches and stale-result protection.

pub mod batch;
pub mod generation;
#[cfg(test)]
pub(crate) mod testing;

pub use batch::{run_batch, BatchResult, NamedRequest};
pub use generation::{Generation, PageSnapshot, PageStore, PageUpdate};
