pub mod batch;
pub mod charts;
pub mod export;
pub mod filters;
pub mod orders;
