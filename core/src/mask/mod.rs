//! Mask-excess measurement and persistence

pub mod compare;
pub mod store;

pub use compare::{compute_difference, count_excess};
pub use store::{ResultStore, CSV_HEADER};
