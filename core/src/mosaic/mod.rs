//! Slice mosaics for visual QC
//!
//! A mosaic holds `n` evenly spaced slices along each of the three axes,
//! one row per axis, optionally tinted red where an overlay mask is set.

pub mod compose;
pub mod render;
pub mod sampler;

pub use compose::{compose_mosaic, mosaic_shape, save_mosaic, MOSAIC_EXTENSION};
pub use render::{render_slice, Overlay, OVERLAY_TINT};
pub use sampler::sample_indices;
