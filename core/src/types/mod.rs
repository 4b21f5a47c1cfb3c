//! Core type definitions for volume quality control
//!
//! This module provides the fundamental types used throughout the volqc library:
//! - [`FormatFamily`]: Suffix-derived volume storage family (MINC or NIfTI)
//! - [`SubjectSessionKey`]: Subject/session identifiers parsed from filenames
//! - [`MaskRecord`]: Persisted mask-excess measurement
//! - [`SliceAxis`]: The three orthogonal slicing axes

mod axis;
mod format;
mod key;
mod record;

pub use axis::{SliceAxis, ALL_AXES};
pub use format::{needs_axis_reversal, FormatFamily};
pub use key::SubjectSessionKey;
pub use record::MaskRecord;
