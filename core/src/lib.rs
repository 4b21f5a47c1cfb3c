pub mod api;
pub mod cli;
pub mod error;
pub mod mask;
pub mod mosaic;
pub mod types;
pub mod volume;

pub use api::{MaskDiffJob, SliceQcJob};
pub use cli::report::TextReport;
pub use error::{Result, VolqcError};
pub use mask::{compute_difference, count_excess, ResultStore};
pub use mosaic::{compose_mosaic, render_slice, sample_indices, save_mosaic};
pub use types::*;
pub use volume::Volume;
