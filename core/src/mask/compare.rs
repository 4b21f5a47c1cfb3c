use crate::error::{Result, VolqcError};
use crate::types::needs_axis_reversal;
use crate::volume::Volume;
use log::debug;
use ndarray::{Array3, Zip};
use std::path::Path;

/// Computes how much of the subject mask lies outside the reference mask
///
/// Both masks are loaded from disk. When the two files come from different
/// storage families (see [`needs_axis_reversal`]) the reference axes are
/// reversed before comparison.
///
/// # Returns
///
/// Sum of subject-mask values over voxels where the reference is zero. For
/// binary masks this is the number of excess voxels.
///
/// # Errors
///
/// - [`VolqcError::Volume`] / [`VolqcError::UnsupportedFormat`] if either
///   mask cannot be loaded
/// - [`VolqcError::ShapeMismatch`] if the aligned shapes differ
pub fn compute_difference<S, R>(subject_path: S, reference_path: R) -> Result<f64>
where
    S: AsRef<Path>,
    R: AsRef<Path>,
{
    let subject_path = subject_path.as_ref();
    let reference_path = reference_path.as_ref();

    let reverse = needs_axis_reversal(subject_path, reference_path);
    debug!(
        "Comparing {} against {} (reverse reference axes: {})",
        subject_path.display(),
        reference_path.display(),
        reverse
    );

    let reference = Volume::load(reference_path)?;
    let subject = Volume::load(subject_path)?;

    count_excess(&subject.data, &reference.data, reverse)
}

/// Weighted count of subject voxels where the reference is zero
///
/// With `reverse` set, the reference is read with its axis order reversed
/// (shape (Z, Y, X) becomes (X, Y, Z)).
pub fn count_excess(subject: &Array3<f64>, reference: &Array3<f64>, reverse: bool) -> Result<f64> {
    let reference = if reverse {
        reference.view().reversed_axes()
    } else {
        reference.view()
    };

    if reference.dim() != subject.dim() {
        return Err(VolqcError::ShapeMismatch(format!(
            "subject mask has shape {:?}, reference mask has shape {:?}",
            subject.shape(),
            reference.shape()
        )));
    }

    let mut excess = 0.0;
    Zip::from(subject).and(&reference).for_each(|&s, &r| {
        if r == 0.0 {
            excess += s;
        }
    });

    Ok(excess)
}
