//! Volume loading
//!
//! Volumes are read fully into memory as `f64` arrays and never mutated
//! afterwards. NIfTI volumes come out as (X, Y, Z); MINC volumes keep their
//! stored order, usually (Z, Y, X).

mod minc;

#[cfg(test)]
pub(crate) use minc::write_test_minc1;

use crate::error::{Result, VolqcError};
use crate::types::FormatFamily;
use log::debug;
use ndarray::{Array3, Axis, Ix3};
use nifti::volume::ndarray::IntoNdArray;
use nifti::{NiftiObject, ReaderOptions};
use std::path::Path;

/// A 3D intensity volume tagged with its storage family
#[derive(Debug, Clone)]
pub struct Volume {
    /// Voxel intensities in the file's native axis order
    pub data: Array3<f64>,

    /// Storage family of the source file
    pub family: FormatFamily,
}

impl Volume {
    /// Wraps an in-memory array
    pub fn new(data: Array3<f64>, family: FormatFamily) -> Self {
        Self { data, family }
    }

    /// Loads a volume from disk
    ///
    /// NIfTI-1/2 and MINC1 files (optionally gzipped) are supported, MINC2
    /// with the `minc2` feature. Intensity scaling from the file is applied.
    /// A 4D file with a single volume is squeezed to 3D.
    ///
    /// # Errors
    ///
    /// - [`VolqcError::Volume`] if the file is missing or cannot be decoded
    /// - [`VolqcError::UnsupportedFormat`] for MINC2 without the `minc2` feature
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(VolqcError::Volume(format!(
                "{}: file not found",
                path.display()
            )));
        }

        let family = FormatFamily::from_path(path);
        let array = match family {
            FormatFamily::Minc => minc::read_minc(path)?,
            FormatFamily::Nifti => {
                let obj = ReaderOptions::new().read_file(path)?;
                obj.into_volume().into_ndarray::<f64>()?
            }
        };
        let data = into_3d(array, path)?;

        debug!(
            "Loaded {} ({}) with shape {:?}",
            path.display(),
            family,
            data.shape()
        );

        Ok(Self { data, family })
    }

    /// Volume shape in stored axis order
    pub fn shape(&self) -> [usize; 3] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    /// Maximum intensity over the whole volume
    ///
    /// NaN voxels are ignored. Returns 0 for an empty volume.
    pub fn max(&self) -> f64 {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or(0.0)
    }
}

/// Reduces a decoded array to three dimensions
fn into_3d(mut array: ndarray::ArrayD<f64>, path: &Path) -> Result<Array3<f64>> {
    // Drop trailing singleton dimensions (e.g. a 4D file holding one volume)
    while array.ndim() > 3 && array.shape()[array.ndim() - 1] == 1 {
        let last = array.ndim() - 1;
        array = array.index_axis_move(Axis(last), 0);
    }

    let shape = array.shape().to_vec();
    array.into_dimensionality::<Ix3>().map_err(|_| {
        VolqcError::Volume(format!(
            "{}: expected a 3D volume, got shape {:?}",
            path.display(),
            shape
        ))
    })
}

/// Writes an array as a NIfTI file, for test fixtures
#[cfg(test)]
pub(crate) fn write_test_volume<P: AsRef<Path>>(path: P, data: &Array3<f64>) {
    nifti::writer::WriterOptions::new(path.as_ref())
        .write_nifti(data)
        .expect("failed to write test volume");
}
