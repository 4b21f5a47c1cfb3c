//! MINC volume decoding
//!
//! MINC1 files are NetCDF-3 classic containers; MINC2 files are HDF5. Both
//! may be gzipped (`.mnc.gz`). The image variable is returned in stored
//! dimension order, typically (zspace, yspace, xspace), which is the
//! reverse of the NIfTI (x, y, z) layout.

use crate::error::{Result, VolqcError};
use flate2::read::GzDecoder;
use log::debug;
use ndarray::{ArrayD, IxDyn};
use netcdf3::{DataVector, FileReader};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tempfile::NamedTempFile;

const NETCDF_MAGIC: &[u8] = b"CDF";
const HDF5_MAGIC: &[u8] = b"\x89HDF\r\n\x1a\n";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];

const IMAGE_VAR: &str = "image";
const IMAGE_MAX_VAR: &str = "image-max";
const IMAGE_MIN_VAR: &str = "image-min";
const SIGNTYPE_ATTR: &str = "signtype";

/// Decoded image variable before conversion to real values
struct RawImage {
    shape: Vec<usize>,
    values: Vec<f64>,
    /// Full range of the stored integer type; `None` for floating point
    type_range: Option<(f64, f64)>,
    image_min: Option<Vec<f64>>,
    image_max: Option<Vec<f64>>,
}

/// Reads a MINC1 or MINC2 file into an array in stored axis order
///
/// Integer-typed images are mapped to real values through their
/// `image-min`/`image-max` variables when present; floating point images
/// are returned as stored.
pub fn read_minc(path: &Path) -> Result<ArrayD<f64>> {
    // Keeps the inflated copy alive until decoding is done
    let inflated;
    let source = if starts_with(path, GZIP_MAGIC)? {
        inflated = inflate(path)?;
        inflated.path()
    } else {
        path
    };

    let raw = if starts_with(source, NETCDF_MAGIC)? {
        read_minc1(source)?
    } else if starts_with(source, HDF5_MAGIC)? {
        read_minc2(source)?
    } else {
        return Err(VolqcError::Volume(format!(
            "{}: neither a NetCDF (MINC1) nor an HDF5 (MINC2) file",
            path.display()
        )));
    };

    debug!(
        "Decoded MINC image {} with stored shape {:?}",
        path.display(),
        raw.shape
    );
    into_real(raw, path)
}

fn starts_with(path: &Path, magic: &[u8]) -> Result<bool> {
    let mut header = vec![0u8; magic.len()];
    let mut file = File::open(path)?;
    match file.read_exact(&mut header) {
        Ok(()) => Ok(header == magic),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Inflates a gzipped file into a temporary file
fn inflate(path: &Path) -> Result<NamedTempFile> {
    let mut decoder = GzDecoder::new(File::open(path)?);
    let mut inflated = NamedTempFile::new()?;
    io::copy(&mut decoder, &mut inflated)?;
    Ok(inflated)
}

fn read_minc1(path: &Path) -> Result<RawImage> {
    let mut reader = FileReader::open(path).map_err(|e| netcdf_error(path, e))?;

    let (shape, has_range, unsigned) = {
        let data_set = reader.data_set();
        let var = data_set.get_var(IMAGE_VAR).ok_or_else(|| {
            VolqcError::Volume(format!("{}: no '{}' variable", path.display(), IMAGE_VAR))
        })?;
        let shape = var
            .dim_names()
            .iter()
            .map(|name| data_set.dim_size(name).unwrap_or(0))
            .collect::<Vec<_>>();
        let has_range = data_set.has_var(IMAGE_MIN_VAR) && data_set.has_var(IMAGE_MAX_VAR);
        let unsigned = var
            .get_attr(SIGNTYPE_ATTR)
            .and_then(|attr| attr.get_as_string())
            .map_or(false, |sign| sign.trim_end_matches('\0') == "unsigned");
        (shape, has_range, unsigned)
    };

    let image = reader
        .read_var(IMAGE_VAR)
        .map_err(|e| netcdf_error(path, e))?;
    let (mut values, mut type_range) = data_vector_to_f64(image);
    if unsigned {
        if let Some((lo, hi)) = type_range {
            // Stored as signed NetCDF types, reinterpret the bit pattern
            let span = hi - lo + 1.0;
            values.iter_mut().filter(|v| **v < 0.0).for_each(|v| *v += span);
            type_range = Some((0.0, span - 1.0));
        }
    }

    let (image_min, image_max) = if has_range {
        let min = reader
            .read_var(IMAGE_MIN_VAR)
            .map_err(|e| netcdf_error(path, e))?;
        let max = reader
            .read_var(IMAGE_MAX_VAR)
            .map_err(|e| netcdf_error(path, e))?;
        (Some(data_vector_to_f64(min).0), Some(data_vector_to_f64(max).0))
    } else {
        (None, None)
    };

    Ok(RawImage {
        shape,
        values,
        type_range,
        image_min,
        image_max,
    })
}

fn netcdf_error<E: std::fmt::Debug>(path: &Path, e: E) -> VolqcError {
    VolqcError::Volume(format!("{}: NetCDF read failed: {:?}", path.display(), e))
}

fn data_vector_to_f64(data: DataVector) -> (Vec<f64>, Option<(f64, f64)>) {
    match data {
        DataVector::I8(v) => (
            v.into_iter().map(f64::from).collect(),
            Some((i8::MIN as f64, i8::MAX as f64)),
        ),
        DataVector::U8(v) => (
            v.into_iter().map(f64::from).collect(),
            Some((u8::MIN as f64, u8::MAX as f64)),
        ),
        DataVector::I16(v) => (
            v.into_iter().map(f64::from).collect(),
            Some((i16::MIN as f64, i16::MAX as f64)),
        ),
        DataVector::I32(v) => (
            v.into_iter().map(f64::from).collect(),
            Some((i32::MIN as f64, i32::MAX as f64)),
        ),
        DataVector::F32(v) => (v.into_iter().map(f64::from).collect(), None),
        DataVector::F64(v) => (v, None),
    }
}

#[cfg(feature = "minc2")]
fn read_minc2(path: &Path) -> Result<RawImage> {
    use hdf5::types::TypeDescriptor;

    const IMAGE_GROUP: &str = "minc-2.0/image/0";

    let h5 = |e: hdf5::Error| {
        VolqcError::Volume(format!("{}: HDF5 read failed: {}", path.display(), e))
    };

    let file = hdf5::File::open(path).map_err(h5)?;
    let group = file.group(IMAGE_GROUP).map_err(h5)?;
    let image = group.dataset(IMAGE_VAR).map_err(h5)?;

    let shape = image.shape();
    let values = image.read_raw::<f64>().map_err(h5)?;
    let type_range = match image.dtype().and_then(|t| t.to_descriptor()).map_err(h5)? {
        TypeDescriptor::Integer(size) => Some(signed_range(size as usize)),
        TypeDescriptor::Unsigned(size) => Some((0.0, 2f64.powi(8 * size as i32) - 1.0)),
        _ => None,
    };

    let read_range = |name: &str| -> Result<Option<Vec<f64>>> {
        if group.link_exists(name) {
            let ds = group.dataset(name).map_err(h5)?;
            Ok(Some(ds.read_raw::<f64>().map_err(h5)?))
        } else {
            Ok(None)
        }
    };

    Ok(RawImage {
        shape,
        values,
        type_range,
        image_min: read_range(IMAGE_MIN_VAR)?,
        image_max: read_range(IMAGE_MAX_VAR)?,
    })
}

#[cfg(feature = "minc2")]
fn signed_range(bytes: usize) -> (f64, f64) {
    let half = 2f64.powi(8 * bytes as i32 - 1);
    (-half, half - 1.0)
}

#[cfg(not(feature = "minc2"))]
fn read_minc2(path: &Path) -> Result<RawImage> {
    Err(VolqcError::UnsupportedFormat(format!(
        "{}: MINC2 (HDF5) support requires building with the 'minc2' feature",
        path.display()
    )))
}

/// Builds the array, mapping stored integers to real values
///
/// `image-min`/`image-max` hold one entry per slab of the leading
/// dimensions (a single entry means one range for the whole volume).
fn into_real(raw: RawImage, path: &Path) -> Result<ArrayD<f64>> {
    let RawImage {
        shape,
        mut values,
        type_range,
        image_min,
        image_max,
    } = raw;

    if let (Some((vmin, vmax)), Some(imin), Some(imax)) = (type_range, image_min, image_max) {
        let slabs = imin.len().min(imax.len());
        if slabs > 0 && vmax > vmin && values.len() % slabs == 0 {
            let slab_len = values.len() / slabs;
            for (slab, chunk) in values.chunks_mut(slab_len.max(1)).enumerate() {
                let (lo, hi) = (imin[slab], imax[slab]);
                for v in chunk {
                    *v = (*v - vmin) / (vmax - vmin) * (hi - lo) + lo;
                }
            }
        }
    }

    ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
        VolqcError::Volume(format!(
            "{}: image data does not match shape {:?}: {}",
            path.display(),
            shape,
            e
        ))
    })
}

/// Writes a floating point MINC1 volume in stored (z, y, x) order, for test fixtures
#[cfg(test)]
pub(crate) fn write_test_minc1(path: &Path, data: &ndarray::Array3<f64>) {
    use netcdf3::{DataSet, FileWriter, Version};

    let (z, y, x) = data.dim();
    let mut data_set = DataSet::new();
    data_set.add_fixed_dim("zspace", z).unwrap();
    data_set.add_fixed_dim("yspace", y).unwrap();
    data_set.add_fixed_dim("xspace", x).unwrap();
    data_set
        .add_var_f64(IMAGE_VAR, &["zspace", "yspace", "xspace"])
        .unwrap();

    let values: Vec<f64> = data.iter().copied().collect();
    let mut writer = FileWriter::open(path).unwrap();
    writer.set_def(&data_set, Version::Classic, 0).unwrap();
    writer.write_var_f64(IMAGE_VAR, &values).unwrap();
    writer.close().unwrap();
}
