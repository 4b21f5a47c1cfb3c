use super::render::{render_slice, Overlay};
use super::sampler::sample_indices;
use crate::error::{Result, VolqcError};
use crate::types::ALL_AXES;
use crate::volume::Volume;
use image::{ImageFormat, RgbImage};
use log::{debug, info};
use ndarray::{s, Array3};
use std::path::{Path, PathBuf};

/// Extension forced onto mosaic output paths
pub const MOSAIC_EXTENSION: &str = ".png";

/// Canvas size of a mosaic as `(height, width)`
///
/// Height is the sum of the three axis rows, width the widest row. Each
/// axis row holds `slice_count` rotated slices side by side.
pub fn mosaic_shape(shape: [usize; 3], slice_count: usize) -> (usize, usize) {
    ALL_AXES
        .iter()
        .map(|axis| axis.rendered_shape(shape))
        .fold((0, 0), |(height, width), (h, w)| {
            (height + h, width.max(w * slice_count))
        })
}

/// Builds the QC mosaic for a volume
///
/// Slices are sampled with [`sample_indices`] and rendered with
/// [`render_slice`] against the volume-wide maximum. Axis rows are stacked
/// top to bottom (X, Y, Z) and left-aligned on a zero background. The
/// canvas is then shifted by its minimum, scaled by `255 / max` and
/// truncated to 8 bits.
///
/// # Errors
///
/// - [`VolqcError::Validation`] if `slice_count` is zero
/// - [`VolqcError::ShapeMismatch`] if the overlay shape differs from the volume
pub fn compose_mosaic(
    volume: &Volume,
    slice_count: usize,
    overlay: Option<&Volume>,
) -> Result<RgbImage> {
    if slice_count == 0 {
        return Err(VolqcError::Validation(
            "slice count must be at least 1".to_string(),
        ));
    }

    let shape = volume.shape();
    if let Some(mask) = overlay {
        if mask.shape() != shape {
            return Err(VolqcError::ShapeMismatch(format!(
                "volume has shape {:?}, overlay mask has shape {:?}",
                shape,
                mask.shape()
            )));
        }
    }

    let global_max = volume.max();
    let overlay = overlay.map(|mask| Overlay {
        data: &mask.data,
        max: mask.max(),
    });
    let indices = sample_indices(shape, slice_count);

    let (height, width) = mosaic_shape(shape, slice_count);
    let mut canvas = Array3::<f64>::zeros((height, width, 3));

    let mut row = 0;
    for (axis, axis_indices) in ALL_AXES.iter().zip(indices.iter()) {
        let (h, w) = axis.rendered_shape(shape);
        debug!("Axis {} slices at {:?}", axis, axis_indices);

        for (j, &index) in axis_indices.iter().enumerate() {
            let rendered = render_slice(&volume.data, *axis, index, global_max, overlay);
            canvas
                .slice_mut(s![row..row + h, j * w..(j + 1) * w, ..])
                .assign(&rendered);
        }
        row += h;
    }

    to_rgb8(&canvas)
}

/// Writes the mosaic as PNG, appending the extension if missing
///
/// Returns the path actually written.
pub fn save_mosaic<P: AsRef<Path>>(mosaic: &RgbImage, path: P) -> Result<PathBuf> {
    let path = with_png_extension(path.as_ref());
    mosaic.save_with_format(&path, ImageFormat::Png)?;
    info!(
        "Wrote {}x{} mosaic to {}",
        mosaic.width(),
        mosaic.height(),
        path.display()
    );
    Ok(path)
}

fn with_png_extension(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    if !path.to_string_lossy().ends_with(MOSAIC_EXTENSION) {
        name.push(MOSAIC_EXTENSION);
    }
    PathBuf::from(name)
}

/// Global min/max rescale of the canvas into 8-bit RGB
fn to_rgb8(canvas: &Array3<f64>) -> Result<RgbImage> {
    let (height, width, _) = canvas.dim();
    let min = canvas.iter().copied().fold(f64::INFINITY, f64::min);
    let max = canvas.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let valid = max > 0.0 && max.is_finite();

    let pixels: Vec<u8> = canvas
        .iter()
        .map(|&v| {
            if valid {
                ((v - min) * 255.0 / max).clamp(0.0, 255.0) as u8
            } else {
                0
            }
        })
        .collect();

    RgbImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
        VolqcError::ShapeMismatch(format!("canvas {}x{} does not fit RGB8", width, height))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FormatFamily;
    use ndarray::Array;
    use rstest::rstest;
    use tempfile::TempDir;

    fn ramp_volume(shape: (usize, usize, usize)) -> Volume {
        let data = Array::from_shape_fn(shape, |(x, y, z)| (x + y + z) as f64);
        Volume::new(data, FormatFamily::Nifti)
    }

    #[rstest]
    #[case((10, 20, 30), 1)]
    #[case((10, 20, 30), 3)]
    #[case((16, 8, 12), 2)]
    #[case((5, 5, 5), 1)]
    #[case((3, 40, 7), 1)]
    fn test_mosaic_shape(#[case] shape: (usize, usize, usize), #[case] slice_count: usize) {
        let volume = ramp_volume(shape);
        let mosaic = compose_mosaic(&volume, slice_count, None).unwrap();

        let (x, y, z) = shape;
        let expected_height = z + z + y;
        let expected_width = y.max(x) * slice_count;
        assert_eq!(mosaic.height() as usize, expected_height);
        assert_eq!(mosaic.width() as usize, expected_width);
        assert_eq!(
            mosaic_shape([x, y, z], slice_count),
            (expected_height, expected_width)
        );
    }

    #[test]
    fn test_mosaic_uses_full_range() {
        let volume = ramp_volume((10, 12, 14));
        let mosaic = compose_mosaic(&volume, 2, None).unwrap();

        let values: Vec<u8> = mosaic.as_raw().clone();
        assert_eq!(values.iter().copied().min(), Some(0));
        assert_eq!(values.iter().copied().max(), Some(255));
    }

    #[test]
    fn test_without_overlay_pixels_are_gray() {
        let volume = ramp_volume((6, 7, 8));
        let mosaic = compose_mosaic(&volume, 1, None).unwrap();
        assert!(mosaic.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn test_narrow_rows_leave_background() {
        // X rows are 12 wide (y), Y and Z rows only 4 wide (x)
        let volume = Volume::new(Array3::<f64>::ones((4, 12, 6)), FormatFamily::Nifti);
        let mosaic = compose_mosaic(&volume, 1, None).unwrap();

        assert_eq!((mosaic.width(), mosaic.height()), (12, 6 + 6 + 12));
        // Inside the first row: full intensity
        assert_eq!(mosaic.get_pixel(11, 0).0, [255, 255, 255]);
        // Right of the Y row: background
        assert_eq!(mosaic.get_pixel(11, 6).0, [0, 0, 0]);
        assert_eq!(mosaic.get_pixel(3, 6).0, [255, 255, 255]);
    }

    #[test]
    fn test_overlay_turns_masked_voxels_red() {
        let volume = Volume::new(Array3::<f64>::from_elem((5, 5, 5), 1.0), FormatFamily::Nifti);
        let mut mask = Array3::<f64>::zeros((5, 5, 5));
        mask[[2, 2, 2]] = 1.0;
        let mask = Volume::new(mask, FormatFamily::Nifti);

        let mosaic = compose_mosaic(&volume, 1, Some(&mask)).unwrap();

        // No background on this canvas, so the uniform gray (the minimum)
        // maps to black and only the tint survives: 0.2 * 255 / 1.2
        assert_eq!(mosaic.get_pixel(2, 2).0, [42, 0, 0]);
        assert_eq!(mosaic.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(mosaic.pixels().filter(|p| p[0] > 0).count(), 3);
    }

    #[test]
    fn test_overlay_shape_mismatch() {
        let volume = ramp_volume((4, 4, 4));
        let mask = ramp_volume((4, 4, 5));
        let err = compose_mosaic(&volume, 1, Some(&mask)).unwrap_err();
        assert!(matches!(err, VolqcError::ShapeMismatch(_)));
    }

    #[test]
    fn test_zero_slices_rejected() {
        let volume = ramp_volume((4, 4, 4));
        let err = compose_mosaic(&volume, 0, None).unwrap_err();
        assert!(matches!(err, VolqcError::Validation(_)));
    }

    #[test]
    fn test_blank_volume_is_black() {
        let volume = Volume::new(Array3::<f64>::zeros((4, 4, 4)), FormatFamily::Nifti);
        let mosaic = compose_mosaic(&volume, 1, None).unwrap();
        assert!(mosaic.as_raw().iter().all(|&v| v == 0));
    }

    #[rstest]
    #[case("qc/sub-01", "qc/sub-01.png")]
    #[case("qc/sub-01.png", "qc/sub-01.png")]
    #[case("qc/sub-01.jpg", "qc/sub-01.jpg.png")]
    fn test_with_png_extension(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(with_png_extension(Path::new(input)), PathBuf::from(expected));
    }

    #[test]
    fn test_save_mosaic_appends_extension() {
        let temp_dir = TempDir::new().unwrap();
        let volume = ramp_volume((6, 6, 6));
        let mosaic = compose_mosaic(&volume, 1, None).unwrap();

        let written = save_mosaic(&mosaic, temp_dir.path().join("qc")).unwrap();
        assert_eq!(written, temp_dir.path().join("qc.png"));

        let decoded = image::open(&written).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), mosaic.dimensions());
        assert_eq!(decoded.as_raw(), mosaic.as_raw());
    }
}
