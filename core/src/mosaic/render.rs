use crate::types::SliceAxis;
use ndarray::{Array3, ArrayView2, Axis};

/// Fraction of the intensity range added to the red channel under the overlay
pub const OVERLAY_TINT: f64 = 0.2;

/// Mask drawn in red over the rendered slices
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    /// Mask values, same shape as the volume
    pub data: &'a Array3<f64>,

    /// Maximum mask value over the whole mask
    pub max: f64,
}

/// Renders one slice as a normalized RGB buffer of shape (height, width, 3)
///
/// The plane orthogonal to `axis` at `index` is rotated 90 degrees
/// counter-clockwise and divided by `global_max`; the same value goes into
/// all three channels. With an overlay, the red channel additionally
/// receives `OVERLAY_TINT * overlay / overlay.max`.
///
/// Out-of-range indices are clamped to the last plane. A zero maximum skips
/// the corresponding division.
pub fn render_slice(
    volume: &Array3<f64>,
    axis: SliceAxis,
    index: usize,
    global_max: f64,
    overlay: Option<Overlay<'_>>,
) -> Array3<f64> {
    let len = volume.len_of(axis.into());
    let (height, width) = axis.rendered_shape(dims(volume));
    let mut rgb = Array3::<f64>::zeros((height, width, 3));
    if len == 0 {
        return rgb;
    }
    let index = index.min(len - 1);

    let gray = rotate90(volume.index_axis(axis.into(), index));
    let scale = reciprocal(global_max);
    for channel in 0..3 {
        rgb.index_axis_mut(Axis(2), channel)
            .zip_mut_with(&gray, |out, &v| *out = v * scale);
    }

    if let Some(overlay) = overlay {
        let tint = rotate90(overlay.data.index_axis(axis.into(), index));
        let scale = OVERLAY_TINT * reciprocal(overlay.max);
        rgb.index_axis_mut(Axis(2), 0)
            .zip_mut_with(&tint, |out, &m| *out += m * scale);
    }

    rgb
}

/// Rotates a plane 90 degrees counter-clockwise: `out[i][j] = plane[j][cols - 1 - i]`
fn rotate90(plane: ArrayView2<'_, f64>) -> ArrayView2<'_, f64> {
    let mut rotated = plane.reversed_axes();
    rotated.invert_axis(Axis(0));
    rotated
}

fn reciprocal(max: f64) -> f64 {
    if max == 0.0 || !max.is_finite() {
        1.0
    } else {
        1.0 / max
    }
}

fn dims(volume: &Array3<f64>) -> [usize; 3] {
    let (x, y, z) = volume.dim();
    [x, y, z]
}
