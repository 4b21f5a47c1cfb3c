use std::fmt;

/// One of the three orthogonal volume axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceAxis {
    X,
    Y,
    Z,
}

/// All axes in mosaic row order
pub const ALL_AXES: [SliceAxis; 3] = [SliceAxis::X, SliceAxis::Y, SliceAxis::Z];

impl SliceAxis {
    /// Array dimension index of this axis
    pub fn index(&self) -> usize {
        match self {
            SliceAxis::X => 0,
            SliceAxis::Y => 1,
            SliceAxis::Z => 2,
        }
    }

    /// Shape of a slice orthogonal to this axis, after the 90 degree rotation
    ///
    /// Returned as `(height, width)`.
    pub fn rendered_shape(&self, shape: [usize; 3]) -> (usize, usize) {
        let (rows, cols) = self.plane_shape(shape);
        (cols, rows)
    }

    /// Shape of the raw plane orthogonal to this axis, remaining axes in order
    pub fn plane_shape(&self, shape: [usize; 3]) -> (usize, usize) {
        match self {
            SliceAxis::X => (shape[1], shape[2]),
            SliceAxis::Y => (shape[0], shape[2]),
            SliceAxis::Z => (shape[0], shape[1]),
        }
    }
}

impl From<SliceAxis> for ndarray::Axis {
    fn from(axis: SliceAxis) -> Self {
        ndarray::Axis(axis.index())
    }
}

impl fmt::Display for SliceAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceAxis::X => write!(f, "x"),
            SliceAxis::Y => write!(f, "y"),
            SliceAxis::Z => write!(f, "z"),
        }
    }
}
