use thiserror::Error;

/// Result type for volqc operations
pub type Result<T> = std::result::Result<T, VolqcError>;

/// Error types for volqc operations
#[derive(Error, Debug)]
pub enum VolqcError {
    /// Volume could not be read or decoded
    #[error("Volume error: {0}")]
    Volume(String),

    /// Volume file format has no decoder
    #[error("Unsupported volume format: {0}")]
    UnsupportedFormat(String),

    /// Two volumes that must line up voxel-for-voxel do not
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Input failed validation (e.g. missing subject/session tokens)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Result database error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// CSV export error
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Mosaic encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Convert nifti errors
impl From<nifti::NiftiError> for VolqcError {
    fn from(e: nifti::NiftiError) -> Self {
        VolqcError::Volume(format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = VolqcError::Validation("subject id not found".to_string());
        assert_eq!(err.to_string(), "Validation error: subject id not found");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VolqcError = io.into();
        assert!(matches!(err, VolqcError::IoError(_)));
    }
}
