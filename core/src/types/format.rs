use std::fmt;
use std::path::Path;

/// MINC suffixes; everything else is treated as NIfTI
const MINC_SUFFIXES: [&str; 2] = [".mnc", ".mnc.gz"];

/// Volume storage family, inferred from the file suffix
///
/// The two families store voxels with opposite default axis order, so a
/// MINC volume must have its axes reversed before it can be compared
/// voxel-for-voxel against a NIfTI volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum FormatFamily {
    /// MINC (`.mnc`, `.mnc.gz`)
    Minc,
    /// NIfTI (`.nii`, `.nii.gz`) and any unrecognized suffix
    Nifti,
}

impl FormatFamily {
    /// Classifies a path by its suffix
    ///
    /// Unrecognized suffixes fall back to [`FormatFamily::Nifti`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        if is_minc_name(&path_str(path.as_ref())) {
            FormatFamily::Minc
        } else {
            FormatFamily::Nifti
        }
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            FormatFamily::Minc => "minc",
            FormatFamily::Nifti => "nifti",
        }
    }
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Decides whether the reference volume's axes must be reversed
///
/// Returns `true` when the subject and reference belong to different format
/// families. The reference side keeps the historical check: it counts as
/// MINC when the reference ends in `.mnc` or when the *subject* ends in
/// `.mnc.gz`. Consequently `sub.mnc.gz` vs `ref.nii` and `sub.nii` vs
/// `ref.mnc.gz` both report no reversal.
///
/// # Example
///
/// ```
/// use volqc_core::needs_axis_reversal;
///
/// assert!(needs_axis_reversal("sub-01_mask.mnc", "ref.nii.gz"));
/// assert!(!needs_axis_reversal("sub-01_mask.nii", "ref.nii.gz"));
/// ```
pub fn needs_axis_reversal<S, R>(subject: S, reference: R) -> bool
where
    S: AsRef<Path>,
    R: AsRef<Path>,
{
    let subject = path_str(subject.as_ref());
    let reference = path_str(reference.as_ref());

    let subject_is_minc = is_minc_name(&subject);
    let reference_is_minc =
        reference.ends_with(MINC_SUFFIXES[0]) || subject.ends_with(MINC_SUFFIXES[1]);

    subject_is_minc ^ reference_is_minc
}

fn is_minc_name(name: &str) -> bool {
    MINC_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sub-01_mask.mnc", FormatFamily::Minc)]
    #[case("sub-01_mask.mnc.gz", FormatFamily::Minc)]
    #[case("sub-01_mask.nii", FormatFamily::Nifti)]
    #[case("sub-01_mask.nii.gz", FormatFamily::Nifti)]
    #[case("sub-01_mask.mgz", FormatFamily::Nifti)]
    #[case("mask", FormatFamily::Nifti)]
    fn test_family_from_path(#[case] path: &str, #[case] expected: FormatFamily) {
        assert_eq!(FormatFamily::from_path(path), expected);
    }

    #[rstest]
    #[case("a.nii", "b.nii", false)]
    #[case("a.nii.gz", "b.nii", false)]
    #[case("a.mnc", "b.mnc", false)]
    #[case("a.mnc", "b.nii", true)]
    #[case("a.nii", "b.mnc", true)]
    #[case("a.mnc.gz", "b.mnc.gz", false)]
    #[case("a.mnc.gz", "b.mnc", false)]
    #[case("a.mgz", "b.mnc", true)]
    fn test_needs_axis_reversal(
        #[case] subject: &str,
        #[case] reference: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(needs_axis_reversal(subject, reference), expected);
    }

    // The reference-side check looks at the subject's `.mnc.gz` suffix rather
    // than its own. These pairs cross families yet report no reversal.
    #[test]
    fn test_reference_check_reads_subject_gz_suffix() {
        assert!(!needs_axis_reversal("a.mnc.gz", "b.nii"));
        assert!(!needs_axis_reversal("a.nii", "b.mnc.gz"));

        assert_ne!(
            FormatFamily::from_path("a.mnc.gz"),
            FormatFamily::from_path("b.nii")
        );
        assert_ne!(
            FormatFamily::from_path("a.nii"),
            FormatFamily::from_path("b.mnc.gz")
        );
    }

    #[test]
    fn test_accepts_paths_with_directories() {
        assert!(needs_axis_reversal(
            Path::new("/data/sub-01/anat/mask.mnc"),
            Path::new("/atlas/ref.nii.gz")
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(FormatFamily::Minc.to_string(), "minc");
        assert_eq!(FormatFamily::Nifti.to_string(), "nifti");
    }
}
