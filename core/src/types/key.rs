use crate::error::{Result, VolqcError};
use std::fmt;
use std::path::Path;

const SUBJECT_PREFIX: &str = "sub-";
const SESSION_PREFIX: &str = "ses-";

/// Subject and session identifiers, as encoded in BIDS-style filenames
///
/// # Example
///
/// ```
/// use volqc_core::SubjectSessionKey;
///
/// let key = SubjectSessionKey::parse("sub-07_ses-02_mask.nii.gz").unwrap();
/// assert_eq!(key.subject, "07");
/// assert_eq!(key.session, "02");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SubjectSessionKey {
    pub subject: String,
    pub session: String,
}

impl SubjectSessionKey {
    /// Creates a new key
    pub fn new(subject: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            session: session.into(),
        }
    }

    /// Parses the key from a file path
    ///
    /// Only the basename is considered. It is split on `_`; a `sub-` token
    /// yields the subject id and a `ses-` token the session id, each being
    /// the text between the first and second `-`. Later tokens override
    /// earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`VolqcError::Validation`] if either id is missing or empty
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut subject = None;
        let mut session = None;
        for token in basename.split('_') {
            if token.starts_with(SUBJECT_PREFIX) {
                subject = Some(id_from_token(token));
            }
            if token.starts_with(SESSION_PREFIX) {
                session = Some(id_from_token(token));
            }
        }

        match (subject, session) {
            (Some(subject), Some(session)) if !subject.is_empty() && !session.is_empty() => {
                Ok(Self { subject, session })
            }
            _ => Err(VolqcError::Validation(format!(
                "Problem with file name '{}': subject or session id not found",
                basename
            ))),
        }
    }
}

/// Text between the first and second `-` of a prefixed token
fn id_from_token(token: &str) -> String {
    token.split('-').nth(1).unwrap_or_default().to_string()
}

impl fmt::Display for SubjectSessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{} ses-{}", self.subject, self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sub-07_ses-02_mask.nii.gz", "07", "02")]
    #[case("ses-02_sub-07_mask.nii.gz", "07", "02")]
    #[case("/data/derivatives/sub-ab12_ses-pre_desc-brain_mask.mnc", "ab12", "pre")]
    #[case("sub-07-extra_ses-02_mask.nii", "07", "02")]
    #[case("sub-01_sub-02_ses-1_mask.nii", "02", "1")]
    fn test_parse(#[case] path: &str, #[case] subject: &str, #[case] session: &str) {
        let key = SubjectSessionKey::parse(path).unwrap();
        assert_eq!(key, SubjectSessionKey::new(subject, session));
    }

    #[rstest]
    #[case("nomatch.nii")]
    #[case("sub-07_mask.nii.gz")]
    #[case("ses-02_mask.nii.gz")]
    #[case("sub-_ses-02_mask.nii.gz")]
    #[case("sub-07_ses-_mask.nii.gz")]
    #[case("")]
    fn test_parse_invalid(#[case] path: &str) {
        let err = SubjectSessionKey::parse(path).unwrap_err();
        assert!(matches!(err, VolqcError::Validation(_)));
    }

    #[test]
    fn test_parse_ignores_directories() {
        assert!(SubjectSessionKey::parse("/sub-01_ses-01/mask.nii").is_err());
    }

    #[test]
    fn test_display() {
        let key = SubjectSessionKey::new("07", "02");
        assert_eq!(key.to_string(), "sub-07 ses-02");
    }
}
