use super::key::SubjectSessionKey;

/// Stored mask-excess measurement for one subject/session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MaskRecord {
    pub subject: String,
    pub session: String,
    /// Intensity-weighted count of subject-mask voxels outside the reference
    pub mask_excess: f64,
}

impl MaskRecord {
    /// Creates a record for a parsed key
    pub fn new(key: SubjectSessionKey, mask_excess: f64) -> Self {
        Self {
            subject: key.subject,
            session: key.session,
            mask_excess,
        }
    }

    /// Returns the record's key
    pub fn key(&self) -> SubjectSessionKey {
        SubjectSessionKey::new(self.subject.clone(), self.session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key() {
        let record = MaskRecord::new(SubjectSessionKey::new("07", "02"), 12.0);
        assert_eq!(record.subject, "07");
        assert_eq!(record.session, "02");
        assert_eq!(record.key(), SubjectSessionKey::new("07", "02"));
    }
}
