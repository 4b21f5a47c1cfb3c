use crate::types::MaskRecord;
use std::fmt;

/// Text report for a stored mask-excess record
pub struct TextReport<'a> {
    record: &'a MaskRecord,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(record: &'a MaskRecord) -> Self {
        Self { record }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mask Excess")?;
        writeln!(f, "===========")?;
        writeln!(f)?;
        writeln!(f, "Subject:        {}", self.record.subject)?;
        writeln!(f, "Session:        {}", self.record.session)?;
        writeln!(f, "Excess Voxels:  {}", self.record.mask_excess)?;

        Ok(())
    }
}
