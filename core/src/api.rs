use crate::error::Result;
use crate::mask::{compute_difference, ResultStore};
use crate::mosaic::{compose_mosaic, save_mosaic};
use crate::types::{MaskRecord, SubjectSessionKey};
use crate::volume::Volume;
use log::info;
use std::path::PathBuf;

/// One mask-excess measurement, from input masks to stored record
///
/// # Example
///
/// ```no_run
/// use volqc_core::MaskDiffJob;
///
/// let job = MaskDiffJob::new(
///     "sub-07_ses-02_desc-brain_mask.nii.gz",
///     "atlas_brain_mask.nii.gz",
///     "qc.sqlite",
/// )
/// .with_csv("qc.csv");
///
/// let record = job.run().unwrap();
/// assert_eq!(record.subject, "07");
/// ```
#[derive(Debug, Clone)]
pub struct MaskDiffJob {
    /// Subject mask; its filename carries the subject/session key
    pub subject_mask: PathBuf,

    /// Reference mask
    pub reference_mask: PathBuf,

    /// SQLite database holding the results table
    pub database: PathBuf,

    /// Optional CSV export of the full table
    pub csv: Option<PathBuf>,
}

impl MaskDiffJob {
    /// Creates a job without CSV export
    pub fn new(
        subject_mask: impl Into<PathBuf>,
        reference_mask: impl Into<PathBuf>,
        database: impl Into<PathBuf>,
    ) -> Self {
        Self {
            subject_mask: subject_mask.into(),
            reference_mask: reference_mask.into(),
            database: database.into(),
            csv: None,
        }
    }

    /// Builder: export the table to CSV after storing
    pub fn with_csv(mut self, csv: impl Into<PathBuf>) -> Self {
        self.csv = Some(csv.into());
        self
    }

    /// Runs the measurement and stores the result
    ///
    /// The key is parsed and both masks are compared before the database
    /// is opened, so a failure in either step leaves stored results as
    /// they were.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The subject filename lacks a subject or session id
    /// - Either mask cannot be loaded, or their shapes do not line up
    /// - The database or CSV file cannot be written
    pub fn run(&self) -> Result<MaskRecord> {
        let key = SubjectSessionKey::parse(&self.subject_mask)?;
        let excess = compute_difference(&self.subject_mask, &self.reference_mask)?;
        info!("Mask excess for {}: {}", key, excess);

        let store = ResultStore::new(&self.database);
        store.upsert(&key, excess)?;

        if let Some(csv) = &self.csv {
            let rows = store.export_csv(csv)?;
            info!("Exported {} rows to {}", rows, csv.display());
        }

        Ok(MaskRecord::new(key, excess))
    }
}

/// One slice-mosaic rendering, from input volume to PNG on disk
#[derive(Debug, Clone)]
pub struct SliceQcJob {
    /// Volume to slice
    pub image: PathBuf,

    /// Output path; `.png` is appended when missing
    pub save_path: PathBuf,

    /// Optional mask drawn in red over the slices
    pub mask: Option<PathBuf>,

    /// Slices per axis
    pub slice_count: usize,
}

impl SliceQcJob {
    /// Creates a job with one slice per axis and no overlay
    pub fn new(image: impl Into<PathBuf>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            save_path: save_path.into(),
            mask: None,
            slice_count: 1,
        }
    }

    /// Builder: overlay a mask
    pub fn with_mask(mut self, mask: impl Into<PathBuf>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    /// Builder: number of slices per axis
    pub fn with_slice_count(mut self, slice_count: usize) -> Self {
        self.slice_count = slice_count;
        self
    }

    /// Renders the mosaic and writes it
    ///
    /// Returns the path actually written.
    pub fn run(&self) -> Result<PathBuf> {
        let volume = Volume::load(&self.image)?;
        let mask = self.mask.as_ref().map(Volume::load).transpose()?;

        let mosaic = compose_mosaic(&volume, self.slice_count, mask.as_ref())?;
        save_mosaic(&mosaic, &self.save_path)
    }
}
