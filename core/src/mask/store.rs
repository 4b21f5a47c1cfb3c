use crate::error::Result;
use crate::types::{MaskRecord, SubjectSessionKey};
use log::{debug, info};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS MASK (
    subject TEXT NOT NULL,
    session TEXT NOT NULL,
    mask_excess FLOAT,
    CONSTRAINT PK_mask PRIMARY KEY (subject, session)
)";

const HAS_TABLE: &str =
    "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'MASK')";

const UPSERT: &str = "
INSERT INTO MASK (subject, session, mask_excess) VALUES (?1, ?2, ?3)
ON CONFLICT (subject, session) DO UPDATE SET mask_excess = excluded.mask_excess";

/// CSV header, matching the table columns
pub const CSV_HEADER: [&str; 3] = ["subject", "session", "mask_excess"];

/// SQLite-backed table of mask-excess measurements
///
/// The store only remembers the database path. Each operation opens its
/// own connection and releases it before returning, so no connection
/// outlives a single call. Only [`ResultStore::ensure_schema`] and
/// [`ResultStore::upsert`] create the database; reads open it read-only.
///
/// NaN values are stored as NULL and read back as NaN.
///
/// # Example
///
/// ```no_run
/// use volqc_core::{ResultStore, SubjectSessionKey};
///
/// let store = ResultStore::new("qc.sqlite");
/// store.upsert(&SubjectSessionKey::new("07", "02"), 5.0).unwrap();
/// store.export_csv("qc.csv").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    /// Creates a store for the database at `path`
    ///
    /// Nothing is touched on disk until an operation runs.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing database
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the table if it does not exist yet
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute(CREATE_TABLE, [])?;
        Ok(())
    }

    /// Inserts the value for `key`, replacing any previous value
    ///
    /// Schema creation and the write share one transaction; on any error
    /// the transaction is rolled back when dropped and the table is left
    /// as it was.
    pub fn upsert(&self, key: &SubjectSessionKey, mask_excess: f64) -> Result<()> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        tx.execute(CREATE_TABLE, [])?;
        tx.execute(UPSERT, params![key.subject, key.session, mask_excess])?;
        tx.commit()?;

        info!(
            "Stored mask excess {} for {} in {}",
            mask_excess,
            key,
            self.path.display()
        );
        Ok(())
    }

    /// Looks up the stored value for `key`
    ///
    /// Returns `None` when the key, the table or the database is missing.
    pub fn get(&self, key: &SubjectSessionKey) -> Result<Option<f64>> {
        let Some(conn) = self.open_read_only()? else {
            return Ok(None);
        };
        let value = conn
            .query_row(
                "SELECT mask_excess FROM MASK WHERE subject = ?1 AND session = ?2",
                params![key.subject, key.session],
                |row| row.get::<_, Option<f64>>(0),
            )
            .optional()?;
        Ok(value.map(|v| v.unwrap_or(f64::NAN)))
    }

    /// Returns every stored record, in storage order
    ///
    /// A missing database or table yields no records.
    pub fn records(&self) -> Result<Vec<MaskRecord>> {
        let Some(conn) = self.open_read_only()? else {
            return Ok(Vec::new());
        };
        let mut stmt = conn.prepare("SELECT subject, session, mask_excess FROM MASK")?;
        let rows = stmt.query_map([], |row| {
            Ok(MaskRecord {
                subject: row.get(0)?,
                session: row.get(1)?,
                mask_excess: row.get::<_, Option<f64>>(2)?.unwrap_or(f64::NAN),
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Opens an existing database without creating it or its table
    fn open_read_only(&self) -> Result<Option<Connection>> {
        if !self.path.is_file() {
            debug!("No result database at {}", self.path.display());
            return Ok(None);
        }

        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let has_table: bool = conn.query_row(HAS_TABLE, [], |row| row.get(0))?;
        Ok(has_table.then_some(conn))
    }

    /// Writes the whole table to a CSV file with a header row
    ///
    /// Values are written with a decimal point (`152.0`); NaN is written as
    /// an empty field. Returns the number of data rows written.
    pub fn export_csv<P: AsRef<Path>>(&self, destination: P) -> Result<usize> {
        let destination = destination.as_ref();
        let records = self.records()?;

        let mut writer = csv::Writer::from_path(destination)?;
        writer.write_record(CSV_HEADER)?;
        for record in &records {
            let mask_excess = format_excess(record.mask_excess);
            writer.write_record([
                record.subject.as_str(),
                record.session.as_str(),
                mask_excess.as_str(),
            ])?;
        }
        writer.flush()?;

        debug!(
            "Exported {} rows to {}",
            records.len(),
            destination.display()
        );
        Ok(records.len())
    }
}

fn format_excess(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:?}", value)
    }
}
