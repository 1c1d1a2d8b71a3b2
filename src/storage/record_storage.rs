use std::{
    fs::File,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, trace};

use super::entities::{RecordTable, StudyRecord, RECORD_COLUMNS};

/// Failures surfaced by a [RecordStorage]. A missing record file is not one of them, it's treated
/// as an empty table.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read records from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record file {path:?} has columns {found:?}, expected {:?}", RECORD_COLUMNS)]
    Schema { path: PathBuf, found: Vec<String> },

    #[error("Malformed record in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write records to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Interface for abstracting storage of records. Every call works on a fresh snapshot of the
/// underlying storage, nothing is cached between calls.
pub trait RecordStorage {
    /// Reads the whole table.
    fn load(&self) -> Result<RecordTable>;

    /// Replaces stored content with `table`.
    fn persist(&self, table: &RecordTable) -> Result<()>;

    /// The only write path used by the application. Loads the table, appends a single record to
    /// the end and persists the result. It's not atomic: two writers racing each other will lose
    /// one of the records.
    fn add_record(&self, date: NaiveDate, subject: &str, hours: f64) -> Result<RecordTable> {
        let mut table = self.load()?;
        table.push(StudyRecord::new(date, subject, hours));
        self.persist(&table)?;
        Ok(table)
    }
}

impl<T: Deref> RecordStorage for T
where
    T::Target: RecordStorage,
{
    fn load(&self) -> Result<RecordTable> {
        self.deref().load()
    }

    fn persist(&self, table: &RecordTable) -> Result<()> {
        self.deref().persist(table)
    }

    fn add_record(&self, date: NaiveDate, subject: &str, hours: f64) -> Result<RecordTable> {
        self.deref().add_record(date, subject, hours)
    }
}

/// The main realization of [RecordStorage]. Keeps records in a single csv file with a
/// `Date,Subject,Hours` header.
pub struct CsvRecordStorage {
    path: PathBuf,
}

impl CsvRecordStorage {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent().filter(|v| !v.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_error(&self, source: csv::Error) -> StoreError {
        StoreError::Parse {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: impl Into<csv::Error>) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source: source.into(),
        }
    }
}

impl RecordStorage for CsvRecordStorage {
    fn load(&self) -> Result<RecordTable> {
        debug!("Loading records from {:?}", self.path);
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Record file {:?} doesn't exist yet", self.path);
                return Ok(RecordTable::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| self.parse_error(e))?;
        if !headers.iter().eq(RECORD_COLUMNS) {
            return Err(StoreError::Schema {
                path: self.path.clone(),
                found: headers.iter().map(String::from).collect(),
            });
        }

        let table = reader
            .deserialize::<StudyRecord>()
            .collect::<Result<RecordTable, csv::Error>>()
            .map_err(|e| self.parse_error(e))?;

        trace!("Loaded {} records", table.len());
        Ok(table)
    }

    fn persist(&self, table: &RecordTable) -> Result<()> {
        debug!("Persisting {} records into {:?}", table.len(), self.path);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| self.write_error(e))?;

        // Header is written by hand so that an empty table still produces a valid file.
        writer
            .write_record(RECORD_COLUMNS)
            .map_err(|e| self.write_error(e))?;
        for record in table {
            writer.serialize(record).map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| self.write_error(e))?;
        Ok(())
    }
}
