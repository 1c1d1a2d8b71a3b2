//!  Storage is organized through [record_storage::CsvRecordStorage].
//!  The basic idea is:
//!   - There is a single csv file with all the records.
//!   - Records are only ever appended, the whole file is rewritten on every save.
//!   - A file that doesn't exist yet is the same as a file without records.

pub mod entities;
pub mod record_storage;
