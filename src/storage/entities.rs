use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde::Serialize;

/// Columns every record file starts with, in this exact order.
pub const RECORD_COLUMNS: [&str; 3] = ["Date", "Subject", "Hours"];

/// The struct used for storing a study session on the disk. Sessions for the same subject and day
/// are never merged on write, they simply add up during analysis.
#[derive(PartialEq, PartialOrd, Debug, Serialize, Deserialize, Clone)]
pub struct StudyRecord {
    #[serde(rename = "Date", with = "date_ser")]
    pub date: NaiveDate,
    #[serde(rename = "Subject")]
    pub subject: Arc<str>,
    #[serde(rename = "Hours")]
    pub hours: f64,
}

impl StudyRecord {
    pub fn new(date: NaiveDate, subject: impl Into<Arc<str>>, hours: f64) -> Self {
        Self {
            date,
            subject: subject.into(),
            hours,
        }
    }
}

/// Ordered collection of records exactly as they appear in the record file.
#[derive(PartialEq, Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RecordTable {
    records: Vec<StudyRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the end of the table.
    pub fn push(&mut self, record: StudyRecord) {
        self.records.push(record);
    }

    pub fn with_record(mut self, record: StudyRecord) -> Self {
        self.push(record);
        self
    }

    pub fn records(&self) -> &[StudyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StudyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<StudyRecord>> for RecordTable {
    fn from(records: Vec<StudyRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<StudyRecord> for RecordTable {
    fn from_iter<T: IntoIterator<Item = StudyRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RecordTable {
    type Item = StudyRecord;
    type IntoIter = std::vec::IntoIter<StudyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a StudyRecord;
    type IntoIter = std::slice::Iter<'a, StudyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Parses a date from the record file. Values that carry a time of day are truncated to their
/// calendar date, so records always compare by date only.
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|v| v.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|v| v.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|v| v.date_naive()))
}

mod date_ser {
    use chrono::NaiveDate;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::date_to_record_name;

    use super::parse_record_date;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date_to_record_name(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_record_date(&s)
            .ok_or_else(|| D::Error::custom(format!("Can't parse {s:?} into a date")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{parse_record_date, RecordTable, StudyRecord};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_record_date("2024-01-01"), Some(TEST_DATE));
        assert_eq!(parse_record_date(" 2024-01-01 "), Some(TEST_DATE));
    }

    #[test]
    fn test_parse_date_with_time_is_truncated() {
        assert_eq!(parse_record_date("2024-01-01 00:00:00"), Some(TEST_DATE));
        assert_eq!(parse_record_date("2024-01-01 23:59:59.250"), Some(TEST_DATE));
        assert_eq!(parse_record_date("2024-01-01T13:30:00"), Some(TEST_DATE));
        assert_eq!(
            parse_record_date("2024-01-01T13:30:00+02:00"),
            Some(TEST_DATE)
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_record_date(""), None);
        assert_eq!(parse_record_date("yesterday"), None);
        assert_eq!(parse_record_date("2024-13-01"), None);
    }

    #[test]
    fn test_table_preserves_order() {
        let table = RecordTable::new()
            .with_record(StudyRecord::new(TEST_DATE, "Math", 2.))
            .with_record(StudyRecord::new(TEST_DATE, "Physics", 1.))
            .with_record(StudyRecord::new(TEST_DATE, "Math", 1.5));

        let subjects = table.iter().map(|v| &*v.subject).collect::<Vec<_>>();
        assert_eq!(subjects, ["Math", "Physics", "Math"]);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }
}
