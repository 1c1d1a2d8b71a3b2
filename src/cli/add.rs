use std::io::Write;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::info;

use crate::{
    storage::record_storage::RecordStorage,
    utils::{clock::Clock, time::format_hours},
};

use super::{
    date::{parse_user_date, DateStyle},
    Args,
};

/// Amount of hours a single day can hold.
const MAX_HOURS: f64 = 24.;

#[derive(Debug, Parser)]
pub struct AddCommand {
    #[arg(long, short, help = "Subject name")]
    subject: String,
    #[arg(
        long,
        default_value_t = 0.,
        allow_negative_numbers = true,
        help = "Hours studied, between 0 and 24"
    )]
    hours: f64,
    #[arg(
        long,
        short,
        help = "Study date. Examples are \"today\", \"yesterday\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `add` command. Validates user input and appends a single record to the
/// storage.
pub fn process_add_command(
    AddCommand {
        subject,
        hours,
        date,
        date_style,
    }: AddCommand,
    storage: &impl RecordStorage,
    clock: &dyn Clock,
    out: &mut impl Write,
) -> Result<()> {
    if subject.trim().is_empty() {
        return Err(Args::command()
            .error(clap::error::ErrorKind::ValueValidation, "Enter a subject name")
            .into());
    }
    if !(0. ..=MAX_HOURS).contains(&hours) {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Hours should be between 0 and {MAX_HOURS}, got {hours}"),
            )
            .into());
    }
    let date = parse_user_date(date.as_deref(), date_style, clock)?;

    let table = storage
        .add_record(date, &subject, hours)
        .context("Failed to save record")?;
    info!("Saved record {date} {subject} {hours}, {} records in total", table.len());

    writeln!(
        out,
        "Record saved! {date}\t{subject}\t{}h",
        format_hours(hours)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Local, NaiveDate, TimeZone};
    use clap::Parser;
    use tempfile::tempdir;

    use crate::{
        storage::{
            entities::StudyRecord,
            record_storage::{CsvRecordStorage, RecordStorage},
        },
        utils::clock::MockClock,
    };

    use super::{process_add_command, AddCommand};

    fn test_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Local.with_ymd_and_hms(2024, 1, 7, 20, 0, 0).unwrap());
        clock
    }

    fn command(args: &[&str]) -> AddCommand {
        AddCommand::parse_from(std::iter::once("add").chain(args.iter().copied()))
    }

    #[test]
    fn test_add_defaults_to_today() -> Result<()> {
        let dir = tempdir()?;
        let storage = CsvRecordStorage::new(dir.path().join("study_data.csv"))?;
        let mut out = Vec::new();

        process_add_command(
            command(&["--subject", "Math", "--hours", "1.5"]),
            &storage,
            &test_clock(),
            &mut out,
        )?;

        let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(
            storage.load()?.records(),
            [StudyRecord::new(today, "Math", 1.5)]
        );
        assert!(String::from_utf8(out)?.starts_with("Record saved!"));
        Ok(())
    }

    #[test]
    fn test_add_with_explicit_date() -> Result<()> {
        let dir = tempdir()?;
        let storage = CsvRecordStorage::new(dir.path().join("study_data.csv"))?;

        process_add_command(
            command(&["-s", "Physics", "--hours", "2", "-d", "03/01/2024"]),
            &storage,
            &test_clock(),
            &mut Vec::new(),
        )?;

        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(
            storage.load()?.records(),
            [StudyRecord::new(date, "Physics", 2.)]
        );
        Ok(())
    }

    #[test]
    fn test_add_rejects_blank_subject() -> Result<()> {
        let dir = tempdir()?;
        let storage = CsvRecordStorage::new(dir.path().join("study_data.csv"))?;

        let result = process_add_command(
            command(&["--subject", "   ", "--hours", "1"]),
            &storage,
            &test_clock(),
            &mut Vec::new(),
        );

        assert!(result.is_err());
        assert!(!storage.path().exists());
        Ok(())
    }

    #[test]
    fn test_add_rejects_hours_out_of_range() -> Result<()> {
        let dir = tempdir()?;
        let storage = CsvRecordStorage::new(dir.path().join("study_data.csv"))?;

        for hours in ["--hours=24.5", "--hours=-1"] {
            let result = process_add_command(
                command(&["--subject", "Math", hours]),
                &storage,
                &test_clock(),
                &mut Vec::new(),
            );
            assert!(result.is_err(), "{hours} should be rejected");
        }
        assert!(storage.load()?.is_empty());
        Ok(())
    }
}
