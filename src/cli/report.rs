//! Printing of the views. Every view reads a fresh table from the storage before printing.

use std::{io::Write, sync::Arc};

use ansi_term::Style;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::Serialize;
use tracing::debug;

use crate::{
    analysis::{
        distinct_subjects, subject_contribution,
        trend::{last_7_days_trend, WeeklyTrend},
        Contribution,
    },
    storage::{entities::RecordTable, record_storage::RecordStorage},
    utils::{
        clock::Clock,
        percentage::Percentage,
        time::{date_to_record_name, format_hours},
    },
};

use super::{
    date::{parse_user_date, DateStyle},
    Args,
};

const NO_RECORDS: &str = "No records yet";
const NO_RECENT_RECORDS: &str = "No data for last 7 days";
const NO_DATA: &str = "No data available";
const OTHER_SUBJECTS: &str = "Other Subjects";

/// Width of the longest bar in the trend view.
const BAR_WIDTH: usize = 30;

#[derive(Debug, Parser)]
pub struct RecordsCommand {
    #[arg(long, help = "Print records as json")]
    json: bool,
}

#[derive(Debug, Parser)]
pub struct TrendCommand {
    #[arg(
        long,
        help = "Last day of the trend. Examples are \"yesterday\", \"15/03/2025\". Defaults to today"
    )]
    today: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, help = "Print trend as json")]
    json: bool,
}

#[derive(Debug, Parser)]
pub struct SubjectCommand {
    #[arg(help = "Subject to analyze. Defaults to the first recorded subject")]
    subject: Option<String>,
    #[arg(long, help = "Print analytics as json")]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SubjectReport {
    subject: Arc<str>,
    total_hours: f64,
    contribution: Contribution,
}

fn heading(out: &mut impl Write, title: &str) -> Result<()> {
    writeln!(out, "{}", Style::new().bold().paint(title))?;
    Ok(())
}

fn load(storage: &impl RecordStorage) -> Result<RecordTable> {
    let table = storage.load().context("Failed to load records")?;
    debug!("Loaded {} records", table.len());
    Ok(table)
}

/// Lists every record in the order they were added.
pub fn process_records_command(
    RecordsCommand { json }: RecordsCommand,
    storage: &impl RecordStorage,
    out: &mut impl Write,
) -> Result<()> {
    let table = load(storage)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &table)?;
        writeln!(out)?;
        return Ok(());
    }

    heading(out, "All Study Records")?;
    if table.is_empty() {
        writeln!(out, "{NO_RECORDS}")?;
        return Ok(());
    }

    let subject_width = table
        .iter()
        .map(|v| v.subject.chars().count())
        .chain(std::iter::once("Subject".len()))
        .max()
        .unwrap_or_default();

    writeln!(out, "{:<10}  {:<subject_width$}  {:>6}", "Date", "Subject", "Hours")?;
    for record in &table {
        writeln!(
            out,
            "{:<10}  {:<subject_width$}  {:>6}",
            date_to_record_name(record.date),
            record.subject,
            format_hours(record.hours)
        )?;
    }
    Ok(())
}

/// Prints hours per subject for each of the last 7 days.
pub fn process_trend_command(
    TrendCommand {
        today,
        date_style,
        json,
    }: TrendCommand,
    storage: &impl RecordStorage,
    clock: &dyn Clock,
    out: &mut impl Write,
) -> Result<()> {
    let today = parse_user_date(today.as_deref(), date_style, clock)?;
    let table = load(storage)?;
    let trend = last_7_days_trend(&table, today);

    if json {
        serde_json::to_writer_pretty(&mut *out, &trend)?;
        writeln!(out)?;
        return Ok(());
    }

    heading(out, "Study Graph - Last 7 Days")?;
    if table.is_empty() {
        writeln!(out, "{NO_RECORDS}")?;
    } else if trend.is_empty() {
        writeln!(out, "{NO_RECENT_RECORDS}")?;
    } else {
        print_trend(out, &trend)?;
    }
    Ok(())
}

fn print_trend(out: &mut impl Write, trend: &WeeklyTrend) -> Result<()> {
    let subjects = trend.subjects();
    let widths = subjects
        .iter()
        .map(|v| v.chars().count().max(5))
        .collect::<Vec<_>>();

    write!(out, "{:<10}", "Date")?;
    for (subject, width) in subjects.iter().zip(widths.iter().copied()) {
        write!(out, "  {subject:>width$}")?;
    }
    writeln!(out, "  {:>6}", "Total")?;

    let totals = trend.daily_totals();
    let max_total = totals.iter().map(|v| v.1).fold(0., f64::max);

    for (date, hours) in trend.iter() {
        write!(out, "{:<10}", date_to_record_name(date))?;
        for (subject, width) in subjects.iter().zip(widths.iter().copied()) {
            let value = hours.get(subject).copied().unwrap_or(0.);
            write!(out, "  {:>width$}", format_hours(value))?;
        }
        let total = day_total(&totals, date);
        writeln!(out, "  {:>6}  {}", format_hours(total), bar(total, max_total))?;
    }
    Ok(())
}

fn day_total(totals: &[(NaiveDate, f64)], date: NaiveDate) -> f64 {
    totals
        .iter()
        .find(|v| v.0 == date)
        .map(|v| v.1)
        .unwrap_or(0.)
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0. {
        return String::new();
    }
    let width = (value / max * BAR_WIDTH as f64).round() as usize;
    "█".repeat(width)
}

/// Prints total hours of a subject and its share of all the study time.
pub fn process_subject_command(
    SubjectCommand { subject, json }: SubjectCommand,
    storage: &impl RecordStorage,
    out: &mut impl Write,
) -> Result<()> {
    let table = load(storage)?;
    let subjects = distinct_subjects(&table);

    let Some(first) = subjects.first().cloned() else {
        heading(out, "Subject Analytics")?;
        writeln!(out, "{NO_DATA}")?;
        return Ok(());
    };
    let selected = subject.map(Arc::<str>::from).unwrap_or(first);

    if !subjects.contains(&selected) {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!(
                    "Unknown subject {selected:?}. Recorded subjects are: {}",
                    subjects.join(", ")
                ),
            )
            .into());
    }

    let contribution = subject_contribution(&table, &selected);
    if json {
        let report = SubjectReport {
            subject: selected,
            total_hours: contribution.subject_hours,
            contribution,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    heading(out, "Subject Analytics")?;
    writeln!(out, "{}", Style::new().bold().paint(&*selected))?;
    writeln!(out, "Total Hours: {}", format_hours(contribution.subject_hours))?;
    writeln!(out)?;
    heading(out, "Subject Contribution")?;

    let width = selected.chars().count().max(OTHER_SUBJECTS.len());
    let share = |v: Option<Percentage>| v.map(|v| format!("{v}")).unwrap_or_else(|| "-".into());
    writeln!(
        out,
        "{:<width$}  {:>6}  {:>6}",
        selected,
        format_hours(contribution.subject_hours),
        share(contribution.subject_share())
    )?;
    writeln!(
        out,
        "{:<width$}  {:>6}  {:>6}",
        OTHER_SUBJECTS,
        format_hours(contribution.other_hours),
        share(contribution.other_share())
    )?;
    Ok(())
}

/// Lists recorded subjects in the order they were first studied.
pub fn process_subjects_command(storage: &impl RecordStorage, out: &mut impl Write) -> Result<()> {
    let table = load(storage)?;
    let subjects = distinct_subjects(&table);
    if subjects.is_empty() {
        writeln!(out, "{NO_DATA}")?;
    }
    for subject in subjects {
        writeln!(out, "{subject}")?;
    }
    Ok(())
}
