use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{instrument, trace};

use crate::storage::entities::RecordTable;

/// Amount of days covered by [last_7_days_trend], including the reference day.
pub const TREND_DAYS: u64 = 7;

/// Hours per subject for a single day.
pub type SubjectHours = BTreeMap<Arc<str>, f64>;

/// Dense pivot of the recent study activity. Every day of the window is present, and every
/// subject studied during the window is present for every day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrend {
    days: BTreeMap<NaiveDate, SubjectHours>,
    #[serde(skip)]
    matched_records: usize,
}

impl WeeklyTrend {
    /// True when none of the records fell into the window.
    pub fn is_empty(&self) -> bool {
        self.matched_records == 0
    }

    /// Amount of records that fell into the window before grouping.
    pub fn matched_records(&self) -> usize {
        self.matched_records
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &SubjectHours)> {
        self.days.iter().map(|(date, hours)| (*date, hours))
    }

    pub fn day(&self, date: NaiveDate) -> Option<&SubjectHours> {
        self.days.get(&date)
    }

    /// Subjects studied during the window, sorted by name.
    pub fn subjects(&self) -> Vec<Arc<str>> {
        self.days
            .values()
            .next()
            .map(|v| v.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn hours(&self, date: NaiveDate, subject: &str) -> f64 {
        self.days
            .get(&date)
            .and_then(|v| v.get(subject))
            .copied()
            .unwrap_or(0.)
    }

    pub fn daily_totals(&self) -> Vec<(NaiveDate, f64)> {
        self.iter()
            .map(|(date, hours)| (date, hours.values().sum()))
            .collect()
    }
}

/// Returns `TREND_DAYS` consecutive dates ending with `today`, oldest first.
pub fn trend_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..TREND_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .collect()
}

/// Groups records of the last 7 days (ending with `today`) by date and subject, summing up hours.
/// Missing date/subject combinations are filled with zeroes.
#[instrument(skip(table))]
pub fn last_7_days_trend(table: &RecordTable, today: NaiveDate) -> WeeklyTrend {
    let mut days = trend_window(today)
        .into_iter()
        .map(|date| (date, SubjectHours::new()))
        .collect::<BTreeMap<_, _>>();

    let mut subjects = BTreeSet::new();
    let mut matched_records = 0usize;

    for record in table {
        let Some(day) = days.get_mut(&record.date) else {
            continue;
        };
        *day.entry(record.subject.clone()).or_insert(0.) += record.hours;
        subjects.insert(record.subject.clone());
        matched_records += 1;
    }

    for day in days.values_mut() {
        for subject in &subjects {
            day.entry(subject.clone()).or_insert(0.);
        }
    }

    trace!(matched_records, subjects = subjects.len(), "Computed trend");

    WeeklyTrend {
        days,
        matched_records,
    }
}
