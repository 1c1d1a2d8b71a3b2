//! Views derived from a snapshot of records. Nothing here touches the storage, every function
//! takes a [RecordTable] and returns a fresh value.

pub mod trend;

use std::{collections::HashSet, sync::Arc};

use serde::Serialize;
use tracing::instrument;

use crate::{
    storage::entities::RecordTable,
    utils::percentage::{hours_percentage, Percentage},
};

/// Hours spent on a subject against hours spent on everything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Contribution {
    pub subject_hours: f64,
    pub other_hours: f64,
}

impl Contribution {
    pub fn total(&self) -> f64 {
        self.subject_hours + self.other_hours
    }

    pub fn subject_share(&self) -> Option<Percentage> {
        hours_percentage(self.subject_hours, self.total())
    }

    pub fn other_share(&self) -> Option<Percentage> {
        hours_percentage(self.other_hours, self.total())
    }
}

impl From<Contribution> for (f64, f64) {
    fn from(value: Contribution) -> Self {
        (value.subject_hours, value.other_hours)
    }
}

/// Sum of hours for records matching `subject` exactly. Matching is case sensitive.
pub fn subject_total(table: &RecordTable, subject: &str) -> f64 {
    table
        .iter()
        .filter(|v| &*v.subject == subject)
        .map(|v| v.hours)
        .sum()
}

pub fn overall_total(table: &RecordTable) -> f64 {
    table.iter().map(|v| v.hours).sum()
}

#[instrument(skip(table))]
pub fn subject_contribution(table: &RecordTable, subject: &str) -> Contribution {
    let subject_hours = subject_total(table, subject);
    // Hours can't be negative, so anything below zero is a rounding artifact.
    let other_hours = (overall_total(table) - subject_hours).max(0.);
    Contribution {
        subject_hours,
        other_hours,
    }
}

/// Returns every subject once, in the order they first appear in the table.
pub fn distinct_subjects(table: &RecordTable) -> Vec<Arc<str>> {
    let mut seen = HashSet::new();
    table
        .iter()
        .filter(|v| seen.insert(v.subject.clone()))
        .map(|v| v.subject.clone())
        .collect()
}
