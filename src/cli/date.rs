use std::fmt::Display;

use anyhow::Result;
use chrono::NaiveDate;
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::clock::Clock;

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Turns user input like "yesterday" or "15/03/2025" into a calendar date. Missing input means
/// today.
pub fn parse_user_date(
    input: Option<&str>,
    date_style: DateStyle,
    clock: &dyn Clock,
) -> Result<NaiveDate> {
    let now = clock.now();
    match input.map(|s| parse_date_string(s, now, date_style.into())) {
        Some(Ok(v)) => Ok(v.date_naive()),
        Some(Err(e)) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {e}"),
            )
            .into()),
        None => Ok(now.date_naive()),
    }
}
