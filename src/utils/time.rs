use chrono::NaiveDate;

/// This is the standard way of converting a date to a string in study-planner.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats hours the way they are shown to the user, with a single decimal.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}
