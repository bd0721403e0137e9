use chrono::{Datelike, Duration, Local, NaiveDate};

/// This is the standard way of converting a date to a string in krono.
pub fn date_to_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's local calendar date as `YYYY-MM-DD`.
pub fn local_date_string() -> String {
    date_to_string(Local::now().date_naive())
}

/// Monday and Sunday of the week containing `reference`.
///
/// Weeks run Monday through Sunday; a Sunday reference belongs to the week
/// that started six days earlier.
pub fn week_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = reference - Duration::days(reference.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Formats whole seconds as `H:MM` for the export display string.
pub fn format_hours_minutes(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}
