use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::models::CompanyDaySummary;
use crate::utils::time::format_hours_minutes;

/// Spreadsheet row for a given day of month. Row 1 is the header, so day N
/// lands on row N + 1.
pub fn export_row(day_of_month: u32) -> u32 {
    day_of_month + 1
}

/// Rounded to two decimal places to keep the sheet readable.
pub fn decimal_hours(seconds: i64) -> f64 {
    (seconds as f64 / 3600.0 * 100.0).round() / 100.0
}

/// Normalizes a configured column reference to a bare column letter:
/// uppercased with any digits stripped, so `b12` becomes `B`.
fn column_letter(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .to_uppercase()
}

/// One company's share of the day-end rollup, shaped for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub company_name: String,
    pub excel_column: Option<String>,
    pub note_column: Option<String>,
    /// `H:MM` display string.
    pub duration: String,
    pub duration_hours: f64,
    pub duration_seconds: i64,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Hours,
    Note,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EntryValue {
    Hours(f64),
    Note(String),
}

/// One cell write in the webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub column: String,
    pub value: EntryValue,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub company: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub entries: Vec<ExportEntry>,
    pub row: u32,
}

pub fn prepare_export_data(summaries: &[CompanyDaySummary]) -> Vec<ExportItem> {
    summaries
        .iter()
        .map(|summary| ExportItem {
            company_name: summary.company_name.clone(),
            excel_column: summary.excel_column.clone(),
            note_column: summary.note_column.clone(),
            duration: format_hours_minutes(summary.total_duration),
            duration_hours: decimal_hours(summary.total_duration),
            duration_seconds: summary.total_duration,
            notes: summary.combined_notes.clone(),
        })
        .collect()
}

/// Turns the rollup into cell writes: one hours entry per company with a
/// configured hours column, and one note entry per distinct note column.
/// Companies sharing a note column have their notes joined with `" | "` in
/// first-seen order.
pub fn build_entries(items: &[ExportItem]) -> Vec<ExportEntry> {
    let mut entries = Vec::new();
    let mut note_columns: Vec<String> = Vec::new();
    let mut notes_by_column: HashMap<String, Vec<String>> = HashMap::new();

    for item in items {
        if let Some(column) = item
            .excel_column
            .as_deref()
            .map(column_letter)
            .filter(|c| !c.is_empty())
        {
            entries.push(ExportEntry {
                column,
                value: EntryValue::Hours(item.duration_hours),
                kind: EntryKind::Hours,
                company: item.company_name.clone(),
            });
        }

        if item.notes.is_empty() {
            continue;
        }
        let Some(column) = item
            .note_column
            .as_deref()
            .map(column_letter)
            .filter(|c| !c.is_empty())
        else {
            continue;
        };
        if !notes_by_column.contains_key(&column) {
            note_columns.push(column.clone());
        }
        notes_by_column.entry(column).or_default().push(item.notes.clone());
    }

    for column in note_columns {
        let notes = notes_by_column.remove(&column).unwrap_or_default();
        entries.push(ExportEntry {
            column,
            value: EntryValue::Note(notes.join(" | ")),
            kind: EntryKind::Note,
            company: "Combined".to_string(),
        });
    }

    entries
}
