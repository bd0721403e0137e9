use serde::{Deserialize, Serialize};

/// Per-company rollup of today's sessions, the input to the day-end export:
/// summed duration plus all notes joined with `" | "` in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDaySummary {
    pub company_id: Option<i64>,
    pub company_name: String,
    pub excel_column: Option<String>,
    pub note_column: Option<String>,
    pub total_duration: i64,
    pub combined_notes: String,
}
