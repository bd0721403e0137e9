use serde::{Deserialize, Serialize};

/// A billable (or otherwise tracked) company.
///
/// `excel_column`/`note_column` are the spreadsheet columns the day-end export
/// writes this company's hours and notes into; both are optional. The
/// distinguished `Unassigned` company always exists and owns sessions that
/// were never given an explicit company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub excel_column: Option<String>,
    pub note_column: Option<String>,
    pub note_required: bool,
    pub created_at: String,
    pub updated_at: String,
}
