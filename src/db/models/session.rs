use serde::{Deserialize, Serialize};

/// One committed timer run. Duration is whole seconds, date is a local
/// `YYYY-MM-DD` string, and `created_at` breaks ties between same-date
/// sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    pub date: String,
    pub company_id: Option<i64>,
    pub note: Option<String>,
    pub created_at: String,
}

/// Session row with its company name joined in, for detail listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionWithCompany {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    pub date: String,
    pub company_id: Option<i64>,
    pub note: Option<String>,
    pub created_at: String,
    pub company_name: Option<String>,
}

/// Today's session with the export metadata of its company attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodaySession {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    pub date: String,
    pub company_id: Option<i64>,
    pub note: Option<String>,
    pub created_at: String,
    pub company_name: Option<String>,
    pub excel_column: Option<String>,
    pub note_column: Option<String>,
}

/// One (date, company) cell of the history view: summed duration, session
/// count, and the member session ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateCompanyGroup {
    pub date: String,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub total_duration: i64,
    pub session_count: i64,
    pub session_ids: Vec<i64>,
}
