use serde::{Deserialize, Serialize};

/// Completed focus intervals summed for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroDayTotal {
    pub date: String,
    pub total: i64,
}

/// Completed focus intervals for one company on one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPomodoroStat {
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub total: i64,
}
