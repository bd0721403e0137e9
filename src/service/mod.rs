//! Application-facing operations over the store, the day-end export, and the
//! settings table.
//!
//! Every operation returns an envelope rather than a bare `Result`, so a
//! caller wiring these into a UI bridge gets a uniform success/error shape
//! without having to map error types.

mod reply;

pub use reply::{Ack, Reply};

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::db::models::{
    Company, CompanyDaySummary, CompanyPomodoroStat, DateCompanyGroup, PomodoroDayTotal, Session,
    SessionWithCompany, TodaySession,
};
use crate::db::Store;
use crate::export::{self, DayEndExport, ExportTransport, SheetsTransport};
use crate::settings::AppSettings;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSessionRequest {
    pub name: String,
    pub duration: i64,
    pub date: String,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    pub date: String,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub excel_column: Option<String>,
    #[serde(default)]
    pub note_column: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelConfigRequest {
    pub id: i64,
    #[serde(default)]
    pub excel_column: Option<String>,
    #[serde(default)]
    pub note_column: Option<String>,
    #[serde(default)]
    pub note_required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdPayload {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionsPayload {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailsPayload {
    pub sessions: Vec<SessionWithCompany>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodaySessionsPayload {
    pub sessions: Vec<TodaySession>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountPayload {
    pub deleted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompaniesPayload {
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyPayload {
    pub company: Company,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupsPayload {
    pub groups: Vec<DateCompanyGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingPayload {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsPayload {
    pub settings: AppSettings,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTotalsPayload {
    pub this_week: i64,
    pub last_week: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakPayload {
    pub streak: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryPayload {
    pub summary: Vec<CompanyDaySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PomodoroTotalPayload {
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PomodoroStatsPayload {
    pub stats: Vec<CompanyPomodoroStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PomodoroWeekPayload {
    pub days: Vec<PomodoroDayTotal>,
}

#[derive(Clone)]
pub struct Service {
    store: Store,
    transport: Arc<dyn ExportTransport>,
}

impl Service {
    pub fn new(store: Store, transport: Arc<dyn ExportTransport>) -> Self {
        Self { store, transport }
    }

    /// Wires the real webhook transport.
    pub fn with_default_transport(store: Store) -> Result<Self> {
        Ok(Self::new(store, Arc::new(SheetsTransport::new()?)))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // --- sessions ---

    pub async fn save_session(&self, request: SaveSessionRequest) -> Reply<IdPayload> {
        if request.duration < 0 {
            return Reply::err("duration must be non-negative");
        }
        if request.date.trim().is_empty() {
            return Reply::err("date is required");
        }
        debug!("saving session {:?} ({}s)", request.name, request.duration);
        Reply::from_result(
            self.store
                .save_session(
                    request.name,
                    request.duration,
                    request.date,
                    request.company_id,
                    request.note,
                )
                .await
                .map(|id| IdPayload { id }),
        )
    }

    pub async fn get_sessions(&self) -> Reply<SessionsPayload> {
        Reply::from_result(
            self.store
                .get_sessions()
                .await
                .map(|sessions| SessionsPayload { sessions }),
        )
    }

    pub async fn get_sessions_by_date_range(
        &self,
        start: String,
        end: String,
    ) -> Reply<SessionsPayload> {
        Reply::from_result(
            self.store
                .get_sessions_by_date_range(start, end)
                .await
                .map(|sessions| SessionsPayload { sessions }),
        )
    }

    pub async fn update_session(&self, request: UpdateSessionRequest) -> Ack {
        if request.duration < 0 {
            return Ack::err("duration must be non-negative");
        }
        if request.date.trim().is_empty() {
            return Ack::err("date is required");
        }
        Ack::from_found(
            self.store
                .update_session(
                    request.id,
                    request.name,
                    request.duration,
                    request.date,
                    request.company_id,
                    request.note,
                )
                .await,
            "session not found",
        )
    }

    pub async fn delete_session(&self, id: i64) -> Ack {
        Ack::from_found(self.store.delete_session(id).await, "session not found")
    }

    pub async fn delete_all_sessions(&self) -> Reply<CountPayload> {
        Reply::from_result(
            self.store
                .delete_all_sessions()
                .await
                .map(|deleted| CountPayload { deleted }),
        )
    }

    pub async fn get_sessions_by_date_and_company(
        &self,
        date: String,
        company_id: i64,
    ) -> Reply<SessionDetailsPayload> {
        Reply::from_result(
            self.store
                .get_sessions_by_date_and_company(date, company_id)
                .await
                .map(|sessions| SessionDetailsPayload { sessions }),
        )
    }

    pub async fn get_today_sessions(&self) -> Reply<TodaySessionsPayload> {
        Reply::from_result(
            self.store
                .get_today_sessions()
                .await
                .map(|sessions| TodaySessionsPayload { sessions }),
        )
    }

    // --- companies ---

    pub async fn create_company(&self, name: String) -> Reply<IdPayload> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Reply::err("company name is required");
        }
        Reply::from_result(
            self.store
                .create_company(name)
                .await
                .map(|id| IdPayload { id }),
        )
    }

    pub async fn get_companies(&self) -> Reply<CompaniesPayload> {
        Reply::from_result(
            self.store
                .get_companies()
                .await
                .map(|companies| CompaniesPayload { companies }),
        )
    }

    pub async fn get_company(&self, id: i64) -> Reply<CompanyPayload> {
        match self.store.get_company(id).await {
            Ok(Some(company)) => Reply::ok(CompanyPayload { company }),
            Ok(None) => Reply::err("company not found"),
            Err(err) => Reply::err(format!("{err:#}")),
        }
    }

    pub async fn update_company(&self, request: UpdateCompanyRequest) -> Ack {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Ack::err("company name is required");
        }
        Ack::from_found(
            self.store
                .update_company(request.id, name, request.excel_column, request.note_column)
                .await,
            "company not found",
        )
    }

    pub async fn update_company_excel_config(&self, request: ExcelConfigRequest) -> Ack {
        Ack::from_found(
            self.store
                .update_company_excel_config(
                    request.id,
                    request.excel_column,
                    request.note_column,
                    request.note_required,
                )
                .await,
            "company not found",
        )
    }

    /// Deletes the company and everything recorded against it.
    pub async fn delete_company(&self, id: i64) -> Ack {
        Ack::from_found(self.store.delete_company(id).await, "company not found")
    }

    // --- stats ---

    pub async fn get_sessions_grouped(&self) -> Reply<GroupsPayload> {
        Reply::from_result(
            self.store
                .get_sessions_grouped_by_date_and_company()
                .await
                .map(|groups| GroupsPayload { groups }),
        )
    }

    pub async fn get_week_totals(&self) -> Reply<WeekTotalsPayload> {
        let result: Result<WeekTotalsPayload> = async {
            Ok(WeekTotalsPayload {
                this_week: self.store.get_this_week_total().await?,
                last_week: self.store.get_last_week_total().await?,
            })
        }
        .await;
        Reply::from_result(result)
    }

    /// Raw per-company rollup of today's sessions, before export shaping.
    pub async fn get_todays_summary(&self) -> Reply<SummaryPayload> {
        Reply::from_result(
            self.store
                .get_todays_sessions_summary()
                .await
                .map(|summary| SummaryPayload { summary }),
        )
    }

    pub async fn get_current_streak(&self) -> Reply<StreakPayload> {
        Reply::from_result(
            self.store
                .calculate_current_streak()
                .await
                .map(|streak| StreakPayload { streak }),
        )
    }

    // --- settings ---

    pub async fn get_setting(&self, key: String) -> Reply<SettingPayload> {
        Reply::from_result(
            self.store
                .get_setting(&key)
                .await
                .map(|value| SettingPayload { value }),
        )
    }

    pub async fn set_setting(&self, key: String, value: String) -> Ack {
        if key.trim().is_empty() {
            return Ack::err("setting key is required");
        }
        match self.store.set_setting(&key, &value).await {
            Ok(()) => Ack::ok(),
            Err(err) => Ack::err(format!("{err:#}")),
        }
    }

    pub async fn get_settings(&self) -> Reply<SettingsPayload> {
        Reply::from_result(
            AppSettings::load(&self.store)
                .await
                .map(|settings| SettingsPayload { settings }),
        )
    }

    // --- pomodoro ---

    pub async fn record_pomodoro_completion(
        &self,
        date: String,
        company_id: Option<i64>,
        completed_count: i64,
    ) -> Reply<IdPayload> {
        if completed_count <= 0 {
            return Reply::err("completed count must be positive");
        }
        if date.trim().is_empty() {
            return Reply::err("date is required");
        }
        Reply::from_result(
            self.store
                .record_pomodoro_completion(date, company_id, completed_count)
                .await
                .map(|id| IdPayload { id }),
        )
    }

    pub async fn get_today_pomodoro_total(&self) -> Reply<PomodoroTotalPayload> {
        Reply::from_result(
            self.store
                .get_today_pomodoro_total()
                .await
                .map(|total| PomodoroTotalPayload { total }),
        )
    }

    pub async fn get_pomodoro_stats_for_date(&self, date: String) -> Reply<PomodoroStatsPayload> {
        Reply::from_result(
            self.store
                .get_pomodoro_stats_for_date(date)
                .await
                .map(|stats| PomodoroStatsPayload { stats }),
        )
    }

    pub async fn get_pomodoro_last_week(&self) -> Reply<PomodoroWeekPayload> {
        Reply::from_result(
            self.store
                .get_pomodoro_last_week()
                .await
                .map(|days| PomodoroWeekPayload { days }),
        )
    }

    // --- export ---

    /// The day-end rollup without touching the network.
    pub async fn preview_day_end(&self) -> Reply<DayEndExport> {
        Reply::from_result(export::preview_day_end(&self.store).await)
    }

    /// Builds today's rollup and pushes it to the configured webhook.
    pub async fn export_day_end(&self) -> Reply<DayEndExport> {
        Reply::from_result(export::export_day_end(&self.store, self.transport.as_ref()).await)
    }
}
