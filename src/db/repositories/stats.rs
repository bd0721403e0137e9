use std::collections::HashMap;

use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{
    helpers::parse_id_list,
    models::{CompanyDaySummary, DateCompanyGroup},
    Store,
};
use crate::settings::{keys, DEFAULT_DAILY_TARGET};
use crate::utils::time::{date_to_string, local_date_string, week_bounds};

/// How far back the streak walk will ever look.
const STREAK_LOOKBACK_DAYS: i64 = 365;

fn range_total(conn: &Connection, start: &str, end: &str) -> Result<i64> {
    let total = conn.query_row(
        "SELECT COALESCE(SUM(duration), 0)
         FROM work_sessions
         WHERE date BETWEEN ?1 AND ?2",
        params![start, end],
        |row| row.get(0),
    )?;
    Ok(total)
}

impl Store {
    /// History view: one row per (date, company), date descending then
    /// company name ascending.
    pub async fn get_sessions_grouped_by_date_and_company(
        &self,
    ) -> Result<Vec<DateCompanyGroup>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT ws.date,
                        ws.company_id,
                        c.name AS company_name,
                        SUM(ws.duration) AS total_duration,
                        COUNT(ws.id) AS session_count,
                        GROUP_CONCAT(ws.id) AS session_ids
                 FROM work_sessions ws
                 LEFT JOIN companies c ON ws.company_id = c.id
                 GROUP BY ws.date, ws.company_id
                 ORDER BY ws.date DESC, c.name ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut groups = Vec::new();
            while let Some(row) = rows.next()? {
                groups.push(DateCompanyGroup {
                    date: row.get("date")?,
                    company_id: row.get("company_id")?,
                    company_name: row.get("company_name")?,
                    total_duration: row.get("total_duration")?,
                    session_count: row.get("session_count")?,
                    session_ids: parse_id_list(row.get("session_ids")?),
                });
            }

            Ok(groups)
        })
        .await
    }

    /// Summed duration for Monday..Sunday of the week containing now.
    pub async fn get_this_week_total(&self) -> Result<i64> {
        self.week_total_as_of(Local::now().date_naive()).await
    }

    /// Summed duration for the week before the one containing now.
    pub async fn get_last_week_total(&self) -> Result<i64> {
        self.week_total_as_of(Local::now().date_naive() - Duration::days(7))
            .await
    }

    pub async fn week_total_as_of(&self, reference: NaiveDate) -> Result<i64> {
        let (monday, sunday) = week_bounds(reference);
        let start = date_to_string(monday);
        let end = date_to_string(sunday);
        self.execute(move |conn| range_total(conn, &start, &end)).await
    }

    /// Consecutive days (ending today or yesterday) whose summed duration
    /// reached the daily target.
    ///
    /// The target and the weekend-exclusion flag are read from the settings
    /// table at call time. With weekend exclusion on, Saturdays and Sundays
    /// are stepped over without breaking the streak. The walk gives up 365
    /// days back and returns whatever accumulated.
    pub async fn calculate_current_streak(&self) -> Result<i64> {
        self.streak_as_of(Local::now().date_naive()).await
    }

    pub async fn streak_as_of(&self, today: NaiveDate) -> Result<i64> {
        self.execute(move |conn| {
            let target = read_setting(conn, keys::DAILY_TARGET)?
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(DEFAULT_DAILY_TARGET);
            let exclude_weekends = read_setting(conn, keys::EXCLUDE_WEEKENDS)?
                .map(|raw| raw.trim() == "true")
                .unwrap_or(false);

            let mut stmt = conn.prepare(
                "SELECT date, SUM(duration) AS total_duration
                 FROM work_sessions
                 GROUP BY date",
            )?;
            let mut rows = stmt.query([])?;
            let mut daily_totals: HashMap<String, i64> = HashMap::new();
            while let Some(row) = rows.next()? {
                daily_totals.insert(row.get("date")?, row.get("total_duration")?);
            }

            if daily_totals.is_empty() {
                return Ok(0);
            }

            let met = |date: NaiveDate| {
                daily_totals
                    .get(&date_to_string(date))
                    .is_some_and(|total| *total >= target)
            };

            let mut streak = 0i64;
            let mut check = if met(today) {
                today
            } else {
                today - Duration::days(1)
            };

            loop {
                if (today - check).num_days() > STREAK_LOOKBACK_DAYS {
                    break;
                }
                if exclude_weekends
                    && matches!(check.weekday(), Weekday::Sat | Weekday::Sun)
                {
                    check -= Duration::days(1);
                    continue;
                }
                if met(check) {
                    streak += 1;
                    check -= Duration::days(1);
                } else {
                    break;
                }
            }

            Ok(streak)
        })
        .await
    }

    /// Per-company rollup of today's sessions for the day-end export:
    /// summed duration plus notes joined `" | "` in insertion order.
    pub async fn get_todays_sessions_summary(&self) -> Result<Vec<CompanyDaySummary>> {
        let today = local_date_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT ws.company_id, ws.duration, ws.note,
                        c.name AS company_name, c.excel_column, c.note_column
                 FROM work_sessions ws
                 LEFT JOIN companies c ON ws.company_id = c.id
                 WHERE ws.date = ?1
                 ORDER BY ws.created_at ASC, ws.id ASC",
            )?;

            let mut rows = stmt.query(params![today])?;
            let mut summaries: Vec<CompanyDaySummary> = Vec::new();
            let mut index_by_company: HashMap<Option<i64>, usize> = HashMap::new();
            let mut notes_by_company: HashMap<Option<i64>, Vec<String>> = HashMap::new();

            while let Some(row) = rows.next()? {
                let company_id: Option<i64> = row.get("company_id")?;
                let duration: i64 = row.get("duration")?;
                let note: Option<String> = row.get("note")?;

                let index = *index_by_company.entry(company_id).or_insert_with(|| {
                    summaries.push(CompanyDaySummary {
                        company_id,
                        company_name: String::new(),
                        excel_column: None,
                        note_column: None,
                        total_duration: 0,
                        combined_notes: String::new(),
                    });
                    summaries.len() - 1
                });

                let summary = &mut summaries[index];
                if summary.company_name.is_empty() {
                    summary.company_name = row
                        .get::<_, Option<String>>("company_name")?
                        .unwrap_or_else(|| "Unassigned".to_string());
                    summary.excel_column = row.get("excel_column")?;
                    summary.note_column = row.get("note_column")?;
                }
                summary.total_duration += duration;

                if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
                    notes_by_company.entry(company_id).or_default().push(note);
                }
            }

            for summary in &mut summaries {
                if let Some(notes) = notes_by_company.get(&summary.company_id) {
                    summary.combined_notes = notes.join(" | ");
                }
            }

            Ok(summaries)
        })
        .await
    }
}

fn read_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}
