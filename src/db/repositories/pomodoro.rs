use std::collections::HashMap;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use rusqlite::params;

use crate::db::{
    models::{CompanyPomodoroStat, PomodoroDayTotal},
    Store,
};
use crate::utils::time::{date_to_string, local_date_string};

impl Store {
    /// Records completed focus intervals (normally one per record).
    pub async fn record_pomodoro_completion(
        &self,
        date: String,
        company_id: Option<i64>,
        completed_count: i64,
    ) -> Result<i64> {
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO pomodoro_completions (date, company_id, completed_count)
                 VALUES (?1, ?2, ?3)",
                params![date, company_id, completed_count],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_today_pomodoro_total(&self) -> Result<i64> {
        let today = local_date_string();
        self.execute(move |conn| {
            let total = conn.query_row(
                "SELECT COALESCE(SUM(completed_count), 0)
                 FROM pomodoro_completions
                 WHERE date = ?1",
                params![today],
                |row| row.get(0),
            )?;
            Ok(total)
        })
        .await
    }

    /// Per-company completion totals for one date, company name ascending.
    pub async fn get_pomodoro_stats_for_date(
        &self,
        date: String,
    ) -> Result<Vec<CompanyPomodoroStat>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT pc.company_id, c.name AS company_name,
                        SUM(pc.completed_count) AS total
                 FROM pomodoro_completions pc
                 LEFT JOIN companies c ON pc.company_id = c.id
                 WHERE pc.date = ?1
                 GROUP BY pc.company_id
                 ORDER BY c.name ASC",
            )?;

            let mut rows = stmt.query(params![date])?;
            let mut stats = Vec::new();
            while let Some(row) = rows.next()? {
                stats.push(CompanyPomodoroStat {
                    company_id: row.get("company_id")?,
                    company_name: row.get("company_name")?,
                    total: row.get("total")?,
                });
            }

            Ok(stats)
        })
        .await
    }

    /// Daily totals for the last 7 calendar days (today included), ascending
    /// by date, with zero rows for days without completions.
    pub async fn get_pomodoro_last_week(&self) -> Result<Vec<PomodoroDayTotal>> {
        self.pomodoro_week_as_of(Local::now().date_naive()).await
    }

    pub async fn pomodoro_week_as_of(&self, today: NaiveDate) -> Result<Vec<PomodoroDayTotal>> {
        let start = today - Duration::days(6);
        let start_str = date_to_string(start);
        let end_str = date_to_string(today);

        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT date, SUM(completed_count) AS total
                 FROM pomodoro_completions
                 WHERE date BETWEEN ?1 AND ?2
                 GROUP BY date",
            )?;

            let mut rows = stmt.query(params![start_str, end_str])?;
            let mut totals: HashMap<String, i64> = HashMap::new();
            while let Some(row) = rows.next()? {
                totals.insert(row.get("date")?, row.get("total")?);
            }

            let days = (0..7)
                .map(|offset| {
                    let date = date_to_string(start + Duration::days(offset));
                    let total = totals.get(&date).copied().unwrap_or(0);
                    PomodoroDayTotal { date, total }
                })
                .collect();

            Ok(days)
        })
        .await
    }
}
