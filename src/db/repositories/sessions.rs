use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    models::{Session, SessionWithCompany, TodaySession},
    Store,
};
use crate::utils::time::local_date_string;

fn row_to_session(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.get("id")?,
        name: row.get("name")?,
        duration: row.get("duration")?,
        date: row.get("date")?,
        company_id: row.get("company_id")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
    })
}

fn row_to_session_with_company(row: &Row) -> Result<SessionWithCompany> {
    Ok(SessionWithCompany {
        id: row.get("id")?,
        name: row.get("name")?,
        duration: row.get("duration")?,
        date: row.get("date")?,
        company_id: row.get("company_id")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
        company_name: row.get("company_name")?,
    })
}

impl Store {
    /// Inserts one session record and returns its id. Duration and date are
    /// caller-validated; a missing company id means the session is treated as
    /// unassigned downstream.
    pub async fn save_session(
        &self,
        name: String,
        duration: i64,
        date: String,
        company_id: Option<i64>,
        note: Option<String>,
    ) -> Result<i64> {
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO work_sessions (name, duration, date, company_id, note)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, duration, date, company_id, note],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_sessions(&self) -> Result<Vec<Session>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, duration, date, company_id, note, created_at
                 FROM work_sessions
                 ORDER BY created_at DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    /// Sessions with `start <= date <= end`. Dates compare lexicographically,
    /// which is correct for `YYYY-MM-DD`; malformed dates are not rejected
    /// here.
    pub async fn get_sessions_by_date_range(
        &self,
        start: String,
        end: String,
    ) -> Result<Vec<Session>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, duration, date, company_id, note, created_at
                 FROM work_sessions
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date DESC",
            )?;

            let mut rows = stmt.query(params![start, end])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    /// Full-record update. Returns whether a matching row existed.
    pub async fn update_session(
        &self,
        id: i64,
        name: String,
        duration: i64,
        date: String,
        company_id: Option<i64>,
        note: Option<String>,
    ) -> Result<bool> {
        self.execute(move |conn| {
            let affected = conn.execute(
                "UPDATE work_sessions
                 SET name = ?1, duration = ?2, date = ?3, company_id = ?4, note = ?5
                 WHERE id = ?6",
                params![name, duration, date, company_id, note, id],
            )?;
            Ok(affected > 0)
        })
        .await
    }

    pub async fn delete_session(&self, id: i64) -> Result<bool> {
        self.execute(move |conn| {
            let affected = conn.execute("DELETE FROM work_sessions WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
    }

    /// Removes every session and returns how many were deleted.
    pub async fn delete_all_sessions(&self) -> Result<usize> {
        self.execute(|conn| {
            let affected = conn.execute("DELETE FROM work_sessions", [])?;
            Ok(affected)
        })
        .await
    }

    /// Detail listing for one (date, company) cell of the history view.
    pub async fn get_sessions_by_date_and_company(
        &self,
        date: String,
        company_id: i64,
    ) -> Result<Vec<SessionWithCompany>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT ws.id, ws.name, ws.duration, ws.date, ws.company_id, ws.note,
                        ws.created_at, c.name AS company_name
                 FROM work_sessions ws
                 LEFT JOIN companies c ON ws.company_id = c.id
                 WHERE ws.date = ?1 AND ws.company_id = ?2
                 ORDER BY ws.created_at ASC",
            )?;

            let mut rows = stmt.query(params![date, company_id])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session_with_company(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    /// Today's sessions (local date) with each company's export metadata
    /// attached.
    pub async fn get_today_sessions(&self) -> Result<Vec<TodaySession>> {
        let today = local_date_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT ws.id, ws.name, ws.duration, ws.date, ws.company_id, ws.note,
                        ws.created_at, c.name AS company_name,
                        c.excel_column, c.note_column
                 FROM work_sessions ws
                 LEFT JOIN companies c ON ws.company_id = c.id
                 WHERE ws.date = ?1
                 ORDER BY ws.created_at ASC",
            )?;

            let mut rows = stmt.query(params![today])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(TodaySession {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    duration: row.get("duration")?,
                    date: row.get("date")?,
                    company_id: row.get("company_id")?,
                    note: row.get("note")?,
                    created_at: row.get("created_at")?,
                    company_name: row.get("company_name")?,
                    excel_column: row.get("excel_column")?,
                    note_column: row.get("note_column")?,
                });
            }

            Ok(sessions)
        })
        .await
    }
}
