use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{models::Company, Store};

fn row_to_company(row: &Row) -> Result<Company> {
    let note_required: i64 = row.get("note_required")?;
    Ok(Company {
        id: row.get("id")?,
        name: row.get("name")?,
        excel_column: row.get("excel_column")?,
        note_column: row.get("note_column")?,
        note_required: note_required != 0,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

const COMPANY_COLUMNS: &str =
    "id, name, excel_column, note_column, note_required, created_at, updated_at";

impl Store {
    /// Creates a company and returns its id. The UNIQUE constraint on the
    /// name surfaces as an error for duplicates.
    pub async fn create_company(&self, name: String) -> Result<i64> {
        self.execute(move |conn| {
            conn.execute("INSERT INTO companies (name) VALUES (?1)", params![name])?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_companies(&self) -> Result<Vec<Company>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name ASC"
            ))?;

            let mut rows = stmt.query([])?;
            let mut companies = Vec::new();
            while let Some(row) = rows.next()? {
                companies.push(row_to_company(row)?);
            }

            Ok(companies)
        })
        .await
    }

    pub async fn get_company(&self, id: i64) -> Result<Option<Company>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_company(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn update_company(
        &self,
        id: i64,
        name: String,
        excel_column: Option<String>,
        note_column: Option<String>,
    ) -> Result<bool> {
        self.execute(move |conn| {
            let affected = conn.execute(
                "UPDATE companies
                 SET name = ?1, excel_column = ?2, note_column = ?3,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?4",
                params![name, excel_column, note_column, id],
            )?;
            Ok(affected > 0)
        })
        .await
    }

    /// Updates only the export configuration of a company.
    pub async fn update_company_excel_config(
        &self,
        id: i64,
        excel_column: Option<String>,
        note_column: Option<String>,
        note_required: bool,
    ) -> Result<bool> {
        self.execute(move |conn| {
            let affected = conn.execute(
                "UPDATE companies
                 SET excel_column = ?1, note_column = ?2, note_required = ?3,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?4",
                params![excel_column, note_column, note_required as i64, id],
            )?;
            Ok(affected > 0)
        })
        .await
    }

    /// Deletes a company together with its sessions and pomodoro records.
    ///
    /// All three deletes run in one transaction so a crash can never leave
    /// orphaned rows pointing at a deleted company.
    pub async fn delete_company(&self, id: i64) -> Result<bool> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM work_sessions WHERE company_id = ?1",
                params![id],
            )?;
            tx.execute(
                "DELETE FROM pomodoro_completions WHERE company_id = ?1",
                params![id],
            )?;
            let affected = tx.execute("DELETE FROM companies WHERE id = ?1", params![id])?;

            tx.commit()?;
            Ok(affected > 0)
        })
        .await
    }

    /// Id of the distinguished fallback company.
    pub async fn unassigned_company_id(&self) -> Result<i64> {
        self.execute(|conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM companies WHERE name = 'Unassigned'",
                    [],
                    |row| row.get(0),
                )
                .optional()?;
            id.ok_or_else(|| anyhow::anyhow!("the Unassigned company is missing"))
        })
        .await
    }
}
