use rusqlite::Connection;

/// Column presence check used to keep migrations additive: a column is only
/// ever added when `PRAGMA table_info` does not already report it.
pub fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Splits a `GROUP_CONCAT` id list into integers, skipping anything that does
/// not parse.
pub fn parse_id_list(raw: Option<String>) -> Vec<i64> {
    raw.map(|joined| {
        joined
            .split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect()
    })
    .unwrap_or_default()
}
