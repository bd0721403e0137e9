use anyhow::Result;
use chrono::{Datelike, Local};
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::db::Store;
use crate::settings::keys;
use crate::utils::time::local_date_string;

use super::builder::{build_entries, export_row, prepare_export_data, ExportItem, ExportPayload};
use super::transport::ExportTransport;

/// Day-end rollup handed back to the caller: per-company items plus the
/// outcome of the spreadsheet push, when one was attempted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEndExport {
    pub export_data: Vec<ExportItem>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Value>,
}

/// Today's rollup without any network side effects.
pub async fn preview_day_end(store: &Store) -> Result<DayEndExport> {
    let summaries = store.get_todays_sessions_summary().await?;
    Ok(DayEndExport {
        export_data: prepare_export_data(&summaries),
        date: local_date_string(),
        sheets: None,
    })
}

/// Builds today's rollup and, when a script URL is configured and there is
/// anything to send, pushes it to the spreadsheet webhook.
///
/// Transport failures are reported inside `sheets` rather than failing the
/// whole call; the rollup is still returned. An unconfigured URL is likewise
/// a sub-status, not an error.
pub async fn export_day_end(
    store: &Store,
    transport: &dyn ExportTransport,
) -> Result<DayEndExport> {
    let mut export = preview_day_end(store).await?;

    let script_url = store
        .get_setting(keys::SCRIPT_URL)
        .await?
        .filter(|url| !url.trim().is_empty());

    let Some(script_url) = script_url else {
        export.sheets = Some(json!({
            "success": false,
            "error": "Script URL not configured",
        }));
        return Ok(export);
    };

    let entries = build_entries(&export.export_data);
    if entries.is_empty() {
        return Ok(export);
    }

    let payload = ExportPayload {
        entries,
        row: export_row(Local::now().day()),
    };

    info!(
        "exporting day-end summary: {} entries for {}",
        payload.entries.len(),
        export.date
    );
    export.sheets = Some(match transport.send(&script_url, &payload).await {
        Ok(result) => result,
        Err(err) => {
            warn!("day-end export failed: {err:#}");
            json!({ "success": false, "error": format!("{err:#}") })
        }
    });

    Ok(export)
}
