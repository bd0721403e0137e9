use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Datelike, Local};
use krono::export::{EntryKind, EntryValue, ExportPayload, ExportTransport};
use krono::service::{Reply, Service};
use krono::utils::time::local_date_string;
use krono::Store;
use serde_json::{json, Value};
use tempfile::TempDir;

struct RecordingTransport {
    calls: Mutex<Vec<(String, ExportPayload)>>,
    response: Result<Value, String>,
}

impl RecordingTransport {
    fn replying(response: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response: Ok(response),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response: Err(message.to_string()),
        })
    }

    fn calls(&self) -> Vec<(String, ExportPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExportTransport for RecordingTransport {
    async fn send(&self, url: &str, payload: &ExportPayload) -> anyhow::Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}

fn service_with(dir: &TempDir, transport: Arc<RecordingTransport>) -> Service {
    let store = Store::open(dir.path().join("krono.db")).expect("store should open");
    Service::new(store, transport)
}

async fn seed_today(service: &Service, excel_column: Option<&str>, note: Option<&str>) -> i64 {
    let store = service.store();
    let company_id = store.create_company("Acme".to_string()).await.unwrap();
    store
        .update_company_excel_config(
            company_id,
            excel_column.map(str::to_string),
            Some("E".to_string()),
            false,
        )
        .await
        .unwrap();
    store
        .save_session(
            "block".to_string(),
            5_400,
            local_date_string(),
            Some(company_id),
            note.map(str::to_string),
        )
        .await
        .unwrap();
    company_id
}

#[tokio::test]
async fn unconfigured_url_is_a_sub_status_not_an_error() {
    let dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying(json!({ "success": true }));
    let service = service_with(&dir, transport.clone());
    seed_today(&service, Some("B"), None).await;

    let reply = service.export_day_end().await;
    let Reply::Success { data, .. } = reply else {
        panic!("export should succeed without a configured url");
    };

    assert_eq!(data.export_data.len(), 1);
    assert_eq!(
        data.sheets,
        Some(json!({ "success": false, "error": "Script URL not configured" }))
    );
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn configured_url_pushes_hours_and_notes() {
    let dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying(json!({ "success": true, "updated": 2 }));
    let service = service_with(&dir, transport.clone());
    seed_today(&service, Some("b7"), Some("wrote tests")).await;
    service
        .store()
        .set_setting("script_url", "https://example.test/exec")
        .await
        .unwrap();

    let reply = service.export_day_end().await;
    let Reply::Success { data, .. } = reply else {
        panic!("export should succeed");
    };
    assert_eq!(data.sheets, Some(json!({ "success": true, "updated": 2 })));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (url, payload) = &calls[0];
    assert_eq!(url, "https://example.test/exec");
    assert_eq!(payload.row, Local::now().day() + 1);
    assert_eq!(payload.entries.len(), 2);

    let hours = &payload.entries[0];
    assert_eq!(hours.kind, EntryKind::Hours);
    assert_eq!(hours.column, "B");
    assert_eq!(hours.value, EntryValue::Hours(1.5));
    assert_eq!(hours.company, "Acme");

    let note = &payload.entries[1];
    assert_eq!(note.kind, EntryKind::Note);
    assert_eq!(note.column, "E");
    assert_eq!(note.value, EntryValue::Note("wrote tests".to_string()));
}

#[tokio::test]
async fn nothing_to_send_skips_the_webhook() {
    let dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying(json!({ "success": true }));
    let service = service_with(&dir, transport.clone());
    // Company without an hours column and session without a note.
    seed_today(&service, None, None).await;
    service
        .store()
        .set_setting("script_url", "https://example.test/exec")
        .await
        .unwrap();

    let reply = service.export_day_end().await;
    let Reply::Success { data, .. } = reply else {
        panic!("export should succeed");
    };
    assert_eq!(data.export_data.len(), 1);
    assert_eq!(data.sheets, None);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn transport_failure_is_reported_inside_the_rollup() {
    let dir = TempDir::new().unwrap();
    let transport = RecordingTransport::failing("connection refused");
    let service = service_with(&dir, transport.clone());
    seed_today(&service, Some("B"), None).await;
    service
        .store()
        .set_setting("script_url", "https://example.test/exec")
        .await
        .unwrap();

    let reply = service.export_day_end().await;
    let Reply::Success { data, .. } = reply else {
        panic!("a transport failure must not fail the whole export");
    };

    let sheets = data.sheets.expect("sheets outcome should be present");
    assert_eq!(sheets["success"], json!(false));
    assert!(sheets["error"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn preview_never_touches_the_network() {
    let dir = TempDir::new().unwrap();
    let transport = RecordingTransport::replying(json!({ "success": true }));
    let service = service_with(&dir, transport.clone());
    seed_today(&service, Some("B"), Some("note")).await;
    service
        .store()
        .set_setting("script_url", "https://example.test/exec")
        .await
        .unwrap();

    let reply = service.preview_day_end().await;
    let Reply::Success { data, .. } = reply else {
        panic!("preview should succeed");
    };

    assert_eq!(data.export_data.len(), 1);
    assert_eq!(data.export_data[0].duration, "1:30");
    assert_eq!(data.export_data[0].duration_hours, 1.5);
    assert_eq!(data.sheets, None);
    assert!(transport.calls().is_empty());
}
