//! Common Test Utilities
//!
//! Fixtures shared by the desk tests: a controller wired to a mock backend
//! and helpers for driving its event channel.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::api::ReportApi;
use crate::core::controller::{DeskController, DeskEvent};
use crate::core::download::DownloadDir;

/// Settle window used by tests; short so real-time tests stay fast.
pub const TEST_SETTLE: Duration = Duration::from_millis(50);

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DeskFixture {
    pub desk: DeskController,
    pub rx: mpsc::UnboundedReceiver<DeskEvent>,
    pub downloads: TempDir,
}

pub fn desk_fixture(server: &MockServer) -> DeskFixture {
    let downloads = tempfile::tempdir().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let api = ReportApi::new(&server.uri()).unwrap();
    let dir = DownloadDir::new(downloads.path()).unwrap();
    DeskFixture {
        desk: DeskController::new(api, dir, TEST_SETTLE, tx),
        rx,
        downloads,
    }
}

pub fn sample_devices() -> serde_json::Value {
    json!([
        {"code": "ZR-01", "name": "华东客户"},
        {"code": "ZR-02", "name": "华东客户"},
        {"code": "ZR-03", "name": "华南客户"}
    ])
}

/// Serve `sample_devices()` for every directory query.
pub async fn mount_devices(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_devices()))
        .mount(server)
        .await;
}

pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<DeskEvent>) -> DeskEvent {
    tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for desk event")
        .expect("desk event channel closed")
}

/// Feed events into the controller until a directory response is applied
/// (or discarded).
pub async fn pump_until_devices(fixture: &mut DeskFixture) {
    loop {
        let event = next_event(&mut fixture.rx).await;
        let done = matches!(event, DeskEvent::DevicesLoaded { .. });
        fixture.desk.handle(event);
        if done {
            return;
        }
    }
}

/// Feed events into the controller until the report worker reports back.
pub async fn pump_until_report(fixture: &mut DeskFixture) {
    loop {
        let event = next_event(&mut fixture.rx).await;
        let done = matches!(event, DeskEvent::ReportFinished(_));
        fixture.desk.handle(event);
        if done {
            return;
        }
    }
}
