//! Report API Client Tests
//!
//! Request formatting and error mapping against a wiremock backend.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::api::{ApiError, ReportApi, GENERIC_REPORT_FAILURE, REPORT_WARNINGS_HEADER};
use crate::core::disposition::SPREADSHEET_MIME;
use crate::core::model::{Device, DeviceQuery, ReportRequest, ReportType};
use crate::tests::common::sample_devices;

fn request() -> ReportRequest {
    ReportRequest {
        report_type: ReportType::DailyConsumption,
        devices: vec!["ZR-01".to_string(), "ZR-02".to_string()],
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    }
}

// =============================================================================
// Device directory
// =============================================================================

#[tokio::test]
async fn test_list_devices_sends_both_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .and(query_param("customer_name", "华东"))
        .and(query_param("device_code", "ZR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_devices()))
        .expect(1)
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let devices = api
        .list_devices(&DeviceQuery::from_input("华东", "ZR"))
        .await
        .unwrap();

    assert_eq!(devices.len(), 3);
    assert_eq!(devices[0], Device::new("ZR-01", "华东客户"));
}

#[tokio::test]
async fn test_list_devices_omits_blank_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .and(query_param_is_missing("customer_name"))
        .and(query_param("device_code", "ZR-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let devices = api
        .list_devices(&DeviceQuery::from_input("", "ZR-02"))
        .await
        .unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_list_devices_maps_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let err = api.list_devices(&DeviceQuery::default()).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status, .. } if status.as_u16() == 500));
    assert_eq!(err.to_string(), "服务器错误: Internal Server Error");
}

// =============================================================================
// Report generation
// =============================================================================

#[tokio::test]
async fn test_generate_report_posts_json_and_reads_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reports/generate"))
        .and(body_json(json!({
            "report_type": "daily_consumption",
            "devices": ["ZR-01", "ZR-02"],
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    "attachment; filename*=UTF-8''%E6%8A%A5%E8%A1%A8.xlsx",
                )
                .insert_header("content-type", SPREADSHEET_MIME)
                .insert_header(REPORT_WARNINGS_HEADER, r#"["ZR-02 has no readings"]"#)
                .set_body_bytes(b"PK\x03\x04sheet".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let payload = api.generate_report(&request()).await.unwrap();

    assert_eq!(&payload.bytes[..], b"PK\x03\x04sheet");
    assert_eq!(
        payload.content_disposition.as_deref(),
        Some("attachment; filename*=UTF-8''%E6%8A%A5%E8%A1%A8.xlsx")
    );
    assert_eq!(payload.content_type.as_deref(), Some(SPREADSHEET_MIME));
    assert_eq!(payload.warnings, vec!["ZR-02 has no readings".to_string()]);
}

#[tokio::test]
async fn test_generate_report_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reports/generate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "设备 ZR-09 不存在"})),
        )
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let err = api.generate_report(&request()).await.unwrap_err();

    assert!(matches!(err, ApiError::Rejected(_)));
    assert_eq!(err.to_string(), "设备 ZR-09 不存在");
}

#[tokio::test]
async fn test_generate_report_generic_failure_without_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reports/generate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let err = api.generate_report(&request()).await.unwrap_err();
    assert_eq!(err.to_string(), GENERIC_REPORT_FAILURE);
}

#[tokio::test]
async fn test_generate_report_empty_detail_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reports/generate"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": ""})))
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let err = api.generate_report(&request()).await.unwrap_err();
    assert_eq!(err.to_string(), GENERIC_REPORT_FAILURE);
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    // Nothing listens on the discard port.
    let api = ReportApi::new("http://127.0.0.1:9").unwrap();
    let err = api.generate_report(&request()).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.to_string().starts_with("网络错误"));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "version": "1.4.0"})),
        )
        .mount(&server)
        .await;

    let api = ReportApi::new(&server.uri()).unwrap();
    let health = api.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version.as_deref(), Some("1.4.0"));
}
