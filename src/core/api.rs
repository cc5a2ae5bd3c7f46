//! HTTP binding for the device directory and report endpoints.

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::model::{Device, DeviceQuery, ErrorEnvelope, HealthStatus, ReportPayload, ReportRequest};

/// Header carrying a JSON array of report warnings.
pub const REPORT_WARNINGS_HEADER: &str = "x-report-warnings";

/// Message used when a failed report response carries no usable `detail`.
pub const GENERIC_REPORT_FAILURE: &str = "生成失败";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    #[error("服务器错误: {reason}")]
    Status { status: StatusCode, reason: String },

    /// The report endpoint refused the request; the text is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("无效的服务地址 {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Client for the report backend.
#[derive(Debug, Clone)]
pub struct ReportApi {
    client: Client,
    base: Url,
}

impl ReportApi {
    /// Create a client rooted at `base_url`. The URL is validated here so a
    /// misconfiguration is reported at start-up rather than on first use.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|source| ApiError::InvalidBaseUrl {
                url: format!("{}{}", self.base, path),
                source,
            })
    }

    /// `GET /api/devices`.
    #[instrument(skip(self))]
    pub async fn list_devices(&self, query: &DeviceQuery) -> ApiResult<Vec<Device>> {
        let url = self.endpoint("/api/devices")?;
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                reason: status_reason(status),
            });
        }

        let devices: Vec<Device> = response.json().await?;
        debug!(count = devices.len(), "Device directory query returned");
        Ok(devices)
    }

    /// `POST /api/reports/generate`.
    ///
    /// A non-success response is turned into [`ApiError::Rejected`] using the
    /// envelope's `detail`; its body is never read as a payload.
    #[instrument(skip(self, request), fields(report_type = request.report_type.as_str(), devices = request.devices.len()))]
    pub async fn generate_report(&self, request: &ReportRequest) -> ApiResult<ReportPayload> {
        let url = self.endpoint("/api/reports/generate")?;
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.detail.filter(|d| !d.trim().is_empty()),
                Err(e) => {
                    debug!("Unreadable error envelope ({status}): {e}");
                    None
                }
            };
            warn!(%status, ?detail, "Report generation rejected");
            return Err(ApiError::Rejected(
                detail.unwrap_or_else(|| GENERIC_REPORT_FAILURE.to_string()),
            ));
        }

        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        info!(size = bytes.len(), "Report payload received");

        Ok(ReportPayload {
            bytes,
            content_disposition: header_text(&headers, CONTENT_DISPOSITION.as_str()),
            content_type: header_text(&headers, CONTENT_TYPE.as_str()),
            warnings: parse_warnings(header_text(&headers, REPORT_WARNINGS_HEADER).as_deref()),
        })
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let url = self.endpoint("/api/health")?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                reason: status_reason(status),
            });
        }
        Ok(response.json().await?)
    }
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// Decode the warnings header. Anything other than a JSON array of strings
/// yields no warnings.
pub fn parse_warnings(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(warnings) => warnings,
        Err(e) => {
            debug!("Ignoring malformed {REPORT_WARNINGS_HEADER} header: {e}");
            Vec::new()
        }
    }
}
