//! Wire and domain types shared by the API client, the controller and the TUI.

use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A directory entry as returned by `GET /api/devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device code, also the display key.
    pub code: String,
    /// Name of the owning customer.
    pub name: String,
}

impl Device {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Report kinds the backend knows how to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    DailyConsumption,
    MonthlyConsumption,
}

impl ReportType {
    pub const ALL: [ReportType; 2] = [Self::DailyConsumption, Self::MonthlyConsumption];

    /// Name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DailyConsumption => "daily_consumption",
            Self::MonthlyConsumption => "monthly_consumption",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DailyConsumption => "每日消耗误差报表",
            Self::MonthlyConsumption => "每月消耗误差报表",
        }
    }

    /// Whether the requested range is capped at less than two calendar months.
    pub fn has_span_limit(self) -> bool {
        matches!(self, Self::DailyConsumption)
    }

    /// Cycle forward through `None` (nothing chosen) and every variant.
    pub fn cycle_next(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::ALL[0]),
            Some(t) => {
                let idx = Self::ALL.iter().position(|&x| x == t).unwrap_or(0);
                Self::ALL.get(idx + 1).copied()
            }
        }
    }

    pub fn cycle_prev(current: Option<Self>) -> Option<Self> {
        match current {
            None => Self::ALL.last().copied(),
            Some(t) => {
                let idx = Self::ALL.iter().position(|&x| x == t).unwrap_or(0);
                idx.checked_sub(1).map(|i| Self::ALL[i])
            }
        }
    }
}

/// Query string for the directory search. Empty filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_code: Option<String>,
}

impl DeviceQuery {
    /// Build a query from raw input text; blank fields become `None`.
    pub fn from_input(customer_name: &str, device_code: &str) -> Self {
        fn non_empty(s: &str) -> Option<String> {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Self {
            customer_name: non_empty(customer_name),
            device_code: non_empty(device_code),
        }
    }
}

/// Validated body of `POST /api/reports/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub devices: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Failure envelope of the report endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Successful report response, before filename resolution.
#[derive(Debug, Clone)]
pub struct ReportPayload {
    pub bytes: Bytes,
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
    /// Non-fatal notes the backend attached via `X-Report-Warnings`.
    pub warnings: Vec<String>,
}

/// `GET /api/health` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}
