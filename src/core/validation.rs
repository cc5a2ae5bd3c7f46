//! Pre-submission checks for the report form.
//!
//! Checks run in a fixed order and stop at the first failure; none of them
//! touches the network.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::model::{ReportRequest, ReportType};

/// Date format of the form inputs and the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Daily consumption reports must span fewer calendar months than this.
pub const DAILY_CONSUMPTION_MAX_MONTH_SPAN: i32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("请选择报表类型。")]
    MissingReportType,

    #[error("请选择开始和结束日期。")]
    MissingDates,

    #[error("日期格式无效，请使用 YYYY-MM-DD 格式。")]
    InvalidDate,

    #[error("开始日期不能晚于结束日期。")]
    StartAfterEnd,

    #[error("每日消耗误差报表查询日期跨度不能超过两个月。")]
    SpanTooLong,

    #[error("请至少选择一个设备。")]
    NoDevices,
}

/// Raw form values as the operator entered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub report_type: Option<ReportType>,
    pub start_date: String,
    pub end_date: String,
}

impl ReportForm {
    /// Form pre-filled with the last week (`today - 7` .. `today`).
    pub fn with_default_range(today: NaiveDate) -> Self {
        let start = today - chrono::Duration::days(7);
        Self {
            report_type: None,
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: today.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Number of month boundaries between two dates, ignoring the day of month.
pub fn month_span(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate)
}

/// Validate `form` against the currently selected device codes and build the
/// request body.
pub fn validate(form: &ReportForm, selected: &[String]) -> Result<ReportRequest, ValidationError> {
    let report_type = form.report_type.ok_or(ValidationError::MissingReportType)?;

    if form.start_date.trim().is_empty() || form.end_date.trim().is_empty() {
        return Err(ValidationError::MissingDates);
    }
    let start_date = parse_date(&form.start_date)?;
    let end_date = parse_date(&form.end_date)?;

    if start_date > end_date {
        return Err(ValidationError::StartAfterEnd);
    }

    if report_type.has_span_limit()
        && month_span(start_date, end_date) >= DAILY_CONSUMPTION_MAX_MONTH_SPAN
    {
        return Err(ValidationError::SpanTooLong);
    }

    if selected.is_empty() {
        return Err(ValidationError::NoDevices);
    }

    Ok(ReportRequest {
        report_type,
        devices: selected.to_vec(),
        start_date,
        end_date,
    })
}
