//! Report desk controller.
//!
//! Owns every piece of mutable desk state (search inputs, rendered devices
//! and their selection, the report form, the generate trigger and the status
//! line). Asynchronous work (debounce timers, HTTP calls, file saves) runs in
//! spawned tasks that report back as [`DeskEvent`]s; state only changes inside
//! [`DeskController::handle`] and the operator-facing methods, so a
//! single-threaded runtime never observes a half-applied update.
//!
//! Report lifecycle:
//!
//! ```text
//! Idle -> Validating -> Submitting -> { Success | Failed } -> Idle
//!            |
//!            +-- invalid --> Idle (no request sent)
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::api::{ApiError, ApiResult, ReportApi};
use super::debounce::Debouncer;
use super::disposition::resolve_filename;
use super::download::{DownloadDir, SaveError};
use super::model::{Device, DeviceQuery, ReportRequest, ReportType};
use super::selection::{SelectAll, SelectionState};
use super::status::StatusNotifier;
use super::validation::{self, ReportForm};
use crate::config::AppConfig;

pub const STATUS_GENERATING: &str = "正在生成报表，请稍候...";
pub const STATUS_GENERATED: &str = "报表生成成功！已开始下载。";

/// Results flowing back from background work into the controller.
#[derive(Debug)]
pub enum DeskEvent {
    /// A debounce window elapsed.
    SearchSettled { generation: u64 },
    /// A directory query finished. `seq` identifies the query that produced it.
    DevicesLoaded {
        seq: u64,
        result: ApiResult<Vec<Device>>,
    },
    /// The report worker finished, successfully or not.
    ReportFinished(Result<SavedReport, GenerateError>),
}

/// A report that made it to disk.
#[derive(Debug, Clone)]
pub struct SavedReport {
    pub path: PathBuf,
    pub warnings: Vec<String>,
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("保存报表失败: {0}")]
    Save(#[from] SaveError),

    #[error("后台任务异常终止: {0}")]
    Worker(String),
}

/// Start-up failures. Reported before the UI takes over the terminal.
#[derive(Error, Debug)]
pub enum DeskInitError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Downloads(#[from] SaveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPhase {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

pub struct DeskController {
    api: ReportApi,
    downloads: DownloadDir,
    tx: mpsc::UnboundedSender<DeskEvent>,

    // ── Search ──────────────────────────────────────────────────────
    customer_query: String,
    device_query: String,
    debouncer: Debouncer,
    /// Sequence number of the most recently issued directory query.
    issued_seq: u64,
    loading: bool,
    selection: SelectionState,

    // ── Report ──────────────────────────────────────────────────────
    form: ReportForm,
    phase: ReportPhase,
    /// How the last submission ended.
    last_outcome: Option<ReportPhase>,
    last_saved: Option<PathBuf>,
    status: StatusNotifier,
}

impl DeskController {
    pub fn new(
        api: ReportApi,
        downloads: DownloadDir,
        settle: Duration,
        tx: mpsc::UnboundedSender<DeskEvent>,
    ) -> Self {
        Self {
            api,
            downloads,
            tx,
            customer_query: String::new(),
            device_query: String::new(),
            debouncer: Debouncer::new(settle),
            issued_seq: 0,
            loading: false,
            selection: SelectionState::new(),
            form: ReportForm::default(),
            phase: ReportPhase::Idle,
            last_outcome: None,
            last_saved: None,
            status: StatusNotifier::new(),
        }
    }

    /// Build the controller and all its collaborators from configuration,
    /// failing on the first unusable one.
    pub fn from_config(
        config: &AppConfig,
        tx: mpsc::UnboundedSender<DeskEvent>,
    ) -> Result<Self, DeskInitError> {
        let api = ReportApi::new(&config.server.base_url)?;
        let downloads = DownloadDir::new(config.download_dir())?;
        info!(
            base_url = %api.base_url(),
            downloads = %downloads.path().display(),
            "Report desk configured"
        );
        Ok(Self::new(
            api,
            downloads,
            Duration::from_millis(config.search.debounce_ms),
            tx,
        ))
    }

    /// Fill the default date range and load the full device list.
    pub fn start(&mut self, today: NaiveDate) {
        let report_type = self.form.report_type;
        self.form = ReportForm::with_default_range(today);
        self.form.report_type = report_type;
        self.search_now();
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Record new search field contents and (re)start the settle window.
    pub fn set_search_input(&mut self, customer_name: &str, device_code: &str) {
        self.customer_query = customer_name.to_string();
        self.device_query = device_code.to_string();
        self.debouncer
            .schedule(&self.tx, |generation| DeskEvent::SearchSettled { generation });
    }

    /// Issue the current query immediately, dropping any pending debounce.
    pub fn search_now(&mut self) {
        self.debouncer.cancel();
        self.issue_query();
    }

    fn issue_query(&mut self) {
        self.issued_seq += 1;
        let seq = self.issued_seq;
        let query = DeviceQuery::from_input(&self.customer_query, &self.device_query);
        self.loading = true;
        self.status.clear();
        debug!(seq, ?query, "Issuing device query");

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_devices(&query).await;
            let _ = tx.send(DeskEvent::DevicesLoaded { seq, result });
        });
    }

    fn apply_devices(&mut self, seq: u64, result: ApiResult<Vec<Device>>) {
        if seq != self.issued_seq {
            debug!(seq, latest = self.issued_seq, "Discarding stale device response");
            return;
        }

        match result {
            Ok(devices) => {
                info!(count = devices.len(), "Device list refreshed");
                self.selection.replace(devices);
            }
            Err(e) => {
                warn!("Device query failed: {e}");
                self.status.error(format!("加载设备列表失败: {e}"));
                self.selection.clear();
            }
        }
        self.loading = false;
    }

    // ── Selection ───────────────────────────────────────────────────

    pub fn toggle_device(&mut self, code: &str) -> Option<bool> {
        self.selection.toggle(code)
    }

    pub fn toggle_all(&mut self) -> SelectAll {
        self.selection.toggle_all()
    }

    // ── Report form ─────────────────────────────────────────────────

    pub fn set_report_type(&mut self, report_type: Option<ReportType>) {
        self.form.report_type = report_type;
    }

    pub fn set_start_date(&mut self, value: &str) {
        self.form.start_date = value.to_string();
    }

    pub fn set_end_date(&mut self, value: &str) {
        self.form.end_date = value.to_string();
    }

    /// Validate the form and, if it passes, submit the report request.
    ///
    /// Returns whether a request was sent. Ignored while a previous request is
    /// still in flight.
    pub fn generate(&mut self) -> bool {
        if self.phase != ReportPhase::Idle {
            debug!(phase = ?self.phase, "Generate ignored, trigger disabled");
            return false;
        }

        self.phase = ReportPhase::Validating;
        self.status.clear();

        let request = match validation::validate(&self.form, &self.selection.selected_codes()) {
            Ok(request) => request,
            Err(e) => {
                debug!("Report form rejected: {e}");
                self.status.error(e.to_string());
                self.phase = ReportPhase::Idle;
                return false;
            }
        };

        self.phase = ReportPhase::Submitting;
        self.status.success(STATUS_GENERATING);
        info!(
            report_type = request.report_type.as_str(),
            devices = request.devices.len(),
            start = %request.start_date,
            end = %request.end_date,
            "Submitting report request"
        );

        let api = self.api.clone();
        let downloads = self.downloads.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Supervise the worker so a panic still produces an outcome.
            let worker = tokio::spawn(run_report(api, downloads, request));
            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(e) => Err(GenerateError::Worker(e.to_string())),
            };
            let _ = tx.send(DeskEvent::ReportFinished(outcome));
        });
        true
    }

    fn finish_report(&mut self, outcome: Result<SavedReport, GenerateError>) {
        if self.phase != ReportPhase::Submitting {
            warn!(phase = ?self.phase, "Report outcome without a submission in flight");
            return;
        }

        match outcome {
            Ok(saved) => {
                for warning in &saved.warnings {
                    warn!("Report warning: {warning}");
                }
                let mut text = format!("{STATUS_GENERATED} 已保存到 {}", saved.path.display());
                if !saved.warnings.is_empty() {
                    text.push_str(&format!("（{} 条警告）", saved.warnings.len()));
                }
                self.status.success(text);
                self.last_saved = Some(saved.path);
                self.last_outcome = Some(ReportPhase::Success);
            }
            Err(e) => {
                warn!("Report generation failed: {e}");
                self.status.error(format!("生成报表失败: {e}"));
                self.last_outcome = Some(ReportPhase::Failed);
            }
        }
        self.phase = ReportPhase::Idle;
    }

    // ── Events ──────────────────────────────────────────────────────

    pub fn handle(&mut self, event: DeskEvent) {
        match event {
            DeskEvent::SearchSettled { generation } => {
                if self.debouncer.is_current(generation) {
                    self.issue_query();
                }
            }
            DeskEvent::DevicesLoaded { seq, result } => self.apply_devices(seq, result),
            DeskEvent::ReportFinished(outcome) => self.finish_report(outcome),
        }
    }

    // ── Projection accessors ────────────────────────────────────────

    pub fn customer_query(&self) -> &str {
        &self.customer_query
    }

    pub fn device_query(&self) -> &str {
        &self.device_query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn form(&self) -> &ReportForm {
        &self.form
    }

    pub fn phase(&self) -> ReportPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<ReportPhase> {
        self.last_outcome
    }

    pub fn last_saved(&self) -> Option<&PathBuf> {
        self.last_saved.as_ref()
    }

    /// The generate trigger is usable only between submissions.
    pub fn trigger_enabled(&self) -> bool {
        self.phase == ReportPhase::Idle
    }

    pub fn status(&self) -> &StatusNotifier {
        &self.status
    }

    pub fn api(&self) -> &ReportApi {
        &self.api
    }
}

async fn run_report(
    api: ReportApi,
    downloads: DownloadDir,
    request: ReportRequest,
) -> Result<SavedReport, GenerateError> {
    let payload = api.generate_report(&request).await?;
    let filename = resolve_filename(
        payload.content_disposition.as_deref(),
        payload.content_type.as_deref(),
    );
    debug!(%filename, content_type = ?payload.content_type, "Resolved report filename");

    let bytes = payload.bytes;
    let path = tokio::task::spawn_blocking(move || downloads.save(&filename, &bytes))
        .await
        .map_err(|e| GenerateError::Worker(e.to_string()))??;

    Ok(SavedReport {
        path,
        warnings: payload.warnings,
    })
}
