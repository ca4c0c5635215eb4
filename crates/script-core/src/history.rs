use crate::error::HistoryError;
use crate::outcome::RunOutcome;
use crate::request::{Elevation, RunId, RunMode, ScriptRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const RECORD_SUFFIX: &str = ".run.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Started,
    Succeeded,
    Failed,
    /// The process never started (unsupported type, spawn error, declined prompt).
    LaunchFailed,
    /// Handed to the OS elevation facility; the result is not observable.
    Detached,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Started)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Started => write!(f, "started"),
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::LaunchFailed => write!(f, "launch_failed"),
            RunStatus::Detached => write!(f, "detached"),
        }
    }
}

/// One script invocation, stored as `<run_id>.run.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub script_path: PathBuf,
    pub script_name: String,
    pub mode: RunMode,
    pub elevation: Elevation,
    pub status: RunStatus,
    pub pid: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub exit_code: Option<i32>,
    pub error: Option<String>,
}

impl RunRecord {
    pub fn new(request: &ScriptRequest, script_name: String) -> Self {
        Self {
            run_id: RunId::new(),
            script_path: request.path.clone(),
            script_name,
            mode: request.mode,
            elevation: request.elevation,
            status: RunStatus::Started,
            pid: None,
            started_at: Utc::now(),
            finished_at: None,
            exit_code: None,
            error: None,
        }
    }

    pub fn mark_started(&mut self, pid: Option<u32>) {
        self.pid = pid;
        self.status = RunStatus::Started;
    }

    pub fn mark_finished(&mut self, outcome: RunOutcome) {
        self.status = if outcome.is_success() {
            RunStatus::Succeeded
        } else {
            RunStatus::Failed
        };
        self.exit_code = outcome.exit_code();
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_launch_failed(&mut self, error: String) {
        self.status = RunStatus::LaunchFailed;
        self.error = Some(error);
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_detached(&mut self) {
        self.status = RunStatus::Detached;
        self.finished_at = Some(Utc::now());
    }

    /// Write the record into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, HistoryError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}{}", self.run_id, RECORD_SUFFIX));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    pub fn read_from_file(path: &Path) -> Result<Self, HistoryError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Compact JSON object for machine consumers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "run_id": self.run_id.0,
            "script": self.script_name,
            "path": self.script_path.display().to_string(),
            "mode": self.mode,
            "elevation": self.elevation,
            "status": self.status,
            "pid": self.pid,
            "started_at": self.started_at.to_rfc3339(),
            "finished_at": self.finished_at.map(|t| t.to_rfc3339()),
            "exit_code": self.exit_code,
            "error": self.error,
        })
    }

    pub fn to_jsonl_line(&self) -> String {
        serde_json::to_string(&self.to_json()).unwrap_or_default()
    }
}

/// Default history directory.
pub fn history_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("scriptdeck")
        .join("runs")
}

/// All run records in `dir`, newest first. Unreadable records are skipped.
pub fn list_runs(dir: &Path) -> Result<Vec<RunRecord>, HistoryError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut results = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(RECORD_SUFFIX))
        {
            if let Ok(record) = RunRecord::read_from_file(&path) {
                results.push(record);
            }
        }
    }
    results.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    Ok(results)
}
