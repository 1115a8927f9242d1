use std::path::{Path, PathBuf};

use crate::report::RunReport;

pub const STATE_FILE: &str = ".spec2test-report.json";

fn state_path() -> PathBuf {
    let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    dir.join(STATE_FILE)
}

pub fn save_last_run(report: &RunReport) {
    save_to_path(report, &state_path());
}

pub fn load_last_run() -> Option<RunReport> {
    load_from_path(&state_path())
}

pub fn save_to_path(report: &RunReport, path: &Path) {
    match serde_json::to_string(report) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                tracing::warn!(path = %path.display(), error = %e, "failed to save report");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize report"),
    }
}

pub fn load_from_path(path: &Path) -> Option<RunReport> {
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}
