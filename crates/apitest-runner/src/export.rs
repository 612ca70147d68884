//! Exportable suite results

use crate::error::DocumentResult;
use crate::loader::save_json;
use crate::result::TestResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Passed,
    Failed,
}

/// One exported test result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub test_name: String,
    pub status: ExportStatus,
    pub api_time_ms: u64,
    pub test_time_ms: u64,
    pub log: String,
}

impl From<&TestResult> for ExportRecord {
    fn from(result: &TestResult) -> Self {
        Self {
            test_name: result.name.clone(),
            status: if result.failed() {
                ExportStatus::Failed
            } else {
                ExportStatus::Passed
            },
            api_time_ms: result.api_time_ms(),
            test_time_ms: result.test_time_ms(),
            log: result.log.clone(),
        }
    }
}

/// Exported results of a whole suite run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<ExportRecord>,
}

impl ExportDocument {
    pub fn write(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        save_json(path, self)
    }
}
