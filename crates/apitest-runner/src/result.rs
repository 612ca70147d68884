//! Outcome of a single test case

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Why a test case failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Request description or expected response could not be loaded
    Load,
    /// The request did not produce a response
    Transport,
    /// The response differs from the expected document
    Mismatch,
    /// The task running the case did not complete
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Load => write!(f, "LOAD"),
            FailureKind::Transport => write!(f, "TRANSPORT"),
            FailureKind::Mismatch => write!(f, "MISMATCH"),
            FailureKind::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Result of running one test case
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub name: String,
    /// Position of the case in its suite
    pub index: usize,
    /// `None` when the case passed
    pub failure: Option<FailureKind>,
    /// Time spent waiting for the response
    pub api_latency: Duration,
    /// Time spent on the whole case: loading, request and comparison
    pub total_latency: Duration,
    pub log: String,
}

impl TestResult {
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn passed(&self) -> bool {
        !self.failed()
    }

    pub fn api_time_ms(&self) -> u64 {
        millis(self.api_latency)
    }

    pub fn test_time_ms(&self) -> u64 {
        millis(self.total_latency)
    }

    /// Result for a case whose task never reported back
    pub fn aborted(name: impl Into<String>, index: usize, reason: &str) -> Self {
        let name = name.into();
        let log = format!("Test \"{}\" Failed\nTest did not complete: {}\n", name, reason);

        Self {
            name,
            index,
            failure: Some(FailureKind::Aborted),
            api_latency: Duration::ZERO,
            total_latency: Duration::ZERO,
            log,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
