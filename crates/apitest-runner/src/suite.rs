//! Running a suite of test cases

use crate::executor::CaseExecutor;
use crate::export::{ExportDocument, ExportRecord};
use crate::result::TestResult;
use crate::spec::{SuiteSpec, TestCaseSpec};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// How the cases of a suite are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One case after another, in suite order
    #[default]
    Sequential,
    /// One task per case; results are recorded in completion order
    Parallel {
        /// Cap on cases in flight; `None` starts every case at once
        max_concurrency: Option<usize>,
    },
}

/// Aggregated outcome of a suite run
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub suite_name: String,
    pub description: Option<String>,
    pub mode: ExecutionMode,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// One result per case, in the order they were recorded
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Results ordered by their position in the suite
    pub fn in_spec_order(&self) -> Vec<&TestResult> {
        let mut results: Vec<_> = self.results.iter().collect();
        results.sort_by_key(|r| r.index);
        results
    }

    /// Reorder `results` by position in the suite
    pub fn sort_by_spec_order(&mut self) {
        self.results.sort_by_key(|r| r.index);
    }

    /// Export records in the current result order
    pub fn export_records(&self) -> Vec<ExportRecord> {
        self.results.iter().map(ExportRecord::from).collect()
    }

    pub fn export_document(&self) -> ExportDocument {
        ExportDocument {
            suite: self.suite_name.clone(),
            started_at: self.started_at,
            passed: self.passed,
            failed: self.failed,
            results: self.export_records(),
        }
    }
}

/// Results and counters shared by the tasks of a run
#[derive(Debug, Default)]
struct Aggregate {
    results: Vec<TestResult>,
    passed: usize,
    failed: usize,
}

impl Aggregate {
    fn record(&mut self, result: TestResult) {
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }
}

/// Runs every case of a suite through a [`CaseExecutor`]
///
/// Failures never stop a run; every case yields exactly one result.
#[derive(Clone)]
pub struct SuiteRunner {
    executor: Arc<CaseExecutor>,
}

impl SuiteRunner {
    pub fn new(executor: CaseExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    pub async fn run(&self, suite: &SuiteSpec, mode: ExecutionMode) -> SuiteReport {
        let started_at = Utc::now();
        let started = Instant::now();
        info!(
            "Running suite \"{}\" ({} cases, {:?})",
            suite.name,
            suite.cases.len(),
            mode
        );

        let aggregate = match mode {
            ExecutionMode::Sequential => self.run_sequential(&suite.cases).await,
            ExecutionMode::Parallel { max_concurrency } => {
                self.run_parallel(&suite.cases, max_concurrency).await
            }
        };

        let elapsed = started.elapsed();
        info!(
            "Suite \"{}\" finished: {} passed, {} failed in {:?}",
            suite.name, aggregate.passed, aggregate.failed, elapsed
        );

        SuiteReport {
            suite_name: suite.name.clone(),
            description: suite.description().map(str::to_string),
            mode,
            started_at,
            elapsed,
            results: aggregate.results,
            passed: aggregate.passed,
            failed: aggregate.failed,
        }
    }

    async fn run_sequential(&self, cases: &[TestCaseSpec]) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for (index, case) in cases.iter().enumerate() {
            let result = self.executor.run(case, index).await;
            aggregate.record(result);
        }
        aggregate
    }

    async fn run_parallel(
        &self,
        cases: &[TestCaseSpec],
        max_concurrency: Option<usize>,
    ) -> Aggregate {
        let aggregate = Arc::new(Mutex::new(Aggregate::default()));
        let limiter = max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));

        let handles: Vec<_> = cases
            .iter()
            .enumerate()
            .map(|(index, case)| {
                let executor = Arc::clone(&self.executor);
                let aggregate = Arc::clone(&aggregate);
                let limiter = limiter.clone();
                let case = case.clone();

                tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };
                    let result = executor.run(&case, index).await;
                    lock(&aggregate).record(result);
                })
            })
            .collect();

        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            if let Err(err) = joined {
                warn!("Test \"{}\" did not complete: {}", cases[index].name, err);
                lock(&aggregate).record(TestResult::aborted(
                    cases[index].name.clone(),
                    index,
                    &err.to_string(),
                ));
            }
        }

        let mut guard = lock(&aggregate);
        std::mem::take(&mut *guard)
    }
}

/// Lock the aggregate, recovering the data if a task panicked while holding it
fn lock(aggregate: &Mutex<Aggregate>) -> MutexGuard<'_, Aggregate> {
    aggregate.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
