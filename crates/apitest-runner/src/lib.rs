//! API contract test execution
//!
//! Runs test cases that pair an HTTP request description with an expected
//! JSON response, and aggregates them into suites.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  per case  ┌──────────────┐  request  ┌─────────────┐
//! │ SuiteRunner  │───────────▶│ CaseExecutor │──────────▶│  Transport  │
//! │ (seq / par)  │◀───────────│  (own log)   │◀──────────│  (reqwest)  │
//! └──────┬───────┘ TestResult └──────┬───────┘   body    └─────────────┘
//!        │                           │ expected vs actual
//!        ▼                           ▼
//!  SuiteReport / export        apitest_diff::compare
//! ```
//!
//! Every failure (unloadable documents, failed request, mismatching
//! response) is local to its case and shows up as a failed [`TestResult`].

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod export;
pub mod loader;
pub mod result;
pub mod spec;
pub mod suite;
pub mod transport;

pub use client::HttpTransport;
pub use config::{RunnerConfig, Verbosity};
pub use error::{DocumentError, DocumentResult, TransportError};
pub use executor::CaseExecutor;
pub use export::{ExportDocument, ExportRecord, ExportStatus};
pub use loader::{load_document, load_suite, load_test_case, save_json, DocumentLoader};
pub use result::{FailureKind, TestResult};
pub use spec::{DocumentSource, RequestDescription, SuiteSpec, TestCaseSpec};
pub use suite::{ExecutionMode, SuiteReport, SuiteRunner};
pub use transport::Transport;

// Re-export the report style for callers configuring an executor
pub use apitest_diff::ReportStyle;
