//! Execution of a single test case

use crate::config::{RunnerConfig, Verbosity};
use crate::error::DocumentResult;
use crate::loader::DocumentLoader;
use crate::result::{FailureKind, TestResult};
use crate::spec::{RequestDescription, TestCaseSpec};
use crate::transport::Transport;
use apitest_diff::{compare, ReportStyle};
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Line opening each test log when headers are shown
pub const SEPARATOR: &str = "────────────────────────────────────────────────────";

/// Prefix of the log line written when a request produced no response
pub const API_FAILURE_MARKER: &str = "API Request Failed";

/// Runs test cases against a transport
///
/// Every case writes into its own log buffer, so any number of cases can
/// run concurrently on one executor.
pub struct CaseExecutor {
    transport: Arc<dyn Transport>,
    loader: DocumentLoader,
    style: ReportStyle,
    verbosity: Verbosity,
}

impl CaseExecutor {
    pub fn new(transport: Arc<dyn Transport>, loader: DocumentLoader) -> Self {
        Self {
            transport,
            loader,
            style: ReportStyle::default(),
            verbosity: Verbosity::default(),
        }
    }

    /// Executor using the report style and verbosity of `config`
    pub fn from_config(
        transport: Arc<dyn Transport>,
        loader: DocumentLoader,
        config: &RunnerConfig,
    ) -> Self {
        Self::new(transport, loader)
            .with_style(config.style)
            .with_verbosity(config.verbosity)
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Run one test case
    ///
    /// Never fails: load errors, transport errors and mismatches all end up
    /// as a failed [`TestResult`] with the cause in its log.
    pub async fn run(&self, case: &TestCaseSpec, index: usize) -> TestResult {
        let started = Instant::now();
        let mut log = CaseLog::default();

        if self.verbosity.shows_header() {
            log.line("");
            log.line(SEPARATOR);
            log.line(format!("[Test] \"{}\"", case.name));
            if self.verbosity.shows_description() {
                if let Some(description) = case.description() {
                    log.line(format!("  {}", description));
                }
            }
        }

        let (failure, api_latency) = match self.load(case) {
            Ok((request, expected)) => self.check(case, &request, &expected, &mut log).await,
            Err(err) => {
                warn!("Test \"{}\": {}", case.name, err);
                log.line(format!("Failed to load test documents: {}", err));
                (Some(FailureKind::Load), Duration::ZERO)
            }
        };

        if failure.is_some() {
            log.line(format!("Test \"{}\" Failed", case.name));
        } else {
            log.line(format!("Test \"{}\" Successful", case.name));
        }

        let total_latency = started.elapsed();
        log.line("");
        log.line(format!("API Time: {} ms", api_latency.as_millis()));
        log.line(format!("Total Test Time: {} ms", total_latency.as_millis()));

        TestResult {
            name: case.name.clone(),
            index,
            failure,
            api_latency,
            total_latency,
            log: log.into_inner(),
        }
    }

    fn load(&self, case: &TestCaseSpec) -> DocumentResult<(RequestDescription, Value)> {
        let request = self.loader.load_request(&case.request)?;
        let expected = self.loader.load(&case.expected)?;
        Ok((request, expected))
    }

    /// Dispatch the request and compare the response
    async fn check(
        &self,
        case: &TestCaseSpec,
        request: &RequestDescription,
        expected: &Value,
        log: &mut CaseLog,
    ) -> (Option<FailureKind>, Duration) {
        debug!("Test \"{}\": {} {}", case.name, request.method, request.url);

        let api_start = Instant::now();
        let response = self.transport.dispatch(request).await;
        let api_latency = api_start.elapsed();

        let actual = match response {
            Ok(actual) => actual,
            Err(err) => {
                warn!("Test \"{}\": request failed: {}", case.name, err);
                log.line(format!("{}: {}", API_FAILURE_MARKER, err));
                return (Some(FailureKind::Transport), api_latency);
            }
        };

        let diff = compare(expected, &actual, "", &case.rules());
        log.push(&diff.report(self.style));

        if diff.differs() {
            debug!(
                "Test \"{}\": {} difference(s)",
                case.name,
                diff.change_count()
            );
            (Some(FailureKind::Mismatch), api_latency)
        } else {
            (None, api_latency)
        }
    }
}

/// Private text buffer of one test case
#[derive(Debug, Default)]
struct CaseLog(String);

impl CaseLog {
    fn line(&mut self, text: impl Display) {
        self.0.push_str(&text.to_string());
        self.0.push('\n');
    }

    fn push(&mut self, text: &str) {
        self.0.push_str(text);
    }

    fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::spec::DocumentSource;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed body and counts dispatches
    struct StaticTransport {
        body: Value,
        calls: AtomicUsize,
    }

    impl StaticTransport {
        fn new(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn dispatch(&self, _request: &RequestDescription) -> Result<Value, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn dispatch(&self, _request: &RequestDescription) -> Result<Value, TransportError> {
            Err(TransportError::Other("connection refused".to_string()))
        }
    }

    fn inline_case(expected: Value) -> TestCaseSpec {
        TestCaseSpec::new(
            "inline case",
            DocumentSource::Inline(json!({"url": "http://localhost/api/"})),
            DocumentSource::Inline(expected),
        )
    }

    fn executor(transport: Arc<dyn Transport>) -> CaseExecutor {
        CaseExecutor::new(transport, DocumentLoader::new("."))
    }

    #[tokio::test]
    async fn test_matching_response_passes() {
        let transport = StaticTransport::new(json!({"message": "API running."}));
        let result = executor(transport.clone())
            .run(&inline_case(json!({"message": "API running."})), 0)
            .await;

        assert!(result.passed());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(result.log.contains("[Test] \"inline case\""));
        assert!(result.log.contains("Test \"inline case\" Successful"));
        assert!(result.log.contains("API Time: "));
        assert!(result.log.contains("Total Test Time: "));
        assert!(result.total_latency >= result.api_latency);
    }

    #[tokio::test]
    async fn test_mismatch_fails_with_report() {
        let transport = StaticTransport::new(json!({"a": 1, "b": 3}));
        let result = executor(transport)
            .run(&inline_case(json!({"a": 1, "b": 2})), 4)
            .await;

        assert!(result.failed());
        assert_eq!(result.failure, Some(FailureKind::Mismatch));
        assert_eq!(result.index, 4);
        assert!(result.log.contains("- \"b\": 2,"));
        assert!(result.log.contains("+ \"b\": 3,"));
        assert!(result.log.contains("Test \"inline case\" Failed"));
    }

    #[tokio::test]
    async fn test_ignored_difference_passes() {
        let transport = StaticTransport::new(json!({"a": 1, "b": 3}));
        let mut case = inline_case(json!({"a": 1, "b": 2}));
        case.ignore.push("b".to_string());

        let result = executor(transport).run(&case, 0).await;

        assert!(result.passed());
        assert!(!result.log.contains("\"b\""));
    }

    #[tokio::test]
    async fn test_compact_style() {
        let transport = StaticTransport::new(json!({"a": {"x": 2}}));
        let result = executor(transport)
            .with_style(ReportStyle::Compact)
            .run(&inline_case(json!({"a": {"x": 1}})), 0)
            .await;

        assert!(result.log.contains("-\"a.x\":1\n+\"a.x\":2\n"));
    }

    #[tokio::test]
    async fn test_transport_failure_skips_comparison() {
        let result = executor(Arc::new(FailingTransport))
            .run(&inline_case(json!({"a": 1})), 0)
            .await;

        assert_eq!(result.failure, Some(FailureKind::Transport));
        assert!(result.log.contains("API Request Failed: connection refused"));
        assert!(!result.log.contains("\"a\""));
    }

    #[test]
    fn test_load_failure_skips_request() {
        let transport = StaticTransport::new(json!({}));
        let case = TestCaseSpec::new(
            "missing documents",
            DocumentSource::Path("does/not/exist.json".into()),
            DocumentSource::Inline(json!({})),
        );

        let result = tokio_test::block_on(executor(transport.clone()).run(&case, 0));

        assert_eq!(result.failure, Some(FailureKind::Load));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.api_latency, Duration::ZERO);
        assert!(result.log.contains("Failed to load test documents"));
        assert!(result.log.contains("exist.json"));
    }

    #[test]
    fn test_quiet_log_still_explains_result() {
        let transport = StaticTransport::new(json!({"a": 1}));
        let mut case = inline_case(json!({"a": 1}));
        case.description = Some("checks the root endpoint".to_string());

        let result = tokio_test::block_on(
            executor(transport)
                .with_verbosity(Verbosity::Quiet)
                .run(&case, 0),
        );

        assert!(!result.log.contains(SEPARATOR));
        assert!(!result.log.contains("[Test]"));
        assert!(!result.log.contains("checks the root endpoint"));
        assert!(result.log.starts_with("Test \"inline case\" Successful"));
        assert!(result.log.contains("Total Test Time: "));
    }

    #[test]
    fn test_detailed_log_includes_description() {
        let transport = StaticTransport::new(json!({"a": 1}));
        let mut case = inline_case(json!({"a": 1}));
        case.description = Some("checks the root endpoint".to_string());

        let normal = tokio_test::block_on(executor(transport.clone()).run(&case, 0));
        assert!(!normal.log.contains("checks the root endpoint"));

        let detailed = tokio_test::block_on(
            executor(transport)
                .with_verbosity(Verbosity::Detailed)
                .run(&case, 0),
        );
        assert!(detailed.log.contains("  checks the root endpoint\n"));
    }

    #[test]
    fn test_from_config() {
        let config = RunnerConfig {
            style: ReportStyle::Compact,
            verbosity: Verbosity::Quiet,
            ..RunnerConfig::default()
        };
        let executor = CaseExecutor::from_config(
            Arc::new(FailingTransport),
            DocumentLoader::new("cases"),
            &config,
        );

        assert_eq!(executor.style, ReportStyle::Compact);
        assert_eq!(executor.verbosity, Verbosity::Quiet);
    }
}
