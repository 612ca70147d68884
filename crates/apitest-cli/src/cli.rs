//! Command line arguments

use apitest_runner::{ReportStyle, RunnerConfig, Verbosity};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::time::Duration;

const LONG_ABOUT: &str = r#"apitest sends the HTTP requests described by test specs and compares
each JSON response against an expected document.

TEST CASE FILE:
    {
      "test_name": "get config",
      "test_description": "core configuration",
      "request_description": "requests/config.json",
      "expected_response": "responses/config.json",
      "ignore": ["version"],
      "watch": ["unit_system.temperature"]
    }

    Relative paths resolve against the directory of the spec file. Request
    and response documents may also be written inline. YAML files (.yaml,
    .yml) are accepted anywhere JSON is.

SUITE FILE:
    {
      "test_suite_name": "smoke",
      "test_suite_description": "core endpoints",
      "test_cases": [ ...test cases... ]
    }

EXIT CODES:
    0  all tests passed
    1  at least one test failed
    2  invalid arguments or unreadable spec file

EXAMPLES:
    apitest --test tests/config.json
    apitest --suite tests/smoke.json --parallel --compact
    apitest --suite tests/smoke.json --wait-for http://localhost:8123/api/ --export results.json"#;

#[derive(Debug, Parser)]
#[command(name = "apitest")]
#[command(author, version)]
#[command(about = "Run API contract tests against a live HTTP service")]
#[command(long_about = LONG_ABOUT)]
#[command(group(ArgGroup::new("input").required(true).args(["test", "suite"])))]
pub struct Cli {
    /// Run a single test case spec
    #[arg(long, value_name = "FILE")]
    pub test: Option<PathBuf>,

    /// Run a test suite spec
    #[arg(long, value_name = "FILE", alias = "test_suit")]
    pub suite: Option<PathBuf>,

    /// Report one line per differing path instead of nested blocks
    #[arg(long)]
    pub compact: bool,

    /// Log detail: 0 = results only, 1 = test headers, 2 = descriptions
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbosity: Option<u8>,

    /// Run suite cases concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Maximum number of cases running at once (implies --parallel)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Print results in suite order when running in parallel
    #[arg(long)]
    pub ordered: bool,

    /// Write results as JSON to FILE
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Wait until URL answers successfully before running
    #[arg(long, value_name = "URL")]
    pub wait_for: Option<String>,

    /// How long to wait for --wait-for
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub wait_timeout: u64,

    /// Default request timeout
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Disable colored output (a non-empty NO_COLOR env var does the same)
    #[arg(long)]
    pub no_color: bool,

    /// Diagnostic log level on stderr (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Overlay command line flags onto `config`
    pub fn apply(&self, config: &mut RunnerConfig) {
        if self.compact {
            config.style = ReportStyle::Compact;
        }
        if let Some(level) = self.verbosity {
            config.verbosity = Verbosity::from_level(level);
        }
        if self.parallel || self.jobs.is_some() {
            config.parallel = true;
        }
        if let Some(jobs) = self.jobs {
            config.max_concurrency = Some(jobs.max(1));
        }
        if let Some(secs) = self.timeout {
            config.request_timeout = Duration::from_secs(secs);
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout)
    }
}
