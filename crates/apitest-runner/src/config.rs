//! Runner configuration
//!
//! Defaults can be overridden through environment variables, which the CLI
//! in turn overrides with its flags:
//!
//! - `APITEST_VERBOSITY` - 0, 1 or 2
//! - `APITEST_COMPACT` - use the compact report style
//! - `APITEST_PARALLEL` - run suite cases concurrently
//! - `APITEST_MAX_CONCURRENCY` - cap on concurrently running cases
//! - `APITEST_TIMEOUT_SECS` - default request timeout

use crate::client::DEFAULT_TIMEOUT;
use crate::suite::ExecutionMode;
use apitest_diff::ReportStyle;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// How much per-case context goes into a test log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Diff, verdict and timings only
    Quiet,
    /// Adds a header naming the test
    #[default]
    Normal,
    /// Adds the test description
    Detailed,
}

impl Verbosity {
    /// Map a numeric level; anything above 2 is `Detailed`
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            _ => Verbosity::Detailed,
        }
    }

    pub fn shows_header(self) -> bool {
        self >= Verbosity::Normal
    }

    pub fn shows_description(self) -> bool {
        self >= Verbosity::Detailed
    }
}

/// Settings shared by every case of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub style: ReportStyle,
    pub verbosity: Verbosity,
    pub parallel: bool,
    /// `None` runs every case at once
    pub max_concurrency: Option<usize>,
    pub request_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            style: ReportStyle::Nested,
            verbosity: Verbosity::Normal,
            parallel: false,
            max_concurrency: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let compact = parse_flag(lookup("APITEST_COMPACT")).unwrap_or(false);

        Self {
            style: if compact {
                ReportStyle::Compact
            } else {
                defaults.style
            },
            verbosity: parse(lookup("APITEST_VERBOSITY"))
                .map(Verbosity::from_level)
                .unwrap_or(defaults.verbosity),
            parallel: parse_flag(lookup("APITEST_PARALLEL")).unwrap_or(defaults.parallel),
            max_concurrency: parse::<usize>(lookup("APITEST_MAX_CONCURRENCY"))
                .filter(|n| *n > 0)
                .or(defaults.max_concurrency),
            request_timeout: parse(lookup("APITEST_TIMEOUT_SECS"))
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Execution mode for suites
    pub fn execution_mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel {
                max_concurrency: self.max_concurrency,
            }
        } else {
            ExecutionMode::Sequential
        }
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: Option<String>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
