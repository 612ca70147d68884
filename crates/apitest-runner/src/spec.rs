//! Test case and suite definitions
//!
//! Field names follow the on-disk format:
//!
//! ```json
//! {
//!   "test_name": "get config",
//!   "test_description": "GET /api/config returns the core configuration",
//!   "request_description": "requests/config.json",
//!   "expected_response": "responses/config.json",
//!   "ignore": ["version", "location.elevation"],
//!   "watch": ["unit_system"]
//! }
//! ```
//!
//! `request_description` and `expected_response` are either a path
//! (relative paths resolve against the directory of the spec file) or an
//! inline JSON document.

use apitest_diff::PathRules;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where a request description or expected response comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentSource {
    /// A JSON (or YAML) file
    Path(PathBuf),
    /// A document embedded in the spec; a bare string is always a path
    Inline(Value),
}

/// An HTTP request to issue for a test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescription {
    #[serde(default = "default_method")]
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Sent as a JSON body when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Per-request timeout overriding the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RequestDescription {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: default_method(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: "POST".to_string(),
            body: Some(body),
            ..Self::get(url)
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A single request / expected-response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseSpec {
    #[serde(rename = "test_name")]
    pub name: String,
    #[serde(
        rename = "test_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "request_description")]
    pub request: DocumentSource,
    #[serde(rename = "expected_response")]
    pub expected: DocumentSource,
    /// Dotted paths excluded from comparison
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    /// Dotted paths always shown in the report
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watch: Vec<String>,
}

impl TestCaseSpec {
    pub fn new(name: impl Into<String>, request: DocumentSource, expected: DocumentSource) -> Self {
        Self {
            name: name.into(),
            description: None,
            request,
            expected,
            ignore: Vec::new(),
            watch: Vec::new(),
        }
    }

    /// Path rules built from the `ignore` and `watch` lists
    pub fn rules(&self) -> PathRules {
        PathRules::from_lists(self.ignore.iter().cloned(), self.watch.iter().cloned())
    }

    /// Description, if present and non-empty
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// An ordered collection of test cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteSpec {
    #[serde(rename = "test_suite_name", alias = "test_suit_name", default)]
    pub name: String,
    #[serde(
        rename = "test_suite_description",
        alias = "test_suit_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "test_cases")]
    pub cases: Vec<TestCaseSpec>,
}

impl SuiteSpec {
    /// Wrap a single test case so it can run through the suite runner
    pub fn single(case: TestCaseSpec) -> Self {
        Self {
            name: case.name.clone(),
            description: None,
            cases: vec![case],
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}
