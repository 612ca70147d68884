//! Loading and saving of test documents
//!
//! Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
//! JSON. Either way the result is a `serde_json::Value`.

use crate::error::{DocumentError, DocumentResult};
use crate::spec::{DocumentSource, RequestDescription, SuiteSpec, TestCaseSpec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves document sources relative to a base directory
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    base_dir: PathBuf,
}

impl DocumentLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Loader rooted at the directory containing `spec_path`
    pub fn for_spec_file(spec_path: &Path) -> Self {
        let base_dir = spec_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(base_dir)
    }

    /// Load the document a source points at
    pub fn load(&self, source: &DocumentSource) -> DocumentResult<Value> {
        match source {
            DocumentSource::Path(path) => load_document(self.resolve_path(path)),
            DocumentSource::Inline(value) => Ok(value.clone()),
        }
    }

    /// Load and validate a request description
    pub fn load_request(&self, source: &DocumentSource) -> DocumentResult<RequestDescription> {
        let value = self.load(source)?;
        from_value(value, "request description", &self.origin(source))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn origin(&self, source: &DocumentSource) -> String {
        match source {
            DocumentSource::Path(path) => self.resolve_path(path).display().to_string(),
            DocumentSource::Inline(_) => "inline document".to_string(),
        }
    }
}

/// Read a JSON or YAML document from disk
pub fn load_document(path: impl AsRef<Path>) -> DocumentResult<Value> {
    let path = path.as_ref();
    debug!("Loading document: {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| DocumentError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| DocumentError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        serde_json::from_str(&content).map_err(|e| DocumentError::ParseJson {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Read a single test case spec
pub fn load_test_case(path: impl AsRef<Path>) -> DocumentResult<TestCaseSpec> {
    let path = path.as_ref();
    let value = load_document(path)?;
    from_value(value, "test case", &path.display().to_string())
}

/// Read a suite spec
pub fn load_suite(path: impl AsRef<Path>) -> DocumentResult<SuiteSpec> {
    let path = path.as_ref();
    let value = load_document(path)?;
    from_value(value, "test suite", &path.display().to_string())
}

/// Write a value as pretty-printed JSON with four-space indentation
pub fn save_json<T: Serialize>(path: impl AsRef<Path>, data: &T) -> DocumentResult<()> {
    let path = path.as_ref();
    debug!("Saving document: {:?}", path);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)
        .map_err(|e| DocumentError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
    buf.push(b'\n');

    fs::write(path, buf).map_err(|e| DocumentError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

fn from_value<T: DeserializeOwned>(
    value: Value,
    kind: &'static str,
    origin: &str,
) -> DocumentResult<T> {
    serde_json::from_value(value).map_err(|e| DocumentError::InvalidShape {
        kind,
        origin: origin.to_string(),
        source: e,
    })
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "doc.json", r#"{"a": [1, 2], "b": null}"#);

        assert_eq!(load_document(&path).unwrap(), json!({"a": [1, 2], "b": null}));
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "doc.yaml",
            r#"
message: API running.
nested:
  count: 3
"#,
        );

        assert_eq!(
            load_document(&path).unwrap(),
            json!({"message": "API running.", "nested": {"count": 3}})
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_document(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DocumentError::ReadFile { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "bad.json", "{\"a\": ");

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, DocumentError::ParseJson { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_relative_sources_resolve_against_base_dir() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "requests/root.json", r#"{"url": "http://localhost/"}"#);

        let loader = DocumentLoader::new(dir.path());
        let request = loader
            .load_request(&DocumentSource::Path("requests/root.json".into()))
            .unwrap();
        assert_eq!(request.url, "http://localhost/");
        assert_eq!(request.method, "GET");
    }

    #[test]
    fn test_for_spec_file() {
        let loader = DocumentLoader::for_spec_file(Path::new("suites/smoke.json"));
        assert_eq!(loader.base_dir.as_path(), Path::new("suites"));

        let loader = DocumentLoader::for_spec_file(Path::new("smoke.json"));
        assert_eq!(loader.base_dir.as_path(), Path::new(""));
    }

    #[test]
    fn test_inline_request_with_wrong_shape() {
        let loader = DocumentLoader::new(".");
        let err = loader
            .load_request(&DocumentSource::Inline(json!({"method": "GET"})))
            .unwrap_err();

        assert!(matches!(err, DocumentError::InvalidShape { kind: "request description", .. }));
        assert!(err.to_string().contains("inline document"));
    }

    #[test]
    fn test_load_suite_and_case() {
        let dir = TempDir::new().unwrap();
        let suite_path = write_file(
            dir.path(),
            "suite.yml",
            r#"
test_suite_name: smoke
test_cases:
  - test_name: root
    request_description: req.json
    expected_response: resp.json
    ignore: [version]
"#,
        );
        let suite = load_suite(&suite_path).unwrap();
        assert_eq!(suite.name, "smoke");
        assert_eq!(suite.cases[0].ignore, vec!["version".to_string()]);

        let case_path = write_file(dir.path(), "case.json", r#"{"test_name": "missing fields"}"#);
        let err = load_test_case(&case_path).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidShape { kind: "test case", .. }));
    }

    #[test]
    fn test_save_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let data = json!({"results": [{"status": "passed"}]});

        save_json(&path, &data).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    \"results\": ["));
        assert!(content.ends_with("}\n"));
        assert_eq!(load_document(&path).unwrap(), data);
    }

    #[test]
    fn test_save_json_unwritable() {
        let dir = TempDir::new().unwrap();
        let err = save_json(dir.path().join("no/such/dir/out.json"), &json!({})).unwrap_err();
        assert!(matches!(err, DocumentError::WriteFile { .. }));
    }
}
