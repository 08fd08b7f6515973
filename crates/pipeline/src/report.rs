//! The aggregated scan report.
//!
//! Serialized shape:
//!
//! ```json
//! {
//!   "data": { "<repo_url>:<sha>": { "<relative path>": ["<image>", ...] } },
//!   "errors": { "<repo_url>:<sha>": "<message>" }
//! }
//! ```
//!
//! `errors` is omitted entirely when no entry failed. All maps are ordered by
//! key, so identical scans serialize to identical bytes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{DockerfilePath, EntryKey, ImageReference, ScanError};

/// Base images per Dockerfile for one repository.
pub type DockerfileImages = BTreeMap<DockerfilePath, Vec<ImageReference>>;

/// Results and errors for every processed manifest entry.
///
/// Each key lives in exactly one of the two maps; recording an outcome for a
/// key evicts any earlier outcome for it (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    data: BTreeMap<EntryKey, DockerfileImages>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: BTreeMap<EntryKey, String>,
}

impl Report {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful entry.
    pub fn record_success(&mut self, key: EntryKey, images: DockerfileImages) {
        self.errors.remove(&key);
        self.data.insert(key, images);
    }

    /// Records a failed entry.
    pub fn record_failure(&mut self, key: EntryKey, message: impl Into<String>) {
        self.data.remove(&key);
        self.errors.insert(key, message.into());
    }

    /// Successful entries.
    pub fn data(&self) -> &BTreeMap<EntryKey, DockerfileImages> {
        &self.data
    }

    /// Failed entries.
    pub fn errors(&self) -> &BTreeMap<EntryKey, String> {
        &self.errors
    }

    /// Number of entries recorded in either map.
    pub fn len(&self) -> usize {
        self.data.len() + self.errors.len()
    }

    /// Returns `true` if no entry has been recorded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.errors.is_empty()
    }

    /// Renders the report as two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, ScanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn key(s: &str) -> EntryKey {
        EntryKey::new(s).unwrap()
    }

    fn images(pairs: &[(&str, &[&str])]) -> DockerfileImages {
        pairs
            .iter()
            .map(|(path, refs)| {
                (
                    DockerfilePath::new(*path).unwrap(),
                    refs.iter().map(|r| ImageReference::from_raw(*r)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_errors_are_omitted() {
        let mut report = Report::new();
        report.record_success(key("https://github.com/o/r.git:abc123"), images(&[]));

        let v: Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        let obj = v.as_object().unwrap();
        assert!(obj.contains_key("data"));
        assert!(!obj.contains_key("errors"));
    }

    #[test]
    fn empty_report_still_has_data() {
        let json = Report::new().to_json_pretty().unwrap();
        assert_eq!(json, "{\n  \"data\": {}\n}");
    }

    #[test]
    fn serialized_shape_matches_contract() {
        let mut report = Report::new();
        report.record_success(
            key("https://github.com/o/a.git:abc123"),
            images(&[
                ("svc/Dockerfile", &["golang:1.21", "alpine:latest"]),
                ("Dockerfile", &["scratch"]),
            ]),
        );
        report.record_failure(key("https://github.com/o/b.git:def456"), "git clone error: nope");

        let v: Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            v,
            json!({
                "data": {
                    "https://github.com/o/a.git:abc123": {
                        "Dockerfile": ["scratch"],
                        "svc/Dockerfile": ["golang:1.21", "alpine:latest"]
                    }
                },
                "errors": {
                    "https://github.com/o/b.git:def456": "git clone error: nope"
                }
            })
        );
    }

    #[test]
    fn last_write_wins_across_both_maps() {
        let k = key("https://github.com/o/a.git:abc123");
        let mut report = Report::new();

        report.record_failure(k.clone(), "first");
        report.record_success(k.clone(), images(&[("Dockerfile", &["alpine"])]));
        assert!(report.errors().is_empty());
        assert_eq!(report.len(), 1);

        report.record_failure(k.clone(), "second");
        assert!(report.data().is_empty());
        assert_eq!(report.errors().get(&k).map(String::as_str), Some("second"));
    }

    #[test]
    fn keys_are_sorted_in_output() {
        let mut report = Report::new();
        report.record_success(key("https://github.com/o/z.git:abc123"), images(&[]));
        report.record_success(key("https://github.com/o/a.git:abc123"), images(&[]));

        let json = report.to_json_pretty().unwrap();
        let a = json.find("o/a.git").unwrap();
        let z = json.find("o/z.git").unwrap();
        assert!(a < z);
    }
}
