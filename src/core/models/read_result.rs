use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque id of a pending read operation, taken from the `Operation-Location` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationHandle(String);

impl OperationHandle {
    #[cfg(test)]
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self(operation_id.into())
    }

    /// The service answers a read submission with a URL whose last segment is the id.
    pub fn from_operation_location(operation_location: &str) -> Option<Self> {
        let operation_id = operation_location
            .split(['?', '#'])
            .next()?
            .trim_end_matches('/')
            .rsplit('/')
            .next()?
            .trim();

        if operation_id.is_empty() {
            return None;
        }

        Some(Self(operation_id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Unknown(String),
}

impl ReadStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, ReadStatus::NotStarted | ReadStatus::Running)
    }
}

impl From<String> for ReadStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "notstarted" => ReadStatus::NotStarted,
            "running" => ReadStatus::Running,
            "succeeded" => ReadStatus::Succeeded,
            "failed" => ReadStatus::Failed,
            _ => ReadStatus::Unknown(value),
        }
    }
}

impl From<ReadStatus> for String {
    fn from(status: ReadStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadStatus::NotStarted => write!(f, "notStarted"),
            ReadStatus::Running => write!(f, "running"),
            ReadStatus::Succeeded => write!(f, "succeeded"),
            ReadStatus::Failed => write!(f, "failed"),
            ReadStatus::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Body of `GET read/analyzeResults/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    pub status: ReadStatus,
    #[serde(default)]
    pub analyze_result: Option<ReadAnalyzeResult>,
}

impl ReadOperationResult {
    #[cfg(test)]
    pub fn with_status(status: ReadStatus) -> Self {
        Self {
            status,
            analyze_result: None,
        }
    }

    /// Line texts in page order, then line order, exactly as returned.
    pub fn line_texts(&self) -> Vec<String> {
        self.analyze_result
            .iter()
            .flat_map(|result| result.read_results.iter())
            .flat_map(|page| page.lines.iter())
            .map(|line| line.text.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadAnalyzeResult {
    pub version: Option<String>,
    pub read_results: Vec<ReadPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadPage {
    pub page: u32,
    pub angle: f64,
    pub width: f64,
    pub height: f64,
    pub unit: Option<String>,
    pub lines: Vec<ReadLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadLine {
    pub text: String,
    pub bounding_box: Vec<f64>,
}

/// Outcome of a read operation that reached `succeeded`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    pub lines: Vec<String>,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
