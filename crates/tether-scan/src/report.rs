use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How serious an empty reference is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One empty reference slot or missing component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Slash-joined names from the scan root to the owning object.
    pub object_path: String,
    pub component_type: String,
    pub field_name: String,
    /// Declared reference type, or element type for collections.
    pub expected_type: String,
    pub severity: Severity,
    /// Element index; set only for collection fields.
    pub array_index: Option<usize>,
}

/// A non-fatal condition that limited a scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    /// The host lacks a capability the requested scan needs.
    CapabilityUnavailable { capability: String, detail: String },
}

/// Result of one scan invocation.
///
/// Findings are only added through [`Report::push`], which keeps
/// `null_count` equal to the number of findings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReportFile")]
pub struct Report {
    pub scanned_target: String,
    /// Scan start time.
    pub timestamp: DateTime<Utc>,
    /// Reference slots examined: one per scalar field, one per collection
    /// element, one per missing component.
    pub total_fields_scanned: usize,
    references: Vec<Finding>,
    null_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScanWarning>,
}

impl Report {
    /// Start an empty report timestamped now.
    pub fn new(scanned_target: impl Into<String>) -> Self {
        Self {
            scanned_target: scanned_target.into(),
            timestamp: Utc::now(),
            total_fields_scanned: 0,
            references: Vec::new(),
            null_count: 0,
            warnings: Vec::new(),
        }
    }

    /// Append a finding in traversal order.
    pub fn push(&mut self, finding: Finding) {
        self.references.push(finding);
        self.null_count = self.references.len();
    }

    /// Findings in traversal order.
    pub fn references(&self) -> &[Finding] {
        &self.references
    }

    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Number of findings with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.references
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Returns `true` if no error-severity findings were reported.
    pub fn passed(&self) -> bool {
        self.count(Severity::Error) == 0
    }

    /// Returns `true` if nothing at all was reported.
    pub fn is_clean(&self) -> bool {
        self.references.is_empty() && self.warnings.is_empty()
    }
}

/// On-disk form of a report. `null_count` is recomputed on load rather
/// than trusted.
#[derive(Deserialize)]
struct ReportFile {
    scanned_target: String,
    timestamp: DateTime<Utc>,
    total_fields_scanned: usize,
    #[serde(default)]
    references: Vec<Finding>,
    #[serde(default)]
    warnings: Vec<ScanWarning>,
}

impl From<ReportFile> for Report {
    fn from(file: ReportFile) -> Self {
        Self {
            scanned_target: file.scanned_target,
            timestamp: file.timestamp,
            total_fields_scanned: file.total_fields_scanned,
            null_count: file.references.len(),
            references: file.references,
            warnings: file.warnings,
        }
    }
}
