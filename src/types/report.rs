use crate::error::{Result, TaskError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Ok,
    Warning,
    Error,
    /// Anything scss-lint did not document, including a missing severity.
    Unknown(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Unknown(raw) => raw,
        }
    }

    /// ok=1 < warning=2 < error=3; unknown severities rank 0.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Unknown(_) => 0,
            Severity::Ok => 1,
            Severity::Warning => 2,
            Severity::Error => 3,
        }
    }

    pub fn cmp_rank(&self, other: &Severity) -> Ordering {
        self.rank().cmp(&other.rank())
    }

    pub fn from_counts(errors: usize, warnings: usize) -> Severity {
        if errors > 0 {
            Severity::Error
        } else if warnings > 0 {
            Severity::Warning
        } else {
            Severity::Ok
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unknown(String::new())
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ok" => Severity::Ok,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::Unknown(raw),
        }
    }
}

impl From<&str> for Severity {
    fn from(raw: &str) -> Self {
        Severity::from(raw.to_string())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One lint violation as emitted by `scss-lint --format=JSON`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(deserialize_with = "null_as_default")]
    pub line: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub column: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub length: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub severity: Severity,
    #[serde(rename = "reason", deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "linter", deserialize_with = "null_as_default")]
    pub source: String,
}

/// scss-lint may emit `null` for fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Finding {
    /// Orders by line, column, length, then message. Reporters rely on this
    /// order for output that does not depend on scss-lint's JSON ordering.
    pub fn compare(a: &Finding, b: &Finding) -> Ordering {
        a.line
            .cmp(&b.line)
            .then(a.column.cmp(&b.column))
            .then(a.length.cmp(&b.length))
            .then_with(|| a.message.cmp(&b.message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityPresence {
    pub ok: bool,
    pub warning: bool,
    pub error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub source: String,
    pub severity: Severity,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub severity: Severity,
    pub has: SeverityPresence,
    /// Per-linter counts in first-seen order.
    pub sources: Vec<SourceStats>,
}

impl FileStats {
    fn collect(findings: &[Finding]) -> FileStats {
        let mut stats = FileStats {
            severity: Severity::Ok,
            has: SeverityPresence::default(),
            sources: Vec::new(),
        };

        for finding in findings {
            if finding.severity.cmp_rank(&stats.severity) == Ordering::Greater {
                stats.severity = finding.severity.clone();
            }

            match finding.severity {
                Severity::Ok => stats.has.ok = true,
                Severity::Warning => stats.has.warning = true,
                Severity::Error => stats.has.error = true,
                Severity::Unknown(_) => {}
            }

            match stats
                .sources
                .iter_mut()
                .find(|entry| entry.source == finding.source)
            {
                Some(entry) => entry.count += 1,
                None => stats.sources.push(SourceStats {
                    source: finding.source.clone(),
                    severity: finding.severity.clone(),
                    count: 1,
                }),
            }
        }

        stats
    }

    pub fn source(&self, name: &str) -> Option<&SourceStats> {
        self.sources.iter().find(|entry| entry.source == name)
    }
}

#[derive(Debug, Clone)]
pub struct FileReport {
    file_path: String,
    findings: Vec<Finding>,
    error_count: usize,
    warning_count: usize,
    stats: OnceCell<FileStats>,
}

impl FileReport {
    pub fn new(file_path: impl Into<String>, mut findings: Vec<Finding>) -> Self {
        findings.sort_by(Finding::compare);
        let error_count = count_severity(&findings, &Severity::Error);
        let warning_count = count_severity(&findings, &Severity::Warning);

        Self {
            file_path: file_path.into(),
            findings,
            error_count,
            warning_count,
            stats: OnceCell::new(),
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn highest_severity(&self) -> Severity {
        Severity::from_counts(self.error_count, self.warning_count)
    }

    /// Computed on first access and reused afterwards.
    pub fn stats(&self) -> &FileStats {
        self.stats.get_or_init(|| FileStats::collect(&self.findings))
    }
}

fn count_severity(findings: &[Finding], severity: &Severity) -> usize {
    findings
        .iter()
        .filter(|finding| &finding.severity == severity)
        .count()
}

/// Decoded scss-lint JSON: file path to findings, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReport {
    entries: Vec<(String, Vec<Finding>)>,
    positions: HashMap<String, usize>,
}

impl RawReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<RawReport> {
        serde_json::from_str(text).map_err(|e| TaskError::ReportParse(e.to_string()))
    }

    /// Replaces the findings of an existing path in place, appends otherwise.
    pub fn insert(&mut self, file_path: impl Into<String>, findings: Vec<Finding>) {
        let file_path = file_path.into();
        match self.positions.get(&file_path) {
            Some(&position) => self.entries[position].1 = findings,
            None => self.push(file_path, findings),
        }
    }

    fn push(&mut self, file_path: String, findings: Vec<Finding>) {
        self.positions.insert(file_path.clone(), self.entries.len());
        self.entries.push((file_path, findings));
    }

    pub fn contains(&self, file_path: &str) -> bool {
        self.positions.contains_key(file_path)
    }

    /// Adds the paths of `other` that are not present yet.
    pub fn absorb(&mut self, other: RawReport) {
        for (path, findings) in other.entries {
            if !self.contains(&path) {
                self.push(path, findings);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for RawReport {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawReportVisitor;

        impl<'de> Visitor<'de> for RawReportVisitor {
            type Value = RawReport;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of file paths to arrays of lint findings")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<RawReport, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut report = RawReport::new();
                while let Some((path, findings)) = map.next_entry::<String, Vec<Finding>>()? {
                    report.insert(path, findings);
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(RawReportVisitor)
    }
}

impl FromIterator<(String, Vec<Finding>)> for RawReport {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Finding>)>>(iter: I) -> Self {
        let mut report = RawReport::new();
        for (path, findings) in iter {
            report.insert(path, findings);
        }
        report
    }
}

#[derive(Debug, Clone, Default)]
pub struct LintReport {
    files: Vec<FileReport>,
    positions: HashMap<String, usize>,
    error_count: usize,
    warning_count: usize,
}

impl LintReport {
    pub fn from_raw(raw: RawReport) -> Self {
        let mut report = Self::default();
        report.set_report(raw);
        report
    }

    pub fn from_json(text: &str) -> Result<Self> {
        RawReport::from_json(text).map(Self::from_raw)
    }

    /// Drops all derived state and rebuilds it from `raw`.
    pub fn set_report(&mut self, raw: RawReport) {
        self.files = raw
            .entries
            .into_iter()
            .map(|(path, findings)| FileReport::new(path, findings))
            .collect();
        self.positions = raw.positions;
        self.error_count = self.files.iter().map(FileReport::error_count).sum();
        self.warning_count = self.files.iter().map(FileReport::warning_count).sum();
    }

    pub fn count_files(&self) -> usize {
        self.files.len()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn highest_severity(&self) -> Severity {
        Severity::from_counts(self.error_count, self.warning_count)
    }

    /// Fresh iterator over the stored files on every call.
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileReport)> + '_ {
        self.files.iter().map(|file| (file.file_path(), file))
    }

    pub fn file(&self, file_path: &str) -> Option<&FileReport> {
        self.positions
            .get(file_path)
            .map(|&position| &self.files[position])
    }
}

impl Serialize for LintReport {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for file in &self.files {
            map.serialize_entry(file.file_path(), file.findings())?;
        }
        map.end()
    }
}
