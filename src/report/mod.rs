pub mod checkstyle;
pub mod json;
pub mod sarif;
pub mod summary;
pub mod verbose;

use crate::error::Result;
use crate::types::report::LintReport;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Turns a finished report into text.
pub trait Reporter {
    fn render(&self, report: &LintReport) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Console,
    File(PathBuf),
}

/// Looks up reporters by identifier.
pub trait ReporterRegistry {
    fn resolve(&self, id: &str) -> Option<Box<dyn Reporter>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRegistry;

pub const BUILTIN_REPORTERS: [&str; 5] = ["verbose", "summary", "checkstyle", "json", "sarif"];

impl ReporterRegistry for BuiltinRegistry {
    fn resolve(&self, id: &str) -> Option<Box<dyn Reporter>> {
        match id {
            "verbose" => Some(Box::new(verbose::VerboseReporter)),
            "summary" => Some(Box::new(summary::SummaryReporter)),
            "checkstyle" => Some(Box::new(checkstyle::CheckstyleReporter)),
            "json" => Some(Box::new(json::JsonReporter)),
            "sarif" => Some(Box::new(sarif::SarifReporter)),
            _ => None,
        }
    }
}

/// A resolved reporter bound to where its output goes.
pub struct LintReporter {
    id: String,
    renderer: Box<dyn Reporter>,
    destination: Option<Destination>,
}

impl LintReporter {
    pub fn new(id: impl Into<String>, renderer: Box<dyn Reporter>) -> Self {
        Self {
            id: id.into(),
            renderer,
            destination: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn set_destination(&mut self, destination: Destination) {
        self.destination = Some(destination);
    }

    pub fn generate(&self, report: &LintReport, console: &mut dyn Write) -> Result<()> {
        let rendered = self.renderer.render(report)?;
        match &self.destination {
            Some(Destination::File(path)) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, rendered)?;
            }
            Some(Destination::Console) | None => {
                console.write_all(rendered.as_bytes())?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for LintReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintReporter")
            .field("id", &self.id)
            .field("destination", &self.destination)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report() -> LintReport {
        LintReport::from_json(
            r#"{"a.scss": [{"line": 3, "column": 4, "length": 5, "severity": "error", "reason": "R2", "linter": "S2"}]}"#,
        )
        .expect("report should parse")
    }

    #[test]
    fn builtin_registry_resolves_every_builtin() {
        for id in BUILTIN_REPORTERS {
            assert!(BuiltinRegistry.resolve(id).is_some(), "missing {id}");
        }
        assert!(BuiltinRegistry.resolve("nope").is_none());
    }

    #[test]
    fn generate_writes_to_console_without_destination() {
        let reporter = LintReporter::new("json", Box::new(json::JsonReporter));
        let mut console = Vec::new();
        reporter
            .generate(&report(), &mut console)
            .expect("generate should succeed");
        let text = String::from_utf8(console).expect("utf8 output");
        assert!(text.contains("\"reason\": \"R2\""));
    }

    #[test]
    fn generate_writes_file_destination_and_creates_parents() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("reports/nested/summary.txt");
        let mut reporter = LintReporter::new("summary", Box::new(summary::SummaryReporter));
        reporter.set_destination(Destination::File(path.clone()));

        let mut console = Vec::new();
        reporter
            .generate(&report(), &mut console)
            .expect("generate should succeed");

        assert!(console.is_empty());
        let written = fs::read_to_string(path).expect("report file should exist");
        assert!(written.contains("a.scss"));
    }
}
