use super::Reporter;
use crate::error::Result;
use crate::types::report::LintReport;

/// Normalized scss-lint JSON: same shape as the input, findings sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn render(&self, report: &LintReport) -> Result<String> {
        let mut rendered = serde_json::to_string_pretty(report)?;
        rendered.push('\n');
        Ok(rendered)
    }
}
