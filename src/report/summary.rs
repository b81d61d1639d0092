use super::Reporter;
use crate::error::Result;
use crate::types::report::LintReport;

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryReporter;

impl Reporter for SummaryReporter {
    fn render(&self, report: &LintReport) -> Result<String> {
        let mut output = String::new();
        for (path, file) in report.files() {
            output.push_str(&format!(
                "{path}: {} errors, {} warnings ({})\n",
                file.error_count(),
                file.warning_count(),
                file.highest_severity()
            ));
            for source in &file.stats().sources {
                output.push_str(&format!(
                    "  {} x{} ({})\n",
                    source.source, source.count, source.severity
                ));
            }
        }
        output.push_str(&format!(
            "Total: {} files, {} errors, {} warnings ({})\n",
            report.count_files(),
            report.error_count(),
            report.warning_count(),
            report.highest_severity()
        ));
        Ok(output)
    }
}
