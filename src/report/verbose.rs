use super::Reporter;
use crate::error::Result;
use crate::types::report::LintReport;

/// Every finding of every file, one line each, grouped by file.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerboseReporter;

impl Reporter for VerboseReporter {
    fn render(&self, report: &LintReport) -> Result<String> {
        let mut output = String::new();
        for (path, file) in report.files() {
            if file.findings().is_empty() {
                continue;
            }

            output.push_str(&format!("{path}\n"));
            for finding in file.findings() {
                output.push_str(&format!(
                    "  {}:{} {:<7} {} ({})\n",
                    finding.line, finding.column, finding.severity, finding.message, finding.source
                ));
            }
            output.push('\n');
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_report_lists_findings_in_order() {
        let report = LintReport::from_json(
            r#"{
                "a.scss": [
                    {"line": 3, "column": 4, "severity": "error", "reason": "R2", "linter": "S2"},
                    {"line": 1, "column": 2, "severity": "warning", "reason": "R1", "linter": "S1"}
                ],
                "clean.scss": []
            }"#,
        )
        .expect("report should parse");

        let rendered = VerboseReporter.render(&report).expect("render should succeed");
        assert_eq!(
            rendered,
            "a.scss\n  1:2 warning R1 (S1)\n  3:4 error   R2 (S2)\n\n"
        );
    }
}
