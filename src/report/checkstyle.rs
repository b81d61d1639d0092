use super::Reporter;
use crate::error::Result;
use crate::types::report::LintReport;

/// Checkstyle 4.3 XML, the format CI servers ingest.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckstyleReporter;

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl Reporter for CheckstyleReporter {
    fn render(&self, report: &LintReport) -> Result<String> {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        output.push_str("<checkstyle version=\"4.3\">\n");
        for (path, file) in report.files() {
            output.push_str(&format!("  <file name=\"{}\">\n", escape_xml(path)));
            for finding in file.findings() {
                output.push_str(&format!(
                    "    <error line=\"{}\" column=\"{}\" severity=\"{}\" message=\"{}\" source=\"{}\"/>\n",
                    finding.line,
                    finding.column,
                    escape_xml(finding.severity.as_str()),
                    escape_xml(&finding.message),
                    escape_xml(&finding.source)
                ));
            }
            output.push_str("  </file>\n");
        }
        output.push_str("</checkstyle>\n");
        Ok(output)
    }
}
