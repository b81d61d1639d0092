use super::Reporter;
use crate::error::Result;
use crate::types::report::{Finding, LintReport, Severity};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct SarifReporter;

fn level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Ok | Severity::Unknown(_) => "note",
    }
}

/// SARIF positions are 1-based; scss-lint reports 0 when it has none.
fn physical_location(path: &str, finding: &Finding) -> Value {
    let mut location = json!({ "artifactLocation": { "uri": path } });
    if finding.line > 0 {
        let mut region = json!({ "startLine": finding.line });
        if finding.column > 0 {
            region["startColumn"] = json!(finding.column);
        }
        location["region"] = region;
    }
    location
}

impl Reporter for SarifReporter {
    fn render(&self, report: &LintReport) -> Result<String> {
        let results: Vec<_> = report
            .files()
            .flat_map(|(path, file)| {
                file.findings().iter().map(move |finding| {
                    json!({
                        "ruleId": finding.source,
                        "level": level(&finding.severity),
                        "message": { "text": finding.message },
                        "locations": [{
                            "physicalLocation": physical_location(path, finding)
                        }]
                    })
                })
            })
            .collect();

        let sarif = json!({
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "scss-lint"
                    }
                },
                "results": results
            }]
        });

        Ok(serde_json::to_string_pretty(&sarif)?)
    }
}
