pub mod stdin;

use crate::command::{build_command, build_stdin_command};
use crate::error::{Result, TaskError};
use crate::policy::{exit_code, exit_message, is_lint_success};
use crate::process::{ProcessOutput, ProcessRunner};
use crate::report::{Destination, LintReporter, ReporterRegistry};
use crate::types::config::{CommandOptions, TaskConfig, MACHINE_READABLE_FORMAT};
use crate::types::report::{LintReport, RawReport};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Outcome of one task run. Never an error: failures become exit codes.
#[derive(Debug)]
pub struct TaskResult {
    pub exit_code: i32,
    pub message: String,
    /// `None` when scss-lint was never started.
    pub raw_exit_code: Option<i32>,
    pub report: Option<LintReport>,
    report_asset_name: String,
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == exit_code::OK
    }

    /// `<asset_name_prefix>report`
    pub fn report_asset_name(&self) -> &str {
        &self.report_asset_name
    }

    pub fn asset(&self, name: &str) -> Option<&LintReport> {
        if name == self.report_asset_name {
            self.report.as_ref()
        } else {
            None
        }
    }
}

struct LintOutcome {
    raw_exit_code: i32,
    stdout: String,
    stderr: String,
    report: Option<LintReport>,
    /// First payload that could not be decoded.
    parse_error: Option<TaskError>,
}

pub struct TaskRunner<'a> {
    config: &'a TaskConfig,
    process: &'a dyn ProcessRunner,
    registry: &'a dyn ReporterRegistry,
}

impl<'a> TaskRunner<'a> {
    pub fn new(
        config: &'a TaskConfig,
        process: &'a dyn ProcessRunner,
        registry: &'a dyn ReporterRegistry,
    ) -> Self {
        Self {
            config,
            process,
            registry,
        }
    }

    /// Errors on the first enabled reporter the registry cannot resolve.
    pub fn validate_reporters(&self) -> Result<()> {
        match self
            .config
            .reporters
            .iter()
            .filter(|reporter| reporter.enabled)
            .find(|reporter| self.registry.resolve(reporter.registry_id()).is_none())
        {
            Some(reporter) => Err(TaskError::UnknownReporter(reporter.id.clone())),
            None => Ok(()),
        }
    }

    /// Options as the run will use them, with the format forced to JSON
    /// when reporters need a machine-readable report.
    pub fn effective_options(&self) -> CommandOptions {
        self.options_for(&self.init_reporters())
    }

    fn options_for(&self, reporters: &[LintReporter]) -> CommandOptions {
        let mut options = self.config.command.clone();
        if options.format().is_none() && !reporters.is_empty() {
            options.format = Some(MACHINE_READABLE_FORMAT.to_string());
        }
        options
    }

    /// The command `run` starts; in stdin mode, the one for the first file.
    pub fn command(&self) -> String {
        let options = self.effective_options();
        match self.config.stdin.first() {
            Some(file) => build_stdin_command(&options, file),
            None => build_command(&options),
        }
    }

    pub fn run(&self, console: &mut dyn Write) -> TaskResult {
        let reporters = self.init_reporters();
        let options = self.options_for(&reporters);

        if !reporters.is_empty() && !options.is_machine_readable() {
            warn!(
                format = options.format().unwrap_or_default(),
                "lint reporters require the {MACHINE_READABLE_FORMAT} format"
            );
            return self.finish(exit_code::INVALID, None, "", None);
        }

        let outcome = if self.config.stdin.is_empty() {
            self.lint_files(&options)
        } else {
            self.lint_stdin(&options)
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => return self.failure(err, None),
        };

        if reporters.is_empty() {
            if let Err(err) = console.write_all(outcome.stdout.as_bytes()) {
                warn!(error = %err, "cannot echo scss-lint output");
            }
        }

        if let Some(err) = outcome.parse_error {
            return self.failure(err, Some(outcome.raw_exit_code));
        }

        if let Some(report) = &outcome.report {
            for reporter in &reporters {
                debug!(reporter = reporter.id(), "generating lint report");
                if let Err(err) = reporter.generate(report, console) {
                    warn!(reporter = reporter.id(), error = %err, "lint reporter failed");
                }
            }
        }

        let code = match &outcome.report {
            Some(report) => self.config.policy.task_exit_code(
                outcome.raw_exit_code,
                report.error_count(),
                report.warning_count(),
            ),
            // scss-lint prints nothing when no files matched.
            None if outcome.raw_exit_code == exit_code::NO_FILES => {
                self.config
                    .policy
                    .task_exit_code(outcome.raw_exit_code, 0, 0)
            }
            None => outcome.raw_exit_code,
        };
        debug!(
            raw_exit_code = outcome.raw_exit_code,
            exit_code = code,
            "scss-lint task finished"
        );

        self.finish(
            code,
            Some(outcome.raw_exit_code),
            &outcome.stderr,
            outcome.report,
        )
    }

    fn init_reporters(&self) -> Vec<LintReporter> {
        self.config
            .reporters
            .iter()
            .filter(|config| config.enabled)
            .filter_map(|config| {
                let Some(renderer) = self.registry.resolve(config.registry_id()) else {
                    warn!(id = %config.id, "unknown lint reporter skipped");
                    return None;
                };
                let mut reporter = LintReporter::new(config.id.clone(), renderer);
                reporter.set_destination(
                    config
                        .destination
                        .clone()
                        .map_or(Destination::Console, Destination::File),
                );
                Some(reporter)
            })
            .collect()
    }

    fn lint_files(&self, options: &CommandOptions) -> Result<LintOutcome> {
        let command = build_command(options);
        info!(command = %command, "scss-lint task runs");

        let output = self.process.run(&command, None)?;
        debug!(exit_code = output.exit_code, "scss-lint exited");
        let (report, parse_error) = match read_report(options, &output) {
            Ok(raw) => (raw.map(LintReport::from_raw), None),
            Err(err) => (None, Some(err)),
        };

        Ok(LintOutcome {
            raw_exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            report,
            parse_error,
        })
    }

    /// One scss-lint process per file, sequentially. Keeps the highest raw
    /// exit code and the first report seen for each path.
    fn lint_stdin(&self, options: &CommandOptions) -> Result<LintOutcome> {
        let mut raw_exit_code = exit_code::OK;
        let mut merged: Option<RawReport> = None;
        let mut parse_error = None;
        let mut stdout = String::new();
        let mut stderr = String::new();

        info!(count = self.config.stdin.len(), "scss-lint task lints files from stdin");
        for file in &self.config.stdin {
            let command = build_stdin_command(options, file);
            debug!(file = %file.file_name, command = %command, "linting stdin file");

            let output = self.process.run(&command, None)?;
            raw_exit_code = raw_exit_code.max(output.exit_code);
            match read_report(options, &output) {
                Ok(Some(raw)) => merged.get_or_insert_with(RawReport::new).absorb(raw),
                Ok(None) => {}
                Err(err) => {
                    warn!(file = %file.file_name, error = %err, "cannot parse scss-lint report");
                    parse_error.get_or_insert(err);
                }
            }
            stdout.push_str(&output.stdout);
            stderr.push_str(&output.stderr);
        }

        Ok(LintOutcome {
            raw_exit_code,
            stdout,
            stderr,
            report: merged.map(LintReport::from_raw),
            parse_error,
        })
    }

    fn failure(&self, err: TaskError, raw_exit_code: Option<i32>) -> TaskResult {
        let code = match err {
            TaskError::ReportParse(_) => exit_code::REPORT_PARSE,
            _ => exit_code::SOFTWARE,
        };
        warn!(error = %err, "scss-lint task failed");
        TaskResult {
            exit_code: code,
            message: format!("{}: {err}", exit_message(code).unwrap_or_default()),
            raw_exit_code,
            report: None,
            report_asset_name: self.report_asset_name(),
        }
    }

    fn finish(
        &self,
        code: i32,
        raw_exit_code: Option<i32>,
        stderr: &str,
        report: Option<LintReport>,
    ) -> TaskResult {
        let message = match exit_message(code) {
            Some(message) => message.to_string(),
            None if !stderr.trim().is_empty() => stderr.trim().to_string(),
            None => format!("scss-lint exited with code {code}"),
        };
        TaskResult {
            exit_code: code,
            message,
            raw_exit_code,
            report,
            report_asset_name: self.report_asset_name(),
        }
    }

    fn report_asset_name(&self) -> String {
        format!("{}report", self.config.task.asset_name_prefix)
    }
}

/// A relative `out` file is written by scss-lint inside the working directory.
fn out_path(options: &CommandOptions) -> Option<PathBuf> {
    let out = options
        .out
        .as_ref()
        .filter(|out| !out.as_os_str().is_empty())?;
    Some(match &options.working_directory {
        Some(dir) if out.is_relative() => dir.join(out),
        _ => out.clone(),
    })
}

fn read_report(options: &CommandOptions, output: &ProcessOutput) -> Result<Option<RawReport>> {
    if !is_lint_success(output.exit_code) || !options.is_machine_readable() {
        return Ok(None);
    }

    let payload = match out_path(options) {
        None => output.stdout.clone(),
        Some(path) => match fs::read_to_string(&path) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read scss-lint report file");
                return Ok(None);
            }
        },
    };

    if payload.trim().is_empty() {
        return Ok(None);
    }
    RawReport::from_json(&payload).map(Some)
}
