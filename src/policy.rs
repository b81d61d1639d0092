use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub mod exit_code {
    /// No lints were found.
    pub const OK: i32 = 0;
    /// Lints with a severity of warning were reported (no errors).
    pub const WARNING: i32 = 1;
    /// One or more errors were reported (and any number of warnings).
    pub const ERROR: i32 = 2;
    /// Extra reporters were requested with a non machine-readable format.
    pub const INVALID: i32 = 3;
    /// The JSON payload of a successful lint could not be decoded.
    pub const REPORT_PARSE: i32 = 4;
    pub const USAGE: i32 = 64;
    pub const NO_INPUT: i32 = 66;
    pub const UNAVAILABLE: i32 = 69;
    pub const SOFTWARE: i32 = 70;
    pub const CONFIG: i32 = 78;
    /// No SCSS files matched by the patterns.
    pub const NO_FILES: i32 = 80;
}

pub fn exit_message(code: i32) -> Option<&'static str> {
    let message = match code {
        exit_code::OK => "No lints were found",
        exit_code::WARNING => "Lints with a severity of warning were reported (no errors)",
        exit_code::ERROR => "One or more errors were reported (and any number of warnings)",
        exit_code::INVALID => {
            "Extra lint reporters can be used only if the output format is \"JSON\"."
        }
        exit_code::REPORT_PARSE => "The lint report could not be parsed",
        exit_code::USAGE => "Command line usage error (invalid flag, etc.)",
        exit_code::NO_INPUT => "One or more files specified were not found",
        exit_code::UNAVAILABLE => {
            "Required library specified via -r/--require flag was not found"
        }
        exit_code::SOFTWARE => "Unexpected error (i.e. a bug); please report it",
        exit_code::CONFIG => "Invalid configuration file; your YAML is likely incorrect",
        exit_code::NO_FILES => "Files glob patterns specified did not match any files.",
        _ => return None,
    };
    Some(message)
}

/// True when scss-lint produced a report, with or without findings.
pub fn is_lint_success(raw_exit_code: i32) -> bool {
    matches!(
        raw_exit_code,
        exit_code::OK | exit_code::NO_FILES | exit_code::WARNING | exit_code::ERROR
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    Never,
    Warning,
    #[default]
    Error,
}

impl FromStr for FailOn {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "never" => Ok(FailOn::Never),
            "warning" => Ok(FailOn::Warning),
            "error" => Ok(FailOn::Error),
            other => Err(format!(
                "invalid fail-on value '{other}' (expected never, warning or error)"
            )),
        }
    }
}

impl fmt::Display for FailOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailOn::Never => "never",
            FailOn::Warning => "warning",
            FailOn::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ExitPolicy {
    pub fail_on: FailOn,
    pub fail_on_no_files: bool,
}

impl ExitPolicy {
    pub fn new(fail_on: FailOn, fail_on_no_files: bool) -> Self {
        Self {
            fail_on,
            fail_on_no_files,
        }
    }

    /// Maps the raw scss-lint exit code and the aggregated counts to the
    /// task exit code. Tool failures pass through untouched.
    pub fn task_exit_code(&self, raw_exit_code: i32, errors: usize, warnings: usize) -> i32 {
        if raw_exit_code == exit_code::NO_FILES {
            return if self.fail_on_no_files {
                exit_code::NO_FILES
            } else {
                exit_code::OK
            };
        }

        if !is_lint_success(raw_exit_code) {
            return raw_exit_code;
        }

        match self.fail_on {
            FailOn::Never => exit_code::OK,
            FailOn::Warning if errors > 0 => exit_code::ERROR,
            FailOn::Warning if warnings > 0 => exit_code::WARNING,
            FailOn::Warning => exit_code::OK,
            FailOn::Error if errors > 0 => exit_code::ERROR,
            FailOn::Error => exit_code::OK,
        }
    }
}
