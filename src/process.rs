use std::io;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs one shell command to completion.
pub trait ProcessRunner {
    fn run(&self, command: &str, working_directory: Option<&Path>) -> io::Result<ProcessOutput>;
}

/// Hands the command to `sh -c` and blocks until it exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellProcessRunner;

/// Reported when the child was killed by a signal and has no exit status.
pub const SIGNAL_EXIT_CODE: i32 = 70;

impl ProcessRunner for ShellProcessRunner {
    fn run(&self, command: &str, working_directory: Option<&Path>) -> io::Result<ProcessOutput> {
        let mut process = Command::new("sh");
        process.arg("-c").arg(command);
        if let Some(dir) = working_directory {
            process.current_dir(dir);
        }

        let output = process.output()?;
        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(SIGNAL_EXIT_CODE),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
