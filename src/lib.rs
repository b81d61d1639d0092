//! Runs scss-lint as a build task: renders the command line, maps its exit
//! code through a fail policy and hands the parsed JSON report to reporters.

pub mod command;
pub mod config;
pub mod error;
pub mod policy;
pub mod process;
pub mod report;
pub mod task;
pub mod types;

pub use error::{Result, TaskError};
pub use policy::{exit_code, ExitPolicy, FailOn};
pub use task::{TaskResult, TaskRunner};
