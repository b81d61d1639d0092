use clap::{Args, Parser, Subcommand};
use scss_lint_task::policy::FailOn;
use scss_lint_task::types::config::ReporterConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scss-lint-task",
    version,
    about = "Runs scss-lint and maps its findings to a build exit code"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files and directories
    Run(RunCommand),
    /// Lint files one at a time by piping their content to scss-lint
    Stdin(StdinCommand),
    /// Print the scss-lint command line without running it
    Command(RunCommand),
}

#[derive(Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub task: TaskArgs,
    /// Files, directories or glob patterns handed to scss-lint
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct StdinCommand {
    #[command(flatten)]
    pub task: TaskArgs,
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct TaskArgs {
    /// Load only this config file instead of the layered lookup
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub working_directory: Option<PathBuf>,
    #[arg(long)]
    pub bundle_gem_file: Option<PathBuf>,
    #[arg(long, conflicts_with = "no_bundle")]
    pub bundle_executable: Option<String>,
    /// Call scss-lint directly instead of through `bundle exec`
    #[arg(long)]
    pub no_bundle: bool,
    #[arg(long)]
    pub scss_lint_executable: Option<String>,
    #[arg(long)]
    pub ruby_executable: Option<String>,
    #[arg(short, long)]
    pub format: Option<String>,
    #[arg(long)]
    pub require: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub include_linter: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub exclude_linter: Vec<String>,
    /// scss-lint's own YAML config
    #[arg(long)]
    pub config_file: Option<PathBuf>,
    #[arg(long)]
    pub exclude: Vec<String>,
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,
    #[arg(long)]
    pub no_color: bool,
    #[arg(long)]
    pub fail_on: Option<FailOn>,
    #[arg(long)]
    pub fail_on_no_files: bool,
    /// `id` or `id=destination`; repeatable
    #[arg(long, value_parser = parse_reporter)]
    pub reporter: Vec<ReporterConfig>,
    #[arg(long)]
    pub asset_name_prefix: Option<String>,
}

impl TaskArgs {
    pub fn color(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

fn parse_reporter(value: &str) -> Result<ReporterConfig, String> {
    let (id, destination) = match value.split_once('=') {
        Some((id, destination)) => (id, Some(destination)),
        None => (value, None),
    };
    if id.is_empty() {
        return Err("reporter id must not be empty".to_string());
    }
    let reporter = ReporterConfig::new(id);
    Ok(match destination.filter(|destination| !destination.is_empty()) {
        Some(destination) => reporter.with_destination(destination),
        None => reporter,
    })
}
