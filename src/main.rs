mod cli;

use clap::Parser;
use scss_lint_task::config;
use scss_lint_task::error::TaskError;
use scss_lint_task::exit_code;
use scss_lint_task::process::ShellProcessRunner;
use scss_lint_task::report::BuiltinRegistry;
use scss_lint_task::task::stdin::{StdinFile, StdinSource};
use scss_lint_task::task::TaskRunner;
use scss_lint_task::types::config::{IncludeList, TaskConfig};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_task_config(args: &cli::TaskArgs) -> Result<TaskConfig, TaskError> {
    if let Some(path) = &args.config {
        return config::load_config_file(path);
    }
    let root = args
        .working_directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(config::load_config(&root)?.unwrap_or_default())
}

fn apply_overrides(task: &mut TaskConfig, args: &cli::TaskArgs) {
    let command = &mut task.command;
    if let Some(dir) = &args.working_directory {
        command.working_directory = Some(dir.clone());
    }
    if let Some(gem_file) = &args.bundle_gem_file {
        command.bundle_gem_file = Some(gem_file.clone());
    }
    if args.no_bundle {
        command.bundle_executable = None;
    } else if let Some(bundle) = &args.bundle_executable {
        command.bundle_executable = Some(bundle.clone());
    }
    if let Some(executable) = &args.scss_lint_executable {
        command.scss_lint_executable = executable.clone();
    }
    if let Some(ruby) = &args.ruby_executable {
        command.ruby_executable = Some(ruby.clone());
    }
    if let Some(format) = &args.format {
        command.format = Some(format.clone());
    }
    if let Some(config_file) = &args.config_file {
        command.config_file = Some(config_file.clone());
    }
    if let Some(out) = &args.out {
        command.out = Some(out.clone());
    }
    if let Some(color) = args.color() {
        command.color = Some(color);
    }
    command
        .require
        .merge(&IncludeList::from_names(args.require.iter().cloned(), true));
    command
        .exclude
        .merge(&IncludeList::from_names(args.exclude.iter().cloned(), true));
    command
        .linters
        .merge(&IncludeList::from_names(args.include_linter.iter().cloned(), true));
    command
        .linters
        .merge(&IncludeList::from_names(args.exclude_linter.iter().cloned(), false));

    if let Some(fail_on) = args.fail_on {
        task.policy.fail_on = fail_on;
    }
    if args.fail_on_no_files {
        task.policy.fail_on_no_files = true;
    }
    if !args.reporter.is_empty() {
        task.reporters = args.reporter.clone();
    }
    if let Some(prefix) = &args.asset_name_prefix {
        task.task.asset_name_prefix = prefix.clone();
    }
}

fn read_stdin_files(task: &TaskConfig, files: &[PathBuf]) -> Result<Vec<StdinFile>, TaskError> {
    let base = task.command.working_directory.as_deref();
    files
        .iter()
        .map(|file| {
            let location = match base {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            };
            let content = fs::read_to_string(&location)?;
            Ok(StdinFile::new(
                file.display().to_string(),
                StdinSource::Content(content),
            ))
        })
        .collect()
}

fn prepare(args: &cli::TaskArgs, paths: &[String]) -> Result<TaskConfig, TaskError> {
    let mut task = load_task_config(args)?;
    apply_overrides(&mut task, args);
    task.command
        .paths
        .merge(&IncludeList::from_names(paths.iter().cloned(), true));
    Ok(task)
}

fn execute(task: &TaskConfig) -> Result<i32, TaskError> {
    let process = ShellProcessRunner;
    let registry = BuiltinRegistry;
    let runner = TaskRunner::new(task, &process, &registry);
    runner.validate_reporters()?;

    let mut stdout = std::io::stdout();
    let result = runner.run(&mut stdout);
    if result.is_success() {
        tracing::info!("{}", result.message);
    } else {
        eprintln!("{}", result.message);
    }
    Ok(result.exit_code)
}

fn run() -> Result<i32, TaskError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Run(cmd) => {
            let task = prepare(&cmd.task, &cmd.paths)?;
            execute(&task)
        }
        cli::Commands::Stdin(cmd) => {
            let mut task = prepare(&cmd.task, &[])?;
            task.stdin = read_stdin_files(&task, &cmd.files)?;
            execute(&task)
        }
        cli::Commands::Command(cmd) => {
            let task = prepare(&cmd.task, &cmd.paths)?;
            let process = ShellProcessRunner;
            let registry = BuiltinRegistry;
            let runner = TaskRunner::new(&task, &process, &registry);
            runner.validate_reporters()?;
            println!("{}", runner.command());
            Ok(exit_code::OK)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::INVALID);
        }
    }
}
