pub mod shell;

use crate::task::stdin::StdinFile;
use crate::types::config::{CommandOptions, IncludeList};
use shell::{quote_arg, quote_command, quote_path_arg};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// How a single scss-lint flag is rendered.
#[derive(Debug, Clone)]
enum OptionValue<'a> {
    /// `--name='value'` when non-empty.
    Value(Option<Cow<'a, str>>),
    /// `--name='item'` once per included item.
    MultiValue(&'a IncludeList),
    /// One `--name='a,b'` with every included item.
    List(&'a IncludeList),
    /// `--include-name='a,b' --exclude-name='c'`.
    IncludeExclude(&'a IncludeList),
    /// `--name`, `--no-name` or nothing.
    TriState(Option<bool>),
}

#[derive(Debug, Clone)]
struct CliOption<'a> {
    name: &'static str,
    value: OptionValue<'a>,
}

fn cli_options<'a>(options: &'a CommandOptions, stdin: Option<&'a StdinFile>) -> Vec<CliOption<'a>> {
    let mut table = Vec::with_capacity(8);
    if let Some(file) = stdin {
        table.push(CliOption {
            name: "stdin-file-path",
            value: OptionValue::Value(Some(Cow::Borrowed(file.file_name.as_str()))),
        });
    }

    table.extend([
        CliOption {
            name: "format",
            value: OptionValue::Value(options.format().map(Cow::Borrowed)),
        },
        CliOption {
            name: "require",
            value: OptionValue::MultiValue(&options.require),
        },
        CliOption {
            name: "linter",
            value: OptionValue::IncludeExclude(&options.linters),
        },
        CliOption {
            name: "config",
            value: OptionValue::Value(path_value(options.config_file.as_ref())),
        },
        CliOption {
            name: "exclude",
            value: OptionValue::List(&options.exclude),
        },
        CliOption {
            name: "out",
            value: OptionValue::Value(path_value(options.out.as_ref())),
        },
        CliOption {
            name: "color",
            value: OptionValue::TriState(options.color),
        },
    ]);

    table
}

fn path_value(path: Option<&PathBuf>) -> Option<Cow<'_, str>> {
    path.map(|path| path.to_string_lossy())
}

fn non_empty_path(path: Option<&PathBuf>) -> Option<&Path> {
    path.map(PathBuf::as_path)
        .filter(|path| !path.as_os_str().is_empty())
}

fn non_empty_str(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|value| !value.is_empty())
}

fn render_option(command: &mut String, option: &CliOption<'_>) {
    let name = option.name;
    match &option.value {
        OptionValue::Value(value) => {
            if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
                command.push_str(&format!(" --{name}={}", quote_arg(value)));
            }
        }
        OptionValue::MultiValue(items) => {
            for item in items.included() {
                command.push_str(&format!(" --{name}={}", quote_arg(item)));
            }
        }
        OptionValue::List(items) => {
            let joined = items.included().collect::<Vec<_>>().join(",");
            if !joined.is_empty() {
                command.push_str(&format!(" --{name}={}", quote_arg(&joined)));
            }
        }
        OptionValue::IncludeExclude(items) => {
            let included = items.included().collect::<Vec<_>>();
            if !included.is_empty() {
                command.push_str(&format!(
                    " --include-{name}={}",
                    quote_arg(&included.join(","))
                ));
            }
            let excluded = items.excluded().collect::<Vec<_>>();
            if !excluded.is_empty() {
                command.push_str(&format!(
                    " --exclude-{name}={}",
                    quote_arg(&excluded.join(","))
                ));
            }
        }
        OptionValue::TriState(Some(true)) => command.push_str(&format!(" --{name}")),
        OptionValue::TriState(Some(false)) => command.push_str(&format!(" --no-{name}")),
        OptionValue::TriState(None) => {}
    }
}

fn render(options: &CommandOptions, stdin: Option<&StdinFile>) -> String {
    let mut command = String::new();

    if let Some(dir) = non_empty_path(options.working_directory.as_ref()) {
        command.push_str(&format!("cd {} && ", quote_path_arg(dir)));
    }

    if let Some(file) = stdin {
        command.push_str(&file.source.pipe_prefix());
    }

    let env_paths = options.env_var_path.included().collect::<Vec<_>>();
    if !env_paths.is_empty() {
        command.push_str(&format!("PATH={} ", quote_arg(&env_paths.join(":"))));
    }

    if let Some(gem_file) = non_empty_path(options.bundle_gem_file.as_ref()) {
        command.push_str(&format!("BUNDLE_GEMFILE={} ", quote_path_arg(gem_file)));
    }

    if let Some(ruby) = non_empty_str(options.ruby_executable.as_ref()) {
        command.push_str(&format!("{} ", quote_command(ruby)));
    }

    if let Some(bundle) = non_empty_str(options.bundle_executable.as_ref()) {
        command.push_str(&format!("{} exec ", quote_command(bundle)));
    }

    command.push_str(&quote_command(&options.scss_lint_executable));

    for option in cli_options(options, stdin) {
        render_option(&mut command, &option);
    }

    if stdin.is_none() {
        let paths = options.paths.included().collect::<Vec<_>>();
        if !paths.is_empty() {
            command.push_str(" --");
            for path in paths {
                command.push(' ');
                command.push_str(&quote_arg(path));
            }
        }
    }

    command
}

/// Renders the shell command that lints `options.paths`.
pub fn build_command(options: &CommandOptions) -> String {
    render(options, None)
}

/// Renders the shell command that lints one file fed through stdin.
pub fn build_stdin_command(options: &CommandOptions, file: &StdinFile) -> String {
    render(options, Some(file))
}
