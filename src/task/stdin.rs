use crate::command::shell::quote_arg;
use serde::Deserialize;

/// One file linted through scss-lint's `--stdin-file-path`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StdinFile {
    pub file_name: String,
    #[serde(flatten)]
    pub source: StdinSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdinSource {
    /// Literal file content, written into the pipe byte for byte.
    Content(String),
    /// Shell command whose stdout is the file content, e.g. `git show :a.scss`.
    Command(String),
}

impl StdinFile {
    pub fn new(file_name: impl Into<String>, source: StdinSource) -> Self {
        Self {
            file_name: file_name.into(),
            source,
        }
    }
}

impl StdinSource {
    pub fn pipe_prefix(&self) -> String {
        match self {
            StdinSource::Content(content) => format!("printf '%s' {} | ", quote_arg(content)),
            StdinSource::Command(command) => format!("{command} | "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_quoted_and_printed() {
        let source = StdinSource::Content("a { color: 'red'; }".to_string());
        assert_eq!(
            source.pipe_prefix(),
            "printf '%s' 'a { color: '\\''red'\\''; }' | "
        );
    }

    #[cfg(unix)]
    #[test]
    fn content_reaches_the_pipe_unchanged() {
        use crate::process::{ProcessRunner, ShellProcessRunner};

        let content = ".icon:before { content: \"\\f101\"; }\n.a { b: '%s\\n'; }";
        let source = StdinSource::Content(content.to_string());
        let output = ShellProcessRunner
            .run(&format!("{}cat", source.pipe_prefix()), None)
            .expect("sh should run");
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, content);
    }

    #[test]
    fn command_is_used_verbatim() {
        let source = StdinSource::Command("git show :a.scss".to_string());
        assert_eq!(source.pipe_prefix(), "git show :a.scss | ");
    }

    #[test]
    fn stdin_file_deserializes_either_source() {
        let file: StdinFile =
            serde_json::from_str(r#"{"file_name": "a.scss", "content": "x"}"#).expect("parse");
        assert_eq!(file, StdinFile::new("a.scss", StdinSource::Content("x".to_string())));
    }
}
