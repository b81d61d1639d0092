use crate::error::{Result, TaskError};
use crate::types::config::TaskConfig;
use std::path::Path;
use toml::{Table, Value};

pub const DEFAULT_CONFIG_FILE: &str = "scss-lint-task.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".scss-lint-task/local.toml";

/// `[command]` keys holding an include list.
const INCLUDE_LIST_KEYS: [&str; 5] = ["env_var_path", "require", "linters", "exclude", "paths"];

/// Repository config with the local override applied; `None` without a
/// repository file.
pub fn load_config(root: &Path) -> Result<Option<TaskConfig>> {
    let Some(mut merged) = read_layer(&root.join(DEFAULT_CONFIG_FILE))? else {
        return Ok(None);
    };
    if let Some(local) = read_layer(&root.join(DEFAULT_LOCAL_FILE))? {
        apply_layer(&mut merged, local);
    }
    into_config(merged).map(Some)
}

/// Loads exactly one file, no local override.
pub fn load_config_file(path: &Path) -> Result<TaskConfig> {
    match read_layer(path)? {
        Some(table) => into_config(table),
        None => Err(TaskError::ConfigNotFound(path.display().to_string())),
    }
}

fn read_layer(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| TaskError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn into_config(table: Table) -> Result<TaskConfig> {
    Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| TaskError::ConfigParse(e.to_string()))
}

fn apply_layer(base: &mut Table, layer: Table) {
    for (section, value) in layer {
        match value {
            Value::Table(keys) if section == "command" => match base.get_mut(&section) {
                Some(Value::Table(command)) => merge_command(command, keys),
                _ => {
                    base.insert(section, Value::Table(keys));
                }
            },
            Value::Array(reporters) if section == "reporters" => match base.get_mut(&section) {
                Some(Value::Array(existing)) => merge_reporters(existing, reporters),
                _ => {
                    base.insert(section, Value::Array(reporters));
                }
            },
            Value::Array(files) if section == "stdin" => match base.get_mut(&section) {
                Some(Value::Array(existing)) => existing.extend(files),
                _ => {
                    base.insert(section, Value::Array(files));
                }
            },
            Value::Table(keys) => match base.get_mut(&section) {
                Some(Value::Table(existing)) => existing.extend(keys),
                _ => {
                    base.insert(section, Value::Table(keys));
                }
            },
            value => {
                base.insert(section, value);
            }
        }
    }
}

fn merge_command(base: &mut Table, layer: Table) {
    for (key, value) in layer {
        match base.get_mut(&key) {
            Some(existing) if INCLUDE_LIST_KEYS.contains(&key.as_str()) => {
                merge_include_list(existing, value)
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}

/// Item by item, so `linters = { ColorKeyword = false }` only flips one linter.
fn merge_include_list(existing: &mut Value, overlay: Value) {
    let base = std::mem::replace(existing, Value::Table(Table::new()));
    *existing = match (include_table(base), include_table(overlay)) {
        (Ok(mut items), Ok(overlay_items)) => {
            items.extend(overlay_items);
            Value::Table(items)
        }
        (Err(_), Ok(overlay_items)) => Value::Table(overlay_items),
        // Left for the deserializer to reject.
        (_, Err(overlay)) => overlay,
    };
}

/// Normalizes the string and list shorthands to `name = true` tables.
fn include_table(value: Value) -> std::result::Result<Table, Value> {
    match value {
        Value::Table(items) => Ok(items),
        Value::String(name) => {
            let mut items = Table::new();
            items.insert(name, Value::Boolean(true));
            Ok(items)
        }
        Value::Array(names) if names.iter().all(Value::is_str) => Ok(names
            .iter()
            .filter_map(Value::as_str)
            .map(|name| (name.to_string(), Value::Boolean(true)))
            .collect()),
        other => Err(other),
    }
}

/// Same `id` updates the existing reporter, a new `id` is appended.
fn merge_reporters(base: &mut Vec<Value>, layer: Vec<Value>) {
    for reporter in layer {
        let position = reporter
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| {
                base.iter()
                    .position(|known| known.get("id").and_then(Value::as_str) == Some(id))
            });
        match (position, reporter) {
            (Some(position), Value::Table(fields)) => {
                if let Some(Value::Table(known)) = base.get_mut(position) {
                    known.extend(fields);
                }
            }
            (_, reporter) => base.push(reporter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FailOn;
    use crate::task::stdin::{StdinFile, StdinSource};
    use crate::types::config::Inclusion;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_layers(repo: &str, local: Option<&str>) -> TempDir {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), repo).expect("repo config should write");
        if let Some(local) = local {
            fs::create_dir_all(root.path().join(".scss-lint-task"))
                .expect("local config dir should create");
            fs::write(root.path().join(DEFAULT_LOCAL_FILE), local)
                .expect("local config should write");
        }
        root
    }

    #[test]
    fn load_config_returns_none_when_repo_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join(".scss-lint-task")).expect("local dir should create");
        fs::write(dir.path().join(DEFAULT_LOCAL_FILE), "[policy]\nfail_on = \"never\"\n")
            .expect("local config should write");

        let cfg = load_config(dir.path()).expect("load should not fail");
        assert!(cfg.is_none());
    }

    #[test]
    fn local_include_lists_merge_item_by_item() {
        let root = write_layers(
            r#"
[command]
scss_lint_executable = "repo-scss-lint"
linters = { Indentation = true, ColorKeyword = true }
exclude = "vendor/**"
"#,
            Some(
                r#"
[command]
linters = { ColorKeyword = false }
exclude = ["node_modules/**"]
"#,
            ),
        );

        let cfg = load_config(root.path())
            .expect("load should succeed")
            .expect("config should exist");

        assert_eq!(cfg.command.scss_lint_executable, "repo-scss-lint");
        assert_eq!(
            cfg.command.linters.iter().collect::<Vec<_>>(),
            vec![
                ("Indentation", Inclusion::Included),
                ("ColorKeyword", Inclusion::Excluded)
            ]
        );
        assert_eq!(
            cfg.command.exclude.included().collect::<Vec<_>>(),
            vec!["vendor/**", "node_modules/**"]
        );
    }

    #[test]
    fn local_reporters_update_by_id_and_append_new_ones() {
        let root = write_layers(
            r#"
[[reporters]]
id = "checkstyle"
destination = "build/scss-lint.xml"

[[reporters]]
id = "summary"
"#,
            Some(
                r#"
[[reporters]]
id = "checkstyle"
enabled = false

[[reporters]]
id = "json"
destination = "build/scss-lint.json"
"#,
            ),
        );

        let cfg = load_config(root.path())
            .expect("load should succeed")
            .expect("config should exist");

        let ids: Vec<&str> = cfg.reporters.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["checkstyle", "summary", "json"]);
        assert!(!cfg.reporters[0].enabled);
        assert_eq!(
            cfg.reporters[0].destination,
            Some(PathBuf::from("build/scss-lint.xml"))
        );
        assert!(cfg.reporters[1].enabled);
    }

    #[test]
    fn local_policy_keys_and_stdin_files_layer_on_top() {
        let root = write_layers(
            r#"
[policy]
fail_on = "warning"

[task]
asset_name_prefix = "styles."

[[stdin]]
file_name = "a.scss"
content = "a {}"
"#,
            Some(
                r#"
[policy]
fail_on_no_files = true

[[stdin]]
file_name = "b.scss"
command = "git show :b.scss"
"#,
            ),
        );

        let cfg = load_config(root.path())
            .expect("load should succeed")
            .expect("config should exist");

        assert_eq!(cfg.policy.fail_on, FailOn::Warning);
        assert!(cfg.policy.fail_on_no_files);
        assert_eq!(cfg.task.asset_name_prefix, "styles.");
        assert_eq!(
            cfg.stdin,
            vec![
                StdinFile::new("a.scss", StdinSource::Content("a {}".to_string())),
                StdinFile::new(
                    "b.scss",
                    StdinSource::Command("git show :b.scss".to_string())
                ),
            ]
        );
    }

    #[test]
    fn load_config_file_reports_missing_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let result = load_config_file(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(TaskError::ConfigNotFound(_))));
    }

    #[test]
    fn load_config_file_rejects_bad_values() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[policy]\nfail_on = \"sometimes\"\n").expect("config should write");
        let result = load_config_file(&path);
        assert!(matches!(result, Err(TaskError::ConfigParse(_))));
    }

    #[test]
    fn syntax_errors_name_the_file() {
        let root = write_layers("[command\n", None);
        match load_config(root.path()) {
            Err(TaskError::ConfigParse(message)) => assert!(message.contains(DEFAULT_CONFIG_FILE)),
            other => panic!("expected a config parse error, got {other:?}"),
        }
    }
}
